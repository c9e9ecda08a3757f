//! Violent-crime classification.
//!
//! Tags incidents as violent by keyword detection on the crime description.
//! Keywords are checked in table order and the first hit decides the
//! [`ViolentCategory`]; a description with no hit is a property crime.

use crime_dashboard_crime_models::{Incident, ViolentCategory};

/// Ordered keyword table. Keywords are upper-case; descriptions are
/// upper-cased before matching.
pub const VIOLENT_KEYWORDS: &[(&str, ViolentCategory)] = &[
    ("ASSAULT", ViolentCategory::Assault),
    ("ROBBERY", ViolentCategory::Robbery),
    ("HOMICIDE", ViolentCategory::Homicide),
    ("MANSLAUGHTER", ViolentCategory::Homicide),
    ("RAPE", ViolentCategory::SexualAssault),
    ("SEXUAL", ViolentCategory::SexualAssault),
    ("PENETRATION", ViolentCategory::SexualAssault),
    ("ORAL COPULATION", ViolentCategory::SexualAssault),
    ("SODOMY", ViolentCategory::SexualAssault),
    ("BRANDISH WEAPON", ViolentCategory::WeaponThreat),
    ("SHOTS FIRED", ViolentCategory::WeaponThreat),
];

/// Classifies a raw crime description.
///
/// Case-insensitive. Returns `None` for non-violent descriptions.
#[must_use]
pub fn classify_description(description: &str) -> Option<ViolentCategory> {
    let upper = description.to_uppercase();
    VIOLENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| upper.contains(keyword))
        .map(|&(_, category)| category)
}

/// Whether a description names a violent crime.
#[must_use]
pub fn is_violent(description: &str) -> bool {
    classify_description(description).is_some()
}

/// Sets the violent category of every incident from its description.
pub fn classify_incidents(incidents: &mut [Incident]) {
    for incident in incidents.iter_mut() {
        incident.violent_category = classify_description(&incident.description);
    }

    let violent = incidents.iter().filter(|i| i.is_violent()).count();
    log::info!(
        "Classified {} incidents: {violent} violent, {} property",
        incidents.len(),
        incidents.len() - violent
    );
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn incident(description: &str) -> Incident {
        let at = NaiveDate::from_ymd_opt(2021, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Incident::new(
            "CENTRAL".to_string(),
            at,
            description.to_string(),
            34.05,
            -118.25,
        )
    }

    #[test]
    fn matches_violent_keywords() {
        assert_eq!(
            classify_description("ASSAULT WITH DEADLY WEAPON, AGGRAVATED ASSAULT"),
            Some(ViolentCategory::Assault)
        );
        assert_eq!(
            classify_description("ROBBERY"),
            Some(ViolentCategory::Robbery)
        );
        assert_eq!(
            classify_description("CRIMINAL HOMICIDE"),
            Some(ViolentCategory::Homicide)
        );
        assert_eq!(
            classify_description("RAPE, FORCIBLE"),
            Some(ViolentCategory::SexualAssault)
        );
        assert_eq!(
            classify_description("BRANDISH WEAPON"),
            Some(ViolentCategory::WeaponThreat)
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            classify_description("attempted robbery"),
            Some(ViolentCategory::Robbery)
        );
    }

    #[test]
    fn first_keyword_wins() {
        // Mentions both robbery and assault; ASSAULT is earlier in the table.
        assert_eq!(
            classify_description("ROBBERY / SEXUAL ASSAULT"),
            Some(ViolentCategory::Assault)
        );
    }

    #[test]
    fn non_violent_descriptions() {
        assert_eq!(classify_description("BURGLARY"), None);
        assert_eq!(classify_description("VEHICLE - STOLEN"), None);
        assert_eq!(classify_description(""), None);
        assert!(!is_violent("THEFT PLAIN - PETTY ($950 & UNDER)"));
    }

    #[test]
    fn classification_is_idempotent() {
        let mut incidents = vec![
            incident("BATTERY - SIMPLE ASSAULT"),
            incident("BURGLARY FROM VEHICLE"),
            incident("SHOTS FIRED AT INHABITED DWELLING"),
        ];
        classify_incidents(&mut incidents);
        let first: Vec<_> = incidents.iter().map(|i| i.violent_category).collect();

        classify_incidents(&mut incidents);
        let second: Vec<_> = incidents.iter().map(|i| i.violent_category).collect();

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                Some(ViolentCategory::Assault),
                None,
                Some(ViolentCategory::WeaponThreat)
            ]
        );
    }
}
