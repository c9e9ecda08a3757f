//! Turns aggregates into the map and drill-down payloads.
//!
//! All functions are pure: the same context and state always produce the
//! same payload.

use crime_dashboard_analytics::{aggregate_divisions, ensure_divisions, rank_for};
use crime_dashboard_analytics_models::{CategoryCount, YearFilter, violent_ratio};
use crime_dashboard_models::{
    ChoroplethPayload, ChoroplethValue, DrillDownPayload, DrillDownView, HotspotPayload,
    HotspotPoint, MapLayer, MapPayload, PieSlice, RankingRow, ViewMode,
};

use crate::context::DashboardContext;

/// Label of the pie slice that collects every description past the
/// configured slice count.
pub const OTHER_SLICE_LABEL: &str = "ALL OTHER";

/// Smallest upper bound for the colour range, so an all-zero map still has
/// a valid scale.
const MIN_RANGE_MAX: f64 = 0.01;

/// Full ranking for one division (or citywide) under one year filter.
///
/// Cached by the session so that switching between table and pie doesn't
/// recount incidents.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Division ranked, `None` for citywide.
    pub division: Option<String>,
    /// Year filter.
    pub year: YearFilter,
    /// Every description by descending count.
    pub entries: Vec<CategoryCount>,
    /// Sum of all counts.
    pub total: u64,
    /// Incidents in violent descriptions.
    pub violent: u64,
}

/// Ranks crime descriptions for the selected division under `year`.
#[must_use]
pub fn compute_ranking(
    ctx: &DashboardContext,
    division: Option<&str>,
    year: YearFilter,
) -> Ranking {
    let entries = rank_for(ctx.incidents(), year, division, None);
    let total = entries.iter().map(|c| c.count).sum();
    let violent = entries
        .iter()
        .filter(|c| c.class.is_violent())
        .map(|c| c.count)
        .sum();

    Ranking {
        division: division.map(str::to_string),
        year,
        entries,
        total,
        violent,
    }
}

/// Drill-down title, e.g. `Crime Ranking in CENTRAL (2022)`.
#[must_use]
pub fn drill_down_title(ctx: &DashboardContext, division: Option<&str>, year: YearFilter) -> String {
    let suffix = year.title_suffix(ctx.years());
    match division {
        Some(division) => format!("Crime Ranking in {division} ({suffix})"),
        None => format!("Citywide Crime Ranking ({suffix})"),
    }
}

/// Projects a ranking into the requested view mode.
#[must_use]
pub fn render_drill_down(
    ctx: &DashboardContext,
    ranking: &Ranking,
    mode: ViewMode,
) -> DrillDownPayload {
    let presentation = ctx.presentation();
    let view = match mode {
        ViewMode::Table => DrillDownView::Table {
            rows: table_rows(&ranking.entries, presentation.table_rows),
        },
        ViewMode::Pie => DrillDownView::Pie {
            slices: pie_slices(&ranking.entries, presentation.pie_slices),
        },
    };

    DrillDownPayload {
        title: drill_down_title(ctx, ranking.division.as_deref(), ranking.year),
        division: ranking.division.clone(),
        year: ranking.year,
        total: ranking.total,
        violent: ranking.violent,
        violent_ratio: violent_ratio(ranking.violent, ranking.total),
        view,
    }
}

/// Ranking rows, optionally capped.
#[must_use]
pub fn table_rows(entries: &[CategoryCount], limit: Option<usize>) -> Vec<RankingRow> {
    entries
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|c| RankingRow {
            description: c.description.clone(),
            count: c.count,
            category: c.class,
        })
        .collect()
}

/// The first `named` entries as slices, plus one [`OTHER_SLICE_LABEL`]
/// slice summing the rest (omitted when nothing is left over).
#[must_use]
pub fn pie_slices(entries: &[CategoryCount], named: usize) -> Vec<PieSlice> {
    let split = named.min(entries.len());
    let (head, tail) = entries.split_at(split);

    let mut slices: Vec<PieSlice> = head
        .iter()
        .map(|c| PieSlice {
            label: c.description.clone(),
            value: c.count,
        })
        .collect();

    let rest: u64 = tail.iter().map(|c| c.count).sum();
    if rest > 0 {
        slices.push(PieSlice {
            label: OTHER_SLICE_LABEL.to_string(),
            value: rest,
        });
    }

    slices
}

/// Choropleth values for every boundary division under `year`.
///
/// Divisions without incidents get `has_data = false` and a colour value
/// of zero. Aggregates for divisions without a boundary are dropped.
#[must_use]
pub fn render_choropleth(ctx: &DashboardContext, year: YearFilter) -> ChoroplethPayload {
    let hover = ctx.presentation().hover_categories;
    let aggregates = aggregate_divisions(ctx.incidents(), year, Some(hover));
    let join = ensure_divisions(aggregates, ctx.boundaries().ids(), year);

    for agg in &join.unmatched {
        log::debug!(
            "Division {} has {} incidents but no boundary; not drawn",
            agg.division,
            agg.total
        );
    }

    let values: Vec<ChoroplethValue> = join
        .matched
        .into_iter()
        .map(|agg| ChoroplethValue {
            name: ctx.division_name(&agg.division).to_string(),
            total: agg.total,
            violent: agg.violent,
            violent_ratio: agg.violent_ratio,
            value: agg.ratio_or_zero(),
            has_data: agg.total > 0,
            division: agg.division,
            top_categories: agg.top_categories,
        })
        .collect();

    let range_max = values
        .iter()
        .map(|v| v.value)
        .fold(MIN_RANGE_MAX, f64::max);

    ChoroplethPayload {
        year,
        values,
        range_max,
    }
}

/// Evenly strided sample of the incidents matching `year`, at most
/// `limit` points.
#[must_use]
pub fn render_hotspots(ctx: &DashboardContext, year: YearFilter) -> HotspotPayload {
    let matching: Vec<_> = ctx
        .incidents()
        .iter()
        .filter(|i| year.matches(i.year))
        .collect();
    let population = matching.len();
    let limit = ctx.presentation().hotspot_limit;

    let points: Vec<HotspotPoint> = stride_indices(population, limit)
        .map(|i| {
            let incident = matching[i];
            HotspotPoint {
                latitude: incident.latitude,
                longitude: incident.longitude,
                weight: u8::from(incident.is_violent()),
                division: incident.division.clone(),
                description: incident.description.clone(),
            }
        })
        .collect();

    if points.len() < population {
        log::debug!(
            "Sampled {} of {population} incidents for the density layer",
            points.len()
        );
    }

    HotspotPayload {
        year,
        population: population as u64,
        points,
    }
}

/// Indices of an even sample of `min(len, limit)` items out of `len`.
fn stride_indices(len: usize, limit: usize) -> impl Iterator<Item = usize> {
    let take = len.min(limit);
    (0..take).map(move |k| k * len / take)
}

/// Assembles a map payload from already rendered layers.
#[must_use]
pub fn assemble_map(
    ctx: &DashboardContext,
    layer: MapLayer,
    choropleth: &ChoroplethPayload,
    hotspots: Option<&HotspotPayload>,
) -> MapPayload {
    MapPayload {
        layer,
        choropleth: layer.shows_choropleth().then(|| choropleth.clone()),
        hotspots: if layer.shows_density() {
            hotspots.cloned()
        } else {
            None
        },
        settings: ctx.map_settings().clone(),
    }
}

#[cfg(test)]
mod tests {
    use crime_dashboard_crime_models::CrimeClass;

    use super::*;
    use crate::context::tests::context;

    fn count(description: &str, count: u64) -> CategoryCount {
        CategoryCount {
            description: description.to_string(),
            count,
            class: CrimeClass::Property,
        }
    }

    #[test]
    fn choropleth_marks_divisions_without_data() {
        let ctx = context();
        let map = render_choropleth(&ctx, YearFilter::Year(2023));

        assert_eq!(map.values.len(), 2);
        let central = map.values.iter().find(|v| v.division == "CENTRAL").unwrap();
        assert!(!central.has_data);
        assert_eq!(central.violent_ratio, None);
        assert!(central.value.abs() < f64::EPSILON);

        let seventy_seventh = map.values.iter().find(|v| v.division == "77TH STREET").unwrap();
        assert!(seventy_seventh.has_data);
        assert_eq!(seventy_seventh.violent_ratio, Some(1.0));
        assert_eq!(seventy_seventh.name, "77th Street");
        assert!((map.range_max - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn choropleth_values_follow_boundary_order() {
        let ctx = context();
        let map = render_choropleth(&ctx, YearFilter::All);
        let order: Vec<&str> = map.values.iter().map(|v| v.division.as_str()).collect();
        assert_eq!(order, vec!["77TH STREET", "CENTRAL"]);
        for value in &map.values {
            assert!(value.top_categories.len() <= ctx.presentation().hover_categories);
            assert!((0.0..=1.0).contains(&value.value));
        }
    }

    #[test]
    fn citywide_title_and_ranking() {
        let ctx = context();
        let ranking = compute_ranking(&ctx, None, YearFilter::All);
        assert_eq!(ranking.total, ctx.incidents().len() as u64);

        let payload = render_drill_down(&ctx, &ranking, ViewMode::Table);
        assert_eq!(payload.title, "Citywide Crime Ranking (All 2020–2024)");
        let DrillDownView::Table { rows } = payload.view else {
            panic!("expected table view");
        };
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows.iter().map(|r| r.count).sum::<u64>(), ranking.total);
    }

    #[test]
    fn division_title_uses_year() {
        let ctx = context();
        assert_eq!(
            drill_down_title(&ctx, Some("CENTRAL"), YearFilter::Year(2022)),
            "Crime Ranking in CENTRAL (2022)"
        );
    }

    #[test]
    fn seventy_seventh_street_2021_drill_down() {
        let ctx = context();
        let ranking = compute_ranking(&ctx, Some("77TH STREET"), YearFilter::Year(2021));
        let payload = render_drill_down(&ctx, &ranking, ViewMode::Table);

        assert_eq!(payload.total, 3);
        assert_eq!(payload.violent, 2);
        assert!((payload.violent_ratio.unwrap() - 0.667).abs() < 1e-3);

        let DrillDownView::Table { rows } = payload.view else {
            panic!("expected table view");
        };
        assert_eq!(rows[0].description, "ASSAULT WITH DEADLY WEAPON, AGGRAVATED ASSAULT");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].category, CrimeClass::Violent);
        assert_eq!(rows[1].description, "BURGLARY");
        assert_eq!(rows[1].category, CrimeClass::Property);
    }

    #[test]
    fn empty_drill_down_for_division_without_incidents() {
        let ctx = context();
        let ranking = compute_ranking(&ctx, Some("CENTRAL"), YearFilter::Year(2023));
        assert!(ranking.entries.is_empty());
        let payload = render_drill_down(&ctx, &ranking, ViewMode::Pie);
        assert_eq!(payload.view, DrillDownView::Pie { slices: vec![] });
        assert_eq!(payload.violent_ratio, None);
    }

    #[test]
    fn pie_collapses_tail_into_other() {
        let entries = vec![count("A", 5), count("B", 3), count("C", 2), count("D", 1)];
        let slices = pie_slices(&entries, 2);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[2].label, OTHER_SLICE_LABEL);
        assert_eq!(slices[2].value, 3);
        assert_eq!(slices.iter().map(|s| s.value).sum::<u64>(), 11);

        let slices = pie_slices(&entries, 10);
        assert_eq!(slices.len(), 4);
        assert!(slices.iter().all(|s| s.label != OTHER_SLICE_LABEL));
    }

    #[test]
    fn table_rows_respect_limit() {
        let entries = vec![count("A", 5), count("B", 3), count("C", 2)];
        assert_eq!(table_rows(&entries, None).len(), 3);
        assert_eq!(table_rows(&entries, Some(2)).len(), 2);
    }

    #[test]
    fn stride_sample_is_even_and_bounded() {
        let indices: Vec<usize> = stride_indices(10, 4).collect();
        assert_eq!(indices, vec![0, 2, 5, 7]);
        assert_eq!(stride_indices(3, 10).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(stride_indices(0, 10).count(), 0);
    }

    #[test]
    fn hotspots_weight_violent_incidents() {
        let ctx = context();
        let hotspots = render_hotspots(&ctx, YearFilter::Year(2021));
        assert_eq!(hotspots.population, 3);
        assert_eq!(hotspots.points.len(), 3);
        assert_eq!(hotspots.points.iter().filter(|p| p.weight == 1).count(), 2);
    }

    #[test]
    fn map_layers_select_payload_parts() {
        let ctx = context();
        let choropleth = render_choropleth(&ctx, YearFilter::All);
        let hotspots = render_hotspots(&ctx, YearFilter::All);

        let map = assemble_map(&ctx, MapLayer::Choropleth, &choropleth, Some(&hotspots));
        assert!(map.choropleth.is_some());
        assert!(map.hotspots.is_none());

        let map = assemble_map(&ctx, MapLayer::Both, &choropleth, Some(&hotspots));
        assert!(map.choropleth.is_some());
        assert!(map.hotspots.is_some());
        assert!((map.settings.opacity - 0.45).abs() < f64::EPSILON);
    }
}
