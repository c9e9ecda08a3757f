//! Incident CSV reader.
//!
//! Reads every row of the incident CSV into a [`RawIncident`]. The header
//! row is checked up front; rows that can't be decoded are skipped and
//! counted so that one bad line never aborts the load.

use std::io::Read;
use std::path::Path;

use crime_dashboard_source_models::{COL_AREA, COL_AREA_NAME, REQUIRED_COLUMNS, RawIncident};

use crate::SourceError;

/// Result of reading the incident CSV.
#[derive(Debug, Clone, Default)]
pub struct LoadedIncidents {
    /// Successfully decoded rows, in file order.
    pub records: Vec<RawIncident>,
    /// Rows that could not be decoded (wrong field count, bad UTF-8).
    pub malformed: u64,
}

/// Reads the incident CSV at `path`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file can't be opened, the header row is
/// missing required columns, or an I/O error occurs mid-read.
pub fn load_incidents(path: &Path) -> Result<LoadedIncidents, SourceError> {
    log::info!("Loading incidents from {}", path.display());

    let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;

    read_incidents(file)
}

/// Reads incident rows from any CSV reader.
///
/// # Errors
///
/// Returns [`SourceError`] if the header row is missing required columns or
/// an I/O error occurs mid-read.
pub fn read_incidents<R: Read>(reader: R) -> Result<LoadedIncidents, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();
    check_headers(&headers)?;

    let mut loaded = LoadedIncidents::default();

    for (i, result) in reader.deserialize::<RawIncident>().enumerate() {
        match result {
            Ok(record) => loaded.records.push(record),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::debug!("Skipping malformed row {}: {e}", i + 1);
                loaded.malformed += 1;
            }
        }
    }

    if loaded.malformed > 0 {
        log::warn!("Skipped {} malformed rows", loaded.malformed);
    }
    log::info!("Read {} incident rows", loaded.records.len());

    Ok(loaded)
}

/// Verifies that every required column is present and that at least one
/// division column exists.
fn check_headers(headers: &[String]) -> Result<(), SourceError> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !has(c))
        .map(|c| (*c).to_string())
        .collect();

    if !has(COL_AREA_NAME) && !has(COL_AREA) {
        missing.push(format!("{COL_AREA_NAME} or {COL_AREA}"));
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SourceError::MissingColumns { columns: missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "DR_NO,Date Rptd,DATE OCC,TIME OCC,AREA,AREA NAME,Part 1-2,Crm Cd,Crm Cd Desc,LAT,LON";

    #[test]
    fn reads_rows_and_ignores_extra_columns() {
        let csv = format!(
            "{HEADER}\n\
             211507896,04/11/2021 12:00:00 AM,11/07/2020 12:00:00 AM,0845,15,N Hollywood,1,354,THEFT OF IDENTITY,34.2124,-118.4092\n\
             201516622,10/21/2020 12:00:00 AM,10/18/2020 12:00:00 AM,1845,15,N Hollywood,1,230,\"ASSAULT WITH DEADLY WEAPON, AGGRAVATED ASSAULT\",34.1993,-118.4203\n"
        );
        let loaded = read_incidents(csv.as_bytes()).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.malformed, 0);

        let second = &loaded.records[1];
        assert_eq!(second.record_number.as_deref(), Some("201516622"));
        assert_eq!(second.area_name.as_deref(), Some("N Hollywood"));
        assert_eq!(
            second.crime_description.as_deref(),
            Some("ASSAULT WITH DEADLY WEAPON, AGGRAVATED ASSAULT")
        );
        assert_eq!(second.part.as_deref(), Some("1"));
    }

    #[test]
    fn empty_fields_become_none() {
        let csv = format!("{HEADER}\n1,,01/01/2021,0100,01,Central,1,510,VEHICLE - STOLEN,,\n");
        let loaded = read_incidents(csv.as_bytes()).unwrap();
        let record = &loaded.records[0];
        assert!(record.lat.is_none());
        assert!(record.lon.is_none());
        assert_eq!(record.area.as_deref(), Some("01"));
    }

    #[test]
    fn skips_rows_with_wrong_field_count() {
        let csv = format!(
            "{HEADER}\n\
             1,x,01/01/2021,0100,01,Central,1,510,VEHICLE - STOLEN,34.05,-118.25\n\
             2,x,01/01/2021,0100,01,Central\n\
             3,x,01/02/2021,0100,01,Central,1,510,VEHICLE - STOLEN,34.05,-118.25\n"
        );
        let loaded = read_incidents(csv.as_bytes()).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.malformed, 1);
    }

    #[test]
    fn skips_rows_with_invalid_utf8() {
        let mut csv = format!("{HEADER}\n").into_bytes();
        csv.extend_from_slice(
            b"1,x,01/01/2021,0100,01,Central,1,510,VEHICLE - STOLEN,34.05,-118.25\n",
        );
        csv.extend_from_slice(b"2,x,01/01/2021,0100,01,Central,1,510,VEHICLE \xff STOLEN,34.05,-118.25\n");
        csv.extend_from_slice(
            b"3,x,01/02/2021,0100,01,Central,1,510,VEHICLE - STOLEN,34.05,-118.25\n",
        );

        let loaded = read_incidents(csv.as_slice()).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.malformed, 1);
        assert_eq!(loaded.records[1].record_number.as_deref(), Some("3"));
    }

    #[test]
    fn missing_required_columns_is_fatal() {
        let csv = "DR_NO,AREA NAME,Crm Cd Desc\n1,Central,ROBBERY\n";
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        match err {
            SourceError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["DATE OCC", "Part 1-2", "LAT", "LON"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn area_code_alone_satisfies_division_column() {
        let csv = "DATE OCC,AREA,Part 1-2,Crm Cd Desc,LAT,LON\n01/01/2021,01,1,ROBBERY,34.05,-118.25\n";
        let loaded = read_incidents(csv.as_bytes()).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.records[0].area_name.is_none());
    }

    #[test]
    fn missing_division_columns_is_fatal() {
        let csv = "DATE OCC,Part 1-2,Crm Cd Desc,LAT,LON\n";
        assert!(matches!(
            read_incidents(csv.as_bytes()),
            Err(SourceError::MissingColumns { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_incidents(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
