//! CSV ingestion: one source file → ordered feature records.
//!
//! Headers are matched ignoring case and whitespace ("Center Latitude" and
//! "centerlatitude" are the same column). Unknown columns such as `Target`
//! or `Feature_ID` are ignored. A bad cell never fails the load: numbers that
//! do not parse become NaN, and rows with nothing usable are dropped.

use super::types::{FeatureRecord, LoadError};
use crate::coords::CoordinateSystem;
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    FeatureName,
    Diameter,
    CenterLatitude,
    CenterLongitude,
    CoordinateSystem,
    Origin,
    FeatureType,
    ApprovalDate,
    ApprovalStatus,
}

impl Column {
    fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{feff}')
            .collect::<String>()
            .to_ascii_lowercase();
        let column = match key.as_str() {
            "featurename" => Self::FeatureName,
            "diameter" => Self::Diameter,
            "centerlatitude" => Self::CenterLatitude,
            "centerlongitude" => Self::CenterLongitude,
            "coordinatesystem" => Self::CoordinateSystem,
            "origin" => Self::Origin,
            "featuretype" => Self::FeatureType,
            "approvaldate" => Self::ApprovalDate,
            "approvalstatus" => Self::ApprovalStatus,
            _ => return None,
        };
        Some(column)
    }
}

/// Derive the body identifier from a source path: "data/Mars.csv" → "mars".
pub fn body_id_for(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_lowercase())
        .filter(|id| !id.is_empty())
}

/// Load one source file, skipping `skip_lines` preamble lines first.
pub fn load_source(path: &Path, skip_lines: usize) -> Result<Vec<FeatureRecord>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);
    skip_preamble(&mut reader, skip_lines).map_err(io_err)?;

    read_features(reader).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Drop the first `count` lines. Stops early at end of input.
pub fn skip_preamble<R: BufRead>(reader: &mut R, count: usize) -> io::Result<()> {
    let mut line = Vec::new();
    for _ in 0..count {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
    }
    Ok(())
}

/// Parse CSV (header row first) into feature records, in source order.
pub fn read_features<R: Read>(reader: R) -> Result<Vec<FeatureRecord>, csv::Error> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Option<Column>> = csv.headers()?.iter().map(Column::from_header).collect();

    let mut records = Vec::new();
    for row in csv.records() {
        if let Some(record) = parse_row(&columns, &row?) {
            records.push(record);
        }
    }
    Ok(records)
}

fn parse_row(columns: &[Option<Column>], row: &StringRecord) -> Option<FeatureRecord> {
    let cells: HashMap<Column, &str> = columns
        .iter()
        .zip(row.iter())
        .filter_map(|(column, value)| {
            let value = value.trim();
            match column {
                Some(column) if !value.is_empty() => Some((*column, value)),
                _ => None,
            }
        })
        .collect();

    if cells.is_empty() {
        return None;
    }

    let name = cells.get(&Column::FeatureName)?.to_string();
    let text = |column| cells.get(&column).map(|s| s.to_string());
    let number = |column| cells.get(&column).map_or(f64::NAN, |s| coerce_number(s));

    Some(FeatureRecord {
        name,
        diameter: number(Column::Diameter),
        center_latitude: number(Column::CenterLatitude),
        center_longitude: number(Column::CenterLongitude),
        coordinate_system: cells
            .get(&Column::CoordinateSystem)
            .map_or(CoordinateSystem::Unspecified, |tag| CoordinateSystem::from_tag(tag)),
        origin: text(Column::Origin).unwrap_or_default(),
        feature_type: text(Column::FeatureType),
        approval_date: cells.get(&Column::ApprovalDate).map(|s| coerce_number(s)),
        approval_status: text(Column::ApprovalStatus),
    })
}

/// Lenient numeric coercion: anything unparsable is NaN.
fn coerce_number(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;
    use tempfile::TempDir;

    const MARS_CSV: &str = "\
Feature_ID,Feature Name,Target,Diameter,Center Latitude,Center Longitude,Coordinate System,Feature Type,Approval Status,Approval Date,Origin
1,Gale,Mars,154.73,-5.37,137.81,Planetocentric +East 0 - 360,Crater,Adopted by IAU,1991,Walter Frederick Gale
2,Jezero,Mars,47.56,18.38,77.58,Planetocentric +East 0 - 360,Crater,Adopted by IAU,1979,Town in Bosnia and Herzegovina
";

    #[test]
    fn test_read_recognized_columns() {
        let records = read_features(Cursor::new(MARS_CSV)).unwrap();
        assert_eq!(records.len(), 2);

        let gale = &records[0];
        assert_eq!(gale.name, "Gale");
        assert_relative_eq!(gale.diameter, 154.73);
        assert_relative_eq!(gale.center_latitude, -5.37);
        assert_relative_eq!(gale.center_longitude, 137.81);
        assert_eq!(gale.coordinate_system, CoordinateSystem::PlanetocentricEast0to360);
        assert_eq!(gale.feature_type.as_deref(), Some("Crater"));
        assert_eq!(gale.approval_status.as_deref(), Some("Adopted by IAU"));
        assert_eq!(gale.approval_date, Some(1991.0));
        assert_eq!(gale.origin, "Walter Frederick Gale");

        assert_eq!(records[1].name, "Jezero");
    }

    #[test]
    fn test_header_matching_ignores_case_and_spaces() {
        let csv = "  FEATURE  name ,diameter,CenterLatitude, center longitude \nArsia Mons,435.75,-8.26,239.91\n";
        let records = read_features(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Arsia Mons");
        assert_relative_eq!(records[0].center_longitude, 239.91);
        assert_eq!(records[0].coordinate_system, CoordinateSystem::Unspecified);
        assert_eq!(records[0].feature_type, None);
        assert_eq!(records[0].origin, "");
    }

    #[test]
    fn test_header_with_byte_order_mark() {
        let csv = "\u{feff}Feature Name,Diameter\nGale,154.73\n";
        let records = read_features(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Gale");
        assert_relative_eq!(records[0].diameter, 154.73);
    }

    #[test]
    fn test_bad_numbers_become_nan() {
        let csv = "Feature Name,Diameter,Center Latitude,Center Longitude\nOdd,n/a,,12.0\n";
        let records = read_features(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].diameter.is_nan());
        assert!(records[0].center_latitude.is_nan());
        assert_relative_eq!(records[0].center_longitude, 12.0);
    }

    #[test]
    fn test_empty_rows_dropped() {
        let csv = "Feature Name,Target,Diameter\nGale,Mars,154\n,,\n,Mars,\nHolden,Mars,153\n\n";
        let records = read_features(Cursor::new(csv)).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Gale", "Holden"]);
    }

    #[test]
    fn test_row_without_name_dropped() {
        let csv = "Feature Name,Diameter\n   ,12\nEberswalde,65.3\n";
        let records = read_features(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Eberswalde");
    }

    #[test]
    fn test_short_and_long_rows_tolerated() {
        let csv = "Feature Name,Diameter,Origin\nShort\nLong,10,Someone,extra,cells\n";
        let records = read_features(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].diameter.is_nan());
        assert_eq!(records[1].origin, "Someone");
    }

    #[test]
    fn test_skip_preamble() {
        let mut input = Cursor::new("Exported from the gazetteer\nSecond line\nrest\n");
        skip_preamble(&mut input, 2).unwrap();
        let mut rest = String::new();
        input.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "rest\n");
    }

    #[test]
    fn test_skip_preamble_past_end() {
        let mut input = Cursor::new("only\n");
        skip_preamble(&mut input, 5).unwrap();
    }

    #[test]
    fn test_load_source_with_preamble() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mars.csv");
        std::fs::write(&path, format!("Mars nomenclature\n{}", MARS_CSV)).unwrap();

        let records = load_source(&path, 1).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Gale");
    }

    #[test]
    fn test_load_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_source(&dir.path().join("nope.csv"), 0).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_source_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, b"Feature Name,Diameter\n\xff\xfe,1\n").unwrap();
        let err = load_source(&path, 0).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn test_body_id_for() {
        assert_eq!(body_id_for(Path::new("data/Mars.csv")).as_deref(), Some("mars"));
        assert_eq!(body_id_for(Path::new("venus.csv")).as_deref(), Some("venus"));
        assert_eq!(body_id_for(Path::new("")), None);
    }
}
