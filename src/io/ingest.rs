//! CSV ingest.
//!
//! Turns a flat table of `(title, X_Value, Y_Value, X_Variable, Y_Variable, …)`
//! rows into a [`CurveRepository`].
//!
//! Design goals:
//! - **Strict schema** for the required columns (a missing column fails the load)
//! - **Row-level tolerance**: rows with a missing/non-numeric X or Y are dropped
//!   entirely, never coerced; the drop count is reported
//! - **Order preservation**: curves appear in first-title order and samples stay
//!   in row order, because sample order defines the fit parameterization
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::data::CurveRepository;
use crate::domain::{
    COL_TITLE, COL_X_VALUE, COL_X_VARIABLE, COL_Y_VALUE, COL_Y_VARIABLE, Curve, Sample,
};
use crate::error::LoadError;

/// A row dropped during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// 1-based line number in the file (header is line 1).
    pub line: usize,
    pub reason: String,
}

/// Summary of what happened to the input rows.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_used: usize,
    pub dropped: Vec<DroppedRow>,
}

/// Ingest output: the repository plus row accounting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub repository: CurveRepository,
    pub report: IngestReport,
    pub source: PathBuf,
}

impl IngestedData {
    /// No curves, no rows; used when `source` could not be loaded.
    pub fn empty(source: &Path) -> Self {
        Self {
            repository: CurveRepository::empty(),
            report: IngestReport::default(),
            source: source.to_path_buf(),
        }
    }
}

/// Load a dataset from a CSV file.
pub fn load_dataset(path: &Path) -> Result<IngestedData, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::DataParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;
    read_dataset(file, path)
}

/// Load a dataset from any reader; `source` is used for messages only.
pub fn read_dataset<R: Read>(input: R, source: &Path) -> Result<IngestedData, LoadError> {
    let parse_err = |message: String| LoadError::DataParse {
        path: source.to_path_buf(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| parse_err(format!("failed to read CSV headers: {e}")))?
        .clone();

    let columns = Columns::resolve(&headers).map_err(parse_err)?;

    let mut builders: Vec<CurveBuilder> = Vec::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();
    let mut report = IngestReport::default();

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, and lines are 1-based.
        let line = idx + 2;
        report.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report.dropped.push(DroppedRow {
                    line,
                    reason: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let row = match columns.parse_row(&record) {
            Ok(row) => row,
            Err(reason) => {
                debug!(line, %reason, "dropping row");
                report.dropped.push(DroppedRow { line, reason });
                continue;
            }
        };

        report.rows_used += 1;
        match by_title.get(&row.title) {
            Some(&i) => builders[i].samples.push(row.sample),
            None => {
                by_title.insert(row.title.clone(), builders.len());
                builders.push(CurveBuilder {
                    samples: vec![row.sample],
                    first: row,
                });
            }
        }
    }

    if !report.dropped.is_empty() {
        warn!(
            source = %source.display(),
            dropped = report.dropped.len(),
            rows_read = report.rows_read,
            "dropped rows with missing or non-numeric values"
        );
    }

    let curves: Vec<Curve> = builders.into_iter().map(CurveBuilder::finish).collect();
    info!(
        source = %source.display(),
        curves = curves.len(),
        rows_used = report.rows_used,
        "dataset loaded"
    );

    Ok(IngestedData {
        repository: CurveRepository::new(curves, columns.attribute_names()),
        report,
        source: source.to_path_buf(),
    })
}

/// Column positions resolved from the header row.
struct Columns {
    title: usize,
    x_value: usize,
    y_value: usize,
    x_variable: usize,
    y_variable: usize,
    /// `(display name, index)` for every non-sample column except `title`.
    attributes: Vec<(String, usize)>,
    title_name: String,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, String> {
        let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
        let find = |wanted: &str| {
            names
                .iter()
                .position(|n| n.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| format!("missing required column: `{wanted}`"))
        };

        let title = find(COL_TITLE)?;
        let x_value = find(COL_X_VALUE)?;
        let y_value = find(COL_Y_VALUE)?;
        let x_variable = find(COL_X_VARIABLE)?;
        let y_variable = find(COL_Y_VARIABLE)?;

        let sample_cols = [title, x_value, y_value, x_variable, y_variable];
        let attributes = names
            .iter()
            .enumerate()
            .filter(|(i, n)| !sample_cols.contains(i) && !n.is_empty())
            .map(|(i, n)| (n.clone(), i))
            .collect();

        Ok(Self {
            title,
            x_value,
            y_value,
            x_variable,
            y_variable,
            attributes,
            title_name: names[title].clone(),
        })
    }

    /// Attribute column names as exposed by the repository (title first).
    fn attribute_names(&self) -> Vec<String> {
        std::iter::once(self.title_name.clone())
            .chain(self.attributes.iter().map(|(n, _)| n.clone()))
            .collect()
    }

    fn parse_row(&self, record: &StringRecord) -> Result<Row, String> {
        let title = get_cell(record, self.title)
            .ok_or_else(|| "missing `title`".to_string())?
            .to_string();
        let x = parse_f64(get_cell(record, self.x_value))
            .ok_or_else(|| "missing or non-numeric `X_Value`".to_string())?;
        let y = parse_f64(get_cell(record, self.y_value))
            .ok_or_else(|| "missing or non-numeric `Y_Value`".to_string())?;

        let attributes = self
            .attributes
            .iter()
            .map(|(name, i)| (name.clone(), get_cell(record, *i).map(str::to_string)))
            .collect();

        Ok(Row {
            title,
            sample: Sample::new(x, y),
            x_variable: get_cell(record, self.x_variable).unwrap_or_default().to_string(),
            y_variable: get_cell(record, self.y_variable).unwrap_or_default().to_string(),
            attributes,
        })
    }
}

struct Row {
    title: String,
    sample: Sample,
    x_variable: String,
    y_variable: String,
    attributes: Vec<(String, Option<String>)>,
}

/// Accumulates one curve; axis names and attributes come from its first row.
struct CurveBuilder {
    first: Row,
    samples: Vec<Sample>,
}

impl CurveBuilder {
    fn finish(self) -> Curve {
        Curve {
            title: self.first.title,
            samples: self.samples,
            x_variable: self.first.x_variable,
            y_variable: self.first.y_variable,
            attributes: self.first.attributes,
        }
    }
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, `title` will look missing.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Non-empty cell, treating `nan` spellings as missing.
fn get_cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
}

fn parse_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
title,geometry,X_Value,Y_Value,X_Variable,Y_Variable,critmat
A,sphere,0,0,Diameter in,critmass kg,U
A,sphere,1,1,Diameter in,critmass kg,U
B,slab,5,2,Thickness in,critconc g/L,Pu
A,sphere,2,4,Diameter in,critmass kg,U
A,sphere,oops,5,Diameter in,critmass kg,U
A,sphere,3,9,Diameter in,critmass kg,U
C,cylinder,,1,Height in,critmass kg,
C,cylinder,1,nan,Height in,critmass kg,
";

    fn load(text: &str) -> IngestedData {
        read_dataset(text.as_bytes(), Path::new("test.csv")).unwrap()
    }

    #[test]
    fn groups_rows_by_title_in_order() {
        let data = load(CSV);
        let repo = &data.repository;
        let titles: Vec<&str> = repo.curves().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);

        let (samples, x, y) = repo.samples_for("A").unwrap();
        let pts: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, s.y)).collect();
        assert_eq!(pts, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 9.0)]);
        assert_eq!(x, "Diameter in");
        assert_eq!(y, "critmass kg");
    }

    #[test]
    fn non_numeric_rows_are_dropped_and_counted() {
        let data = load(CSV);
        assert_eq!(data.report.rows_read, 8);
        assert_eq!(data.report.rows_used, 5);
        let lines: Vec<usize> = data.report.dropped.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![6, 8, 9]);
        // Curve C lost every row, so it does not exist.
        assert!(data.repository.curve("C").is_none());
    }

    #[test]
    fn attributes_come_from_first_row() {
        let data = load(CSV);
        let meta = data.repository.metadata_for("B").unwrap();
        assert_eq!(
            meta,
            vec![
                ("title".to_string(), Some("B".to_string())),
                ("geometry".to_string(), Some("slab".to_string())),
                ("critmat".to_string(), Some("Pu".to_string())),
            ]
        );
        assert_eq!(data.repository.attribute_columns(), &["title", "geometry", "critmat"]);
    }

    #[test]
    fn missing_required_column_is_a_parse_error() {
        let err = read_dataset("title,X_Value,Y_Value\nA,1,2\n".as_bytes(), Path::new("bad.csv"))
            .unwrap_err();
        match err {
            LoadError::DataParse { message, .. } => assert!(message.contains("X_Variable")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bom_and_header_case_are_tolerated() {
        let text = "\u{feff}TITLE,x_value,Y_VALUE,X_Variable,Y_Variable\nA,1,2,a,b\n";
        let data = load(text);
        assert_eq!(data.repository.len(), 1);
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(matches!(load_dataset(&path), Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let data = load_dataset(file.path()).unwrap();
        assert_eq!(data.repository.len(), 2);
        assert_eq!(data.source, file.path());
    }
}
