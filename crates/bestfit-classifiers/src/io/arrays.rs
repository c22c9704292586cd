//! Numeric array artifacts: serialized `Array2` (JSON / bincode) or
//! header-less delimited text (CSV / TSV).
use std::path::Path;

use log::debug;

use crate::error::DataError;
use crate::math::Array2;
use crate::persistence::{load_object, save_object};

enum ArrayFormat {
    Serialized,
    Delimited(u8),
}

fn array_format(path: &Path) -> Result<ArrayFormat, DataError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("json") | Some("bin") => Ok(ArrayFormat::Serialized),
        Some("csv") => Ok(ArrayFormat::Delimited(b',')),
        Some("tsv") => Ok(ArrayFormat::Delimited(b'\t')),
        _ => Err(DataError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read a 2-D numeric array artifact. The format is chosen by extension.
pub fn read_array<P: AsRef<Path>>(path: P) -> Result<Array2<f32>, DataError> {
    let path = path.as_ref();
    let array = match array_format(path)? {
        ArrayFormat::Serialized => load_object(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?,
        ArrayFormat::Delimited(delimiter) => read_delimited(path, delimiter)?,
    };
    debug!("read {} with shape {:?}", path.display(), array.shape());
    Ok(array)
}

/// Write an array artifact as JSON or bincode (by extension).
pub fn write_array<P: AsRef<Path>>(path: P, array: &Array2<f32>) -> Result<(), DataError> {
    let path = path.as_ref();
    match array_format(path)? {
        ArrayFormat::Serialized => save_object(path, array).map_err(|source| DataError::Write {
            path: path.to_path_buf(),
            source,
        }),
        ArrayFormat::Delimited(_) => Err(DataError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Array2<f32>, DataError> {
    let parse_error = |line: usize, reason: String| DataError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| parse_error(0, e.to_string()))?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 1;
        let record = record.map_err(|e| parse_error(line, e.to_string()))?;
        let row = record
            .iter()
            .map(|field| {
                field
                    .parse::<f32>()
                    .map_err(|e| parse_error(line, format!("{:?}: {}", field, e)))
            })
            .collect::<Result<Vec<f32>, _>>()?;
        rows.push(row);
    }

    Ok(Array2::from_rows(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_and_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("train.csv");
        std::fs::write(&csv_path, "0.5, 1.0, 0\n1.5, 2.0, 1\n").unwrap();
        let arr = read_array(&csv_path).unwrap();
        assert_eq!(arr.shape(), (2, 3));
        assert_eq!(arr.row_slice(1), &[1.5, 2.0, 1.0]);

        let tsv_path = dir.path().join("test.tsv");
        std::fs::write(&tsv_path, "1\t2\n3\t4\n").unwrap();
        assert_eq!(read_array(&tsv_path).unwrap().shape(), (2, 2));
    }

    #[test]
    fn non_numeric_field_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "1,2\n3,abc\n").unwrap();
        match read_array(&path).unwrap_err() {
            DataError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn json_round_trip_through_write_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts").join("train_arr.json");
        let arr = Array2::from_shape_vec((2, 2), vec![1.0, 0.0, 2.0, 1.0]).unwrap();
        write_array(&path, &arr).unwrap();
        assert_eq!(read_array(&path).unwrap(), arr);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            read_array("train.parquet").unwrap_err(),
            DataError::UnsupportedFormat(_)
        ));
    }
}
