// src/io/mde.rs
// SIESTA .MDE: one row of energies per MD step.
// COLUMNS ARE Step, T (K), E_KS (eV), E_tot (eV), Vol (A^3), P (kBar)

use super::registry::{FileContent, FileReader, Registry};
use crate::error::{Error, Result};
use crate::model::PropertyTable;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

/// Column names in file order. The Kohn-Sham energy is the potential energy
/// of the step, hence `E_pot`.
pub const MDE_COLUMNS: [&str; 6] = ["step", "temperature", "E_pot", "E_tot", "volume", "pressure"];

pub fn parse<R: BufRead>(reader: R) -> Result<PropertyTable> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let data = line.split('#').next().unwrap_or("").trim();
        if data.is_empty() {
            continue;
        }

        let row = data
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| Error::parse("MDE", idx + 1, format!("invalid number '{}'", tok)))
            })
            .collect::<Result<Vec<f64>>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(Error::parse(
                    "MDE",
                    idx + 1,
                    format!("expected {} columns, found {}", first.len(), row.len()),
                ));
            }
        }
        rows.push(row);
    }

    let width = rows.first().map_or(0, Vec::len);
    Ok(PropertyTable::new(column_names(width), rows))
}

fn column_names(width: usize) -> Vec<String> {
    (0..width)
        .map(|i| match MDE_COLUMNS.get(i) {
            Some(name) => name.to_string(),
            None => format!("column_{}", i),
        })
        .collect()
}

pub struct MdeReader;

impl FileReader for MdeReader {
    fn read(&self, path: &Path) -> Result<FileContent> {
        let file = File::open(path)?;
        let table = parse(io::BufReader::new(file))?;
        log::info!("read {} MDE rows from {}", table.n_rows(), path.display());
        Ok(FileContent::Properties(table))
    }

    fn key(&self) -> &'static str {
        "siesta_MDE"
    }
}

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register("siesta", "MDE", || Box::new(MdeReader))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Step     T (K)     E_KS (eV)        E_tot (eV)    Vol (A^3)    P (kBar)
     1   300.000   -465.912345   -465.834567     1000.000     12.345
     2   298.120   -465.905432   -465.834601     1000.000     11.002

     3   295.700   -465.897654   -465.834590     1000.000      9.876  # last
";

    #[test]
    fn test_parse_columns() {
        let table = parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.columns, MDE_COLUMNS.to_vec());
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.column("step"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(table.column("E_pot").unwrap()[2], -465.897654);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = parse("1 2 3\n1 2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_extra_columns_get_generic_names() {
        let table = parse("1 2 3 4 5 6 7\n".as_bytes()).unwrap();
        assert_eq!(table.columns[6], "column_6");
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert!(parse("1 300 abc\n".as_bytes()).is_err());
    }
}
