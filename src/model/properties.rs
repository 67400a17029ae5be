use serde::{Deserialize, Serialize};

/// Named numeric columns, one row per MD step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl PropertyTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Row `i` as (column, value) pairs in column order.
    pub fn row(&self, i: usize) -> Option<Vec<(String, f64)>> {
        let row = self.rows.get(i)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().copied())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PropertyTable {
        PropertyTable::new(
            vec!["step".into(), "E_pot".into()],
            vec![vec![1.0, -5.0], vec![2.0, -5.5]],
        )
    }

    #[test]
    fn test_column_extraction() {
        assert_eq!(table().column("E_pot"), Some(vec![-5.0, -5.5]));
        assert_eq!(table().column("missing"), None);
    }

    #[test]
    fn test_row_pairs_follow_column_order() {
        let row = table().row(1).unwrap();
        assert_eq!(row, vec![("step".to_string(), 2.0), ("E_pot".to_string(), -5.5)]);
        assert!(table().row(2).is_none());
    }
}
