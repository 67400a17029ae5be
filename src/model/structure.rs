use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            element: element.into(),
            position,
        }
    }
}

/// One frame of a run: atoms plus the scalar results recorded for that step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    // Lattice vectors: [a_vec, b_vec, c_vec], only when the frame carries them
    pub lattice: Option<[[f64; 3]; 3]>,
    pub atoms: Vec<Atom>,
    // Chemical formula string (e.g. "SiO2")
    #[serde(skip)]
    pub formula: String,
    // Per-step results in column order, e.g. ("E_pot", -1234.5)
    #[serde(default)]
    pub results: Vec<(String, f64)>,
}

impl Structure {
    pub fn new(atoms: Vec<Atom>) -> Self {
        let formula = generate_formula(&atoms);
        Self {
            lattice: None,
            atoms,
            formula,
            results: Vec::new(),
        }
    }

    pub fn with_lattice(mut self, lattice: [[f64; 3]; 3]) -> Self {
        self.lattice = Some(lattice);
        self
    }

    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    pub fn chemical_symbols(&self) -> Vec<String> {
        self.atoms.iter().map(|a| a.element.clone()).collect()
    }

    pub fn result(&self, name: &str) -> Option<f64> {
        self.results
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    pub fn result_names(&self) -> Vec<String> {
        self.results.iter().map(|(key, _)| key.clone()).collect()
    }
}

pub fn generate_formula(atoms: &[Atom]) -> String {
    let mut counts = HashMap::new();
    for a in atoms {
        *counts.entry(a.element.clone()).or_insert(0) += 1;
    }
    let mut parts: Vec<_> = counts.into_iter().collect();
    parts.sort_by(|a, b| a.0.cmp(&b.0));
    parts
        .iter()
        .map(|(el, c)| {
            if *c > 1 {
                format!("{}{}", el, c)
            } else {
                el.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_sorted_by_element() {
        let atoms = vec![
            Atom::new("O", [0.0, 0.0, 0.0]),
            Atom::new("H", [0.96, 0.0, 0.0]),
            Atom::new("H", [-0.24, 0.93, 0.0]),
        ];
        assert_eq!(generate_formula(&atoms), "H2O");
    }

    #[test]
    fn test_result_lookup() {
        let mut s = Structure::new(vec![Atom::new("Si", [0.0; 3])]);
        s.results.push(("E_pot".to_string(), -10.5));
        assert_eq!(s.result("E_pot"), Some(-10.5));
        assert_eq!(s.result("energy"), None);
        assert_eq!(s.result_names(), vec!["E_pot".to_string()]);
    }
}
