// src/utils/report.rs

use crate::io::FileContent;
use crate::md::{step_count, RunKind, Trajectory};
use crate::model::structure::Structure;
use crate::utils::linalg;
use serde::Serialize;

/// Machine-readable overview of a trajectory (`--json`)
#[derive(Debug, Clone, Serialize)]
pub struct TrajectorySummary {
    pub n_steps: usize,
    pub n_atoms: usize,
    pub n_species: usize,
    pub formula: String,
    pub run_kind: RunKind,
    pub declared_steps: Option<i64>,
    pub time_step: Option<f64>,
    pub cell: Option<[[f64; 3]; 3]>,
    pub cell_volume: Option<f64>,
    pub properties: Vec<String>,
    // (min, mean, max) per property
    pub property_ranges: Vec<(String, [f64; 3])>,
}

pub fn summarize(trajectory: &Trajectory) -> TrajectorySummary {
    let cell = match trajectory.cell() {
        Ok(cell) => Some(cell),
        Err(e) => {
            log::warn!("no cell for summary: {}", e);
            None
        }
    };

    let properties = trajectory.property_names();
    let property_ranges = properties
        .iter()
        .filter_map(|name| {
            let values = trajectory.property(name).ok()?;
            Some((name.clone(), min_mean_max(&values)?))
        })
        .collect();

    TrajectorySummary {
        n_steps: trajectory.n_steps(),
        n_atoms: trajectory.n_atoms(),
        n_species: trajectory.n_species(),
        formula: trajectory.snapshots()[0].formula.clone(),
        run_kind: trajectory.run_kind(),
        declared_steps: step_count(trajectory.parameters()),
        time_step: trajectory.time_step(),
        cell_volume: cell.map(linalg::cell_volume),
        cell,
        properties,
        property_ranges,
    }
}

fn min_mean_max(values: &[f64]) -> Option<[f64; 3]> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some([min, mean, max])
}

/// Text block printed by `ccmp trajectory`
pub fn trajectory_report(trajectory: &Trajectory, filename: &str) -> String {
    let s = summarize(trajectory);

    let mut out = String::new();
    out.push_str(&format!("File: {}\n", filename));
    out.push_str(&format!("Formula: {}\n", s.formula));
    out.push_str(&format!("Run: {:?}\n", s.run_kind));
    out.push_str(&format!(
        "Steps: {}   Atoms: {}   Species: {}\n",
        s.n_steps, s.n_atoms, s.n_species
    ));
    if let Some(declared) = s.declared_steps {
        out.push_str(&format!("Declared steps: {}\n", declared));
    }
    if let Some(dt) = s.time_step {
        out.push_str(&format!("Time step: {}\n", dt));
    }

    if let Some(cell) = s.cell {
        out.push_str("Cell:\n");
        for row in cell {
            out.push_str(&format!("  {:12.6} {:12.6} {:12.6}\n", row[0], row[1], row[2]));
        }
        if let Some(volume) = s.cell_volume {
            out.push_str(&format!("Volume: {:.4}\n", volume));
        }
    }

    if !s.property_ranges.is_empty() {
        out.push_str("--------------------------------------------------\n");
        out.push_str(&format!(
            "{:<14} {:>12} {:>12} {:>12}\n",
            "Property", "Min", "Mean", "Max"
        ));
        out.push_str("--------------------------------------------------\n");
        for (name, [min, mean, max]) in &s.property_ranges {
            out.push_str(&format!(
                "{:<14} {:>12.4} {:>12.4} {:>12.4}\n",
                name, min, mean, max
            ));
        }
    }

    out
}

/// Text block printed by `ccmp read`
pub fn content_report(content: &FileContent, filename: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("File: {}\n", filename));

    match content {
        FileContent::Snapshots(frames) => {
            out.push_str(&format!("Frames: {}\n", frames.len()));
            if let Some(first) = frames.first() {
                out.push_str(&structure_summary(first));
            }
        }
        FileContent::Parameters(params) => {
            out.push_str(&format!("Entries: {}\n", params.len()));
            for (key, value) in params.iter() {
                let text = value.to_string();
                let first_line = text.lines().next().unwrap_or("");
                let more = if text.lines().count() > 1 { " ..." } else { "" };
                out.push_str(&format!("{:<32} {}{}\n", key, first_line, more));
            }
        }
        FileContent::Properties(table) => {
            out.push_str(&format!("Rows: {}\n", table.n_rows()));
            out.push_str(&format!("Columns: {}\n", table.columns.join(", ")));
        }
    }

    out
}

// Atoms listed per frame before the table is cut short
const ATOM_ROWS: usize = 20;

/// Formula, cell and the leading atoms of one frame
pub fn structure_summary(structure: &Structure) -> String {
    let mut out = format!("Formula: {}   Atoms: {}\n", structure.formula, structure.atoms.len());
    if let Some(cell) = structure.lattice {
        out.push_str(&format!("Cell volume: {:.4}\n", linalg::cell_volume(cell)));
    }

    out.push_str(&format!("{:>6}  {:<4} {:>12} {:>12} {:>12}\n", "#", "El", "x", "y", "z"));
    for (i, atom) in structure.atoms.iter().enumerate().take(ATOM_ROWS) {
        let [x, y, z] = atom.position;
        out.push_str(&format!("{:>6}  {:<4} {:>12.6} {:>12.6} {:>12.6}\n", i + 1, atom.element, x, y, z));
    }

    let hidden = structure.atoms.len().saturating_sub(ATOM_ROWS);
    if hidden > 0 {
        out.push_str(&format!("({} more atoms not shown)\n", hidden));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Atom, PropertyTable};

    fn trajectory() -> Trajectory {
        let frames = vec![
            Structure::new(vec![Atom::new("Si", [0.0; 3]), Atom::new("O", [1.0, 1.0, 1.0])]),
            Structure::new(vec![Atom::new("Si", [0.0; 3]), Atom::new("O", [2.0, 2.0, 2.0])]),
        ];
        let table = PropertyTable::new(
            vec!["E_pot".into()],
            vec![vec![-3.0], vec![-1.0]],
        );
        Trajectory::new(frames, None, Some(table)).unwrap()
    }

    #[test]
    fn test_summary_ranges() {
        let s = summarize(&trajectory());
        assert_eq!(s.n_steps, 2);
        assert_eq!(s.formula, "OSi");
        assert_eq!(s.properties, vec!["E_pot", "energy"]);
        assert_eq!(s.property_ranges[1], ("energy".to_string(), [-3.0, -2.0, -1.0]));
        assert!((s.cell_volume.unwrap() - 2.2f64.powi(3)).abs() < 1e-9);
    }

    #[test]
    fn test_report_text() {
        let text = trajectory_report(&trajectory(), "run.ANI");
        assert!(text.starts_with("File: run.ANI\n"));
        assert!(text.contains("Steps: 2   Atoms: 2   Species: 2"));
        assert!(text.contains("energy"));
    }

    #[test]
    fn test_structure_summary_truncates() {
        let atoms = (0..25).map(|i| Atom::new("C", [i as f64, 0.0, 0.0])).collect();
        let text = structure_summary(&Structure::new(atoms));
        assert!(text.starts_with("Formula: C25   Atoms: 25\n"));
        assert!(text.contains("(5 more atoms not shown)"));
        assert_eq!(text.lines().count(), 1 + 1 + ATOM_ROWS + 1);
    }

    #[test]
    fn test_structure_summary_with_cell() {
        let frame = Structure::new(vec![Atom::new("Si", [0.0; 3]), Atom::new("O", [1.0, 0.0, 0.0])])
            .with_lattice([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);
        let text = structure_summary(&frame);
        assert!(text.starts_with("Formula: OSi   Atoms: 2\n"));
        assert!(text.contains("Cell volume: 8.0000"));
        assert!(!text.contains("not shown"));
    }

    #[test]
    fn test_summary_serializes() {
        let json = serde_json::to_value(summarize(&trajectory())).unwrap();
        assert_eq!(json["n_atoms"], 2);
        assert_eq!(json["run_kind"], "MolecularDynamics");
    }
}
