// src/md/trajectory.rs
// Trajectory bundling the frames of an MD / phonon / geometry optimization
// run with its simulation parameters and per-step properties.

use super::simulation::RunKind;
use crate::error::{Error, Result};
use crate::io::{self, FileContent};
use crate::model::{FdfValue, ParameterMap, PropertyTable, Structure};
use crate::utils::linalg::{padded_box, scale_lattice};
use std::collections::HashSet;
use std::path::Path;

/// Column that is mirrored under the name `energy` on every snapshot.
pub const POTENTIAL_ENERGY_COLUMN: &str = "E_pot";
pub const ENERGY_ALIAS: &str = "energy";

// Estimated cells are 10% larger than the coordinate spread
const CELL_PADDING: f64 = 0.1;

pub fn default_parameters() -> ParameterMap {
    let mut defaults = ParameterMap::new();
    defaults.insert("md.typeofrun", FdfValue::Str("Verlet".to_string()));
    defaults
}

/// Frames accepted by [`Trajectory::new`]: one structure or a sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshots(pub Vec<Structure>);

impl From<Structure> for Snapshots {
    fn from(structure: Structure) -> Self {
        Snapshots(vec![structure])
    }
}

impl From<Vec<Structure>> for Snapshots {
    fn from(frames: Vec<Structure>) -> Self {
        Snapshots(frames)
    }
}

impl TryFrom<FileContent> for Snapshots {
    type Error = Error;

    fn try_from(content: FileContent) -> Result<Self> {
        match content {
            FileContent::Snapshots(frames) => Ok(Snapshots(frames)),
            other => Err(Error::validation(format!(
                "snapshots should be a structure or a sequence of structures, got {}",
                other.kind()
            ))),
        }
    }
}

/// Result of [`Trajectory::get_property`].
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyLookup {
    Values(Vec<f64>),
    /// No name was given: the properties that can be asked for
    Names(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct Trajectory {
    snapshots: Vec<Structure>,
    parameters: ParameterMap,
    properties: Option<PropertyTable>,
}

impl Trajectory {
    pub fn new<S>(
        snapshots: S,
        parameters: Option<ParameterMap>,
        properties: Option<PropertyTable>,
    ) -> Result<Self>
    where
        S: TryInto<Snapshots>,
        S::Error: Into<Error>,
    {
        let Snapshots(mut snapshots) = snapshots
            .try_into()
            .map_err(|e: S::Error| -> Error { e.into() })?;
        if snapshots.is_empty() {
            return Err(Error::validation("a trajectory needs at least one snapshot"));
        }

        let mut merged = default_parameters();
        if let Some(parameters) = parameters {
            merged.extend(parameters);
        }

        if let Some(table) = &properties {
            if table.n_rows() != snapshots.len() {
                return Err(Error::validation(format!(
                    "{} property rows for {} snapshots",
                    table.n_rows(),
                    snapshots.len()
                )));
            }
            for (i, snapshot) in snapshots.iter_mut().enumerate() {
                snapshot.results = table.row(i).unwrap_or_default();
                attach_energy_alias(&mut snapshot.results);
            }
        }

        Ok(Self {
            snapshots,
            parameters: merged,
            properties,
        })
    }

    pub fn snapshots(&self) -> &[Structure] {
        &self.snapshots
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn properties(&self) -> Option<&PropertyTable> {
        self.properties.as_ref()
    }

    /// Positions shaped (n_steps, n_atoms, 3)
    pub fn positions(&self) -> Vec<Vec<[f64; 3]>> {
        self.snapshots.iter().map(Structure::positions).collect()
    }

    pub fn chemical_symbols(&self) -> Vec<Vec<String>> {
        self.snapshots.iter().map(Structure::chemical_symbols).collect()
    }

    pub fn species(&self) -> Vec<Vec<String>> {
        self.chemical_symbols()
    }

    /// Simulation cell.
    ///
    /// Uses `LatticeConstant` x `LatticeVectors` when both parameters are
    /// present. Otherwise the cell is estimated as a box 10% larger than the
    /// coordinate spread over the whole run, which badly overestimates the
    /// cell when periodic coordinates are not wrapped.
    pub fn cell(&self) -> Result<[[f64; 3]; 3]> {
        if let (Some(constant), Some(vectors)) = (
            self.parameters.get("latticeconstant"),
            self.parameters.get("latticevectors"),
        ) {
            let a = constant.as_f64().ok_or_else(|| Error::InvalidParameter {
                key: "latticeconstant".to_string(),
                details: format!("expected a number, found '{}'", constant),
            })?;
            return Ok(scale_lattice(a, lattice_rows(vectors)?));
        }

        let points = self.snapshots.iter().flat_map(|s| s.atoms.iter().map(|a| a.position));
        padded_box(points, CELL_PADDING)
            .ok_or_else(|| Error::validation("cannot estimate a cell for a trajectory without atoms"))
    }

    /// Values of `name` for every step, or the available names when `name` is `None`.
    pub fn get_property(&self, name: Option<&str>) -> Result<PropertyLookup> {
        match name {
            Some(name) => self.property(name).map(PropertyLookup::Values),
            None => Ok(PropertyLookup::Names(self.property_names())),
        }
    }

    pub fn property(&self, name: &str) -> Result<Vec<f64>> {
        self.snapshots
            .iter()
            .map(|s| s.result(name).ok_or_else(|| Error::MissingProperty(name.to_string())))
            .collect()
    }

    pub fn property_names(&self) -> Vec<String> {
        self.snapshots[0].result_names()
    }

    pub fn n_steps(&self) -> usize {
        self.snapshots.len()
    }

    pub fn n_atoms(&self) -> usize {
        self.snapshots[0].atoms.len()
    }

    /// Unique symbols of the first snapshot. Species appearing only in later
    /// frames are not counted.
    pub fn n_species(&self) -> usize {
        self.snapshots[0]
            .atoms
            .iter()
            .map(|a| a.element.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// `MD.LengthTimeStep`, in the unit given in the file (fs by default in SIESTA)
    pub fn time_step(&self) -> Option<f64> {
        self.parameters.get_f64("md.lengthtimestep")
    }

    pub fn run_kind(&self) -> RunKind {
        RunKind::from_type_of_run(self.parameters.get_str("md.typeofrun").unwrap_or("verlet"))
    }
}

fn attach_energy_alias(results: &mut Vec<(String, f64)>) {
    let Some(energy) = results
        .iter()
        .find(|(k, _)| k == POTENTIAL_ENERGY_COLUMN)
        .map(|(_, v)| *v)
    else {
        return;
    };

    match results.iter_mut().find(|(k, _)| k == ENERGY_ALIAS) {
        Some(slot) => slot.1 = energy,
        None => results.push((ENERGY_ALIAS.to_string(), energy)),
    }
}

fn lattice_rows(value: &FdfValue) -> Result<[[f64; 3]; 3]> {
    let invalid = |details: &str| Error::InvalidParameter {
        key: "latticevectors".to_string(),
        details: details.to_string(),
    };

    let rows = value.as_block().ok_or_else(|| invalid("expected a %block"))?;
    if rows.len() != 3 {
        return Err(invalid(&format!("expected 3 rows, found {}", rows.len())));
    }

    let mut lattice = [[0.0; 3]; 3];
    for (i, row) in rows.iter().enumerate() {
        if row.len() < 3 {
            return Err(invalid(&format!("row {} has {} values", i + 1, row.len())));
        }
        for k in 0..3 {
            lattice[i][k] = row[k]
                .as_f64()
                .ok_or_else(|| invalid(&format!("non-numeric entry '{}' in row {}", row[k], i + 1)))?;
        }
    }
    Ok(lattice)
}

// ============================================================================
// READING
// ============================================================================

/// Reads a trajectory and, optionally, its property table and parameter file.
pub fn read_trajectory(
    trajectory_path: impl AsRef<Path>,
    property_path: Option<&Path>,
    parameter_path: Option<&Path>,
) -> Result<Trajectory> {
    read_trajectory_with_defaults(trajectory_path, property_path, parameter_path, &ParameterMap::new())
}

/// As [`read_trajectory`], with `defaults` layered under the file's parameters.
pub fn read_trajectory_with_defaults(
    trajectory_path: impl AsRef<Path>,
    property_path: Option<&Path>,
    parameter_path: Option<&Path>,
    defaults: &ParameterMap,
) -> Result<Trajectory> {
    let trajectory_path = trajectory_path.as_ref();
    require_file(trajectory_path, "trajectory")?;
    let snapshots = Snapshots::try_from(io::read(trajectory_path, "")?)?;

    let mut parameters = defaults.clone();
    if let Some(path) = parameter_path {
        require_file(path, "parameter")?;
        match io::read(path, "")? {
            FileContent::Parameters(p) => parameters.extend(p),
            other => {
                return Err(Error::validation(format!(
                    "{} holds {}, not simulation parameters",
                    path.display(),
                    other.kind()
                )))
            }
        }
    }

    let properties = match property_path {
        Some(path) => match io::read(require_file(path, "property")?, "")? {
            FileContent::Properties(table) => Some(table),
            other => {
                return Err(Error::validation(format!(
                    "{} holds {}, not a property table",
                    path.display(),
                    other.kind()
                )))
            }
        },
        None => None,
    };

    Trajectory::new(snapshots, Some(parameters), properties)
}

fn require_file<'a>(path: &'a Path, role: &str) -> Result<&'a Path> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::validation(format!(
            "requested {} file {} not found",
            role,
            path.display()
        )))
    }
}
