// src/md/simulation.rs
// A SIESTA run directory: the .ANI trajectory plus optional .MDE and .fdf.

use super::trajectory::{read_trajectory_with_defaults, Trajectory};
use crate::error::{Error, Result};
use crate::io::{locate, FileHint};
use crate::model::ParameterMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const TRAJECTORY_EXT: &str = ".ANI";
pub const PROPERTY_EXT: &str = ".MDE";
pub const PARAMETER_EXT: &str = ".fdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunKind {
    MolecularDynamics,
    Phonon,
    GeometryOptimization,
}

impl RunKind {
    /// Classifies a run from `MD.TypeOfRun`
    pub fn from_type_of_run(type_of_run: &str) -> Self {
        match type_of_run.to_lowercase().as_str() {
            "fc" => RunKind::Phonon,
            "cg" | "broyden" | "fire" => RunKind::GeometryOptimization,
            _ => RunKind::MolecularDynamics,
        }
    }
}

/// Number of MD steps declared in the parameters (inclusive of the first step).
/// `None` when the final step is missing or the count does not fit an `i64`.
pub fn step_count(parameters: &ParameterMap) -> Option<i64> {
    let initial = parameters.get_i64("md.initialtimestep");
    let last = parameters.get_i64("md.finaltimestep")?;
    match initial {
        Some(first) => last.checked_sub(first)?.checked_add(1),
        None => Some(last),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiestaSimulation {
    pub dir: PathBuf,
    pub trajectory_path: PathBuf,
    pub property_path: Option<PathBuf>,
    pub parameter_path: Option<PathBuf>,
}

impl SiestaSimulation {
    /// Resolves the files of a run in `dir`.
    ///
    /// The trajectory is required. Companions searched for and not found are
    /// absent; companions named explicitly must exist.
    pub fn open(
        dir: impl AsRef<Path>,
        trajectory: FileHint,
        properties: FileHint,
        parameters: FileHint,
    ) -> Result<Self> {
        let dir = dir.as_ref();

        let trajectory_path = match locate(dir, &trajectory, TRAJECTORY_EXT) {
            Some(path) if path.is_file() => path,
            _ => {
                return Err(Error::validation(format!(
                    "{} file not found in simulation directory {}",
                    TRAJECTORY_EXT,
                    dir.display()
                )))
            }
        };

        let sim = Self {
            dir: dir.to_path_buf(),
            trajectory_path,
            property_path: companion(dir, &properties, PROPERTY_EXT)?,
            parameter_path: companion(dir, &parameters, PARAMETER_EXT)?,
        };
        log::info!(
            "simulation in {}: trajectory {}, properties {}, parameters {}",
            dir.display(),
            sim.trajectory_path.display(),
            describe(&sim.property_path),
            describe(&sim.parameter_path)
        );
        Ok(sim)
    }

    /// Searches `dir` for all three files.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(dir, FileHint::Search, FileHint::Search, FileHint::Search)
    }

    pub fn trajectory(&self) -> Result<Trajectory> {
        self.trajectory_with_defaults(&ParameterMap::new())
    }

    pub fn trajectory_with_defaults(&self, defaults: &ParameterMap) -> Result<Trajectory> {
        read_trajectory_with_defaults(
            &self.trajectory_path,
            self.property_path.as_deref(),
            self.parameter_path.as_deref(),
            defaults,
        )
    }
}

fn companion(dir: &Path, hint: &FileHint, extension: &str) -> Result<Option<PathBuf>> {
    let found = locate(dir, hint, extension);
    match (hint, found) {
        (FileHint::Path(name), Some(path)) if !path.is_file() => Err(Error::validation(format!(
            "requested {} file {} not found",
            extension,
            dir.join(name).display()
        ))),
        (_, found) => Ok(found),
    }
}

fn describe(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string())
}
