// src/md/mod.rs
pub mod simulation;
pub mod trajectory;

pub use simulation::{step_count, RunKind, SiestaSimulation};
pub use trajectory::{
    default_parameters, read_trajectory, read_trajectory_with_defaults, PropertyLookup, Snapshots,
    Trajectory,
};
