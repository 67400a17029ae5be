//! Readers for the output of atomistic simulation codes.
//!
//! Files are read through a registry keyed by `(namespace, extension)`, so a
//! new code's dialect is added by registering readers, without touching the
//! dispatch in [`io::read`]. SIESTA is supported out of the box:
//!
//! - `.fdf` parameter files ([`io::fdf`])
//! - `.ANI` trajectories and plain `.xyz` ([`io::xyz`])
//! - `.MDE` per-step energies ([`io::mde`])
//!
//! [`md::read_trajectory`] ties the three together into a [`md::Trajectory`]:
//!
//! ```no_run
//! use std::path::Path;
//!
//! let t = ccmp_tools::md::read_trajectory(
//!     "run/water.ANI",
//!     Some(Path::new("run/water.MDE")),
//!     Some(Path::new("run/water.fdf")),
//! )?;
//! println!("{} steps, {} atoms", t.n_steps(), t.n_atoms());
//! let energies = t.property("energy")?;
//! # let _ = energies;
//! # Ok::<(), ccmp_tools::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod md;
pub mod model;
pub mod utils;

pub use error::{Error, Result};
pub use io::{read, FileContent};
pub use md::{read_trajectory, Trajectory};
