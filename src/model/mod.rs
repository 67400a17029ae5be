//src/model/mod.rs
pub mod parameters;
pub mod properties;
pub mod structure;

// Re-exports for cleaner imports
pub use parameters::{FdfValue, ParameterMap};
pub use properties::PropertyTable;
pub use structure::{Atom, Structure};
