//! # Core Models Module
//!
//! Data structures describing one conformation of a single protein chain.
//!
//! - [`residue`] - A residue position with its amino-acid code, C-alpha coordinate and
//!   quality score
//! - [`structure`] - An ordered chain of residues tagged with its [`structure::StructureKind`]
//!
//! ```ignore
//! use ldtdeform::core::models::structure::{Structure, StructureKind};
//!
//! let structure = Structure::from_arrays(
//!     "model_1",
//!     StructureKind::Model,
//!     &[[0.0, 0.0, 0.0], [3.8, 0.0, 0.0]],
//!     &[0.92, 0.88],
//!     "GA",
//! )?;
//! ```

pub mod residue;
pub mod structure;
