//! Geometric utilities used by the engine.
//!
//! [`geometry`] builds distance matrices and displacement vectors; [`superposition`]
//! computes the optimal rotation between two corresponding point sets.

pub mod geometry;
pub mod superposition;
