//! # Core Module
//!
//! Stateless building blocks shared by the deformation engine.
//!
//! - **Molecular Representation** ([`models`]) - Residues, amino-acid codes and structures
//!   as supplied by the structure-loading collaborator.
//! - **Geometry** ([`utils`]) - Pairwise distance matrices, displacement vectors and
//!   optimal rigid superposition.
//!
//! Nothing in this module derives or caches anything; every function is a pure
//! transformation of its inputs.

pub mod models;
pub mod utils;
