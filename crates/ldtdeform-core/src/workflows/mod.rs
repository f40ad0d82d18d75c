//! # Workflows Module
//!
//! High-level entry points that orchestrate complete analyses.
//!
//! - **Deformation Workflow** ([`deformation`]) - Scores every residue of a target
//!   against a reference (structures or ensemble consensus).
//! - **Mutation Workflow** ([`mutation`]) - Locates substituted positions between two
//!   sequences and measures each residue's distance to the nearest one.

pub mod deformation;
pub mod mutation;
