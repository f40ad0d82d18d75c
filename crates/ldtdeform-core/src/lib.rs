//! # ldtdeform Core Library
//!
//! Quantifies local structural deformation between two states of the same protein by
//! comparing the geometry of every residue's spatial neighborhood.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Residue`, `Structure`) and pure
//!   geometry (pairwise distances, Kabsch superposition).
//!
//! - **[`engine`]: The Logic Core.** Derives neighbor graphs and local distance tensors,
//!   builds rotation-aligned ensemble consensus geometry, and implements the five
//!   per-residue deformation metrics (`lddt`, `ldd`, `ntd`, `shear`, `strain`).
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures: comparing two structures
//!   (or a structure and an ensemble consensus) and locating substituted positions.
//!
//! Per-residue numerical degeneracies never abort a computation; they surface as `NaN`
//! in the affected residue's score. Contract violations (mismatched lengths, empty
//! ensembles, invalid configuration) are rejected before any per-residue work starts.

pub mod core;
pub mod engine;
pub mod workflows;
