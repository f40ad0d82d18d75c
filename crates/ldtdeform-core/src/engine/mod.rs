//! # Engine Module
//!
//! Derives local structural environments and scores how they change between two
//! states of a protein.
//!
//! ## Overview
//!
//! For every residue the engine determines a spatial neighborhood, records the
//! displacement vectors to its neighbors, and compares those vectors between a
//! reference and a target. Either side can be a single structure or the consensus of
//! an ensemble of conformations.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Neighbor cutoffs, quality thresholds, metric
//!   selection and normalization
//! - **Neighbor Graph** ([`neighbors`]) - Kind-dependent neighbor policies and
//!   per-residue neighbor lists
//! - **Local Distance Tensor** ([`tensor`]) - Ragged per-residue displacement tables
//! - **Local Geometry** ([`local`]) - The seam shared by single structures and ensembles
//! - **Ensemble Consensus** ([`consensus`]) - Rotation-aligned averaging over
//!   equivalent conformations
//! - **Metrics** ([`metrics`]) - `lddt`, `ldd`, `ntd`, `shear` and `strain`
//! - **Results** ([`result`]) - Per-residue score arrays keyed by metric
//! - **Progress Monitoring** ([`progress`]) - Phase and task callbacks for callers
//! - **Error Handling** ([`error`]) - Contract violations detected before scoring starts

pub mod config;
pub mod consensus;
pub mod error;
pub mod local;
pub mod metrics;
pub mod neighbors;
pub mod progress;
pub mod result;
pub mod tensor;
