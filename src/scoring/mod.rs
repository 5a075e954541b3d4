//! Gentrification scoring.
//!
//! This module computes countywide medians per year, scores each tract's
//! year-over-year change against the county's median change, and extends
//! that to a full timeline cached per county session.

pub mod engine;
pub mod median;
pub mod timeline;
pub mod types;
