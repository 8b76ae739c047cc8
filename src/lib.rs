//! Avenue Traffic Simulation Library
//!
//! A grid-based simulation of a multi-lane one-way avenue merging with a
//! ramp, producing per-tick snapshots for external rendering.

pub mod simulation;
