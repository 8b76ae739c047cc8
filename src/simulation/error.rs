//! Error kinds surfaced by the simulation and its registry

use thiserror::Error;

use super::registry::SimulationHandle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("simulation {0} not found")]
    UnknownSimulation(SimulationHandle),

    #[error("color not allowed: {0} (allowed: 1..=4)")]
    InvalidColor(u8),
}
