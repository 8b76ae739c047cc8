//! Registry of live simulations
//!
//! Maps opaque handles to exclusively owned avenues. A simulation lives from
//! `create` until the first `step` after its last car has left, which reports
//! the run summary and drops the avenue.

use log::info;
use std::collections::HashMap;
use std::fmt;

use super::config::SimulationConfig;
use super::error::SimError;
use super::snapshot::{InitialSnapshot, SimulationSummary, StepResult};
use super::world::SimAvenue;

/// Opaque identifier of a registered simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationHandle(u64);

impl fmt::Display for SimulationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

struct Session {
    steps: u64,
    avenue: SimAvenue,
}

#[derive(Default)]
pub struct SimulationRegistry {
    sessions: HashMap<SimulationHandle, Session>,
    next_handle: u64,
}

impl SimulationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new avenue and register it
    pub fn create(
        &mut self,
        config: SimulationConfig,
    ) -> Result<(SimulationHandle, InitialSnapshot), SimError> {
        let avenue = SimAvenue::new(config)?;
        let initial = avenue.initial_snapshot();

        let handle = SimulationHandle(self.next_handle);
        self.next_handle += 1;
        self.sessions.insert(handle, Session { steps: 0, avenue });

        info!("Registered simulation {}", handle);
        Ok((handle, initial))
    }

    /// Advance a simulation by one tick.
    ///
    /// Once every car has left, the call returns the run summary instead and
    /// the handle stops being valid.
    pub fn step(&mut self, handle: SimulationHandle) -> Result<StepResult, SimError> {
        let session = self
            .sessions
            .get_mut(&handle)
            .ok_or(SimError::UnknownSimulation(handle))?;

        // Cars still queued keep the run alive even when the grid is empty
        if !session.avenue.is_finished() {
            session.steps += 1;
            return Ok(StepResult::Snapshot(session.avenue.step()));
        }

        let session = self
            .sessions
            .remove(&handle)
            .ok_or(SimError::UnknownSimulation(handle))?;
        let summary = SimulationSummary::new(session.steps, session.avenue.total_cars());
        info!(
            "Simulation {} finished after {} steps ({:.3} cars/step)",
            handle, summary.total_steps, summary.cars_per_step
        );
        Ok(StepResult::Finished(summary))
    }

    pub fn active_car_count(&self, handle: SimulationHandle) -> Result<usize, SimError> {
        self.avenue(handle).map(SimAvenue::active_car_count)
    }

    pub fn is_finished(&self, handle: SimulationHandle) -> Result<bool, SimError> {
        self.avenue(handle).map(SimAvenue::is_finished)
    }

    /// Read-only access to a registered avenue
    pub fn avenue(&self, handle: SimulationHandle) -> Result<&SimAvenue, SimError> {
        self.sessions
            .get(&handle)
            .map(|session| &session.avenue)
            .ok_or(SimError::UnknownSimulation(handle))
    }

    pub fn contains(&self, handle: SimulationHandle) -> bool {
        self.sessions.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
