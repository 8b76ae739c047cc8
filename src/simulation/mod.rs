//! Avenue traffic simulation module
//!
//! This module contains the stepping engine: the grid, the traffic lights,
//! the cars and the avenue that schedules them, plus the registry that owns
//! live simulations. It has no rendering or transport dependencies.

mod car;
mod car_manager;
mod config;
mod error;
mod grid;
mod intersection;
mod registry;
mod road_network;
mod snapshot;
mod types;
mod world;

pub use car::{lane_is_clear, lane_score, CarProfile, CarUpdateResult, SimCar};
pub use car_manager::{PlannedCar, SpawnOutcome};
pub use config::SimulationConfig;
pub use error::SimError;
pub use grid::SimGrid;
pub use intersection::SimTrafficLight;
pub use registry::{SimulationHandle, SimulationRegistry};
pub use road_network::SimRoadway;
pub use snapshot::{
    CarPlacement, CarState, InitialSnapshot, LightState, RenderPos, SimulationSummary, StepResult,
    StepSnapshot,
};
pub use types::{
    CarColor, CarId, Direction, GridPos, LightId, LightPhase, SimId, AVENUE_LANES,
    DEFAULT_FLIP_INTERVAL, DEFAULT_LANE_LENGTH, DEFAULT_RAMP_LENGTH, INTERSECTION_COUNT,
    LANE_SCAN_RADIUS, LAST_LANE,
};
pub use world::SimAvenue;
