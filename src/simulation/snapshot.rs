//! Serializable views of a simulation for renderers
//!
//! Positions are expressed in renderer space: the grid's x stays x, the
//! grid's y becomes z, and y is always 0 (the road plane).

use serde::Serialize;

use super::types::{CarId, GridPos, LightId, LightPhase};

/// A position in renderer space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl From<GridPos> for RenderPos {
    fn from(pos: GridPos) -> Self {
        Self {
            x: pos.x,
            y: 0,
            z: pos.y,
        }
    }
}

/// Where a generated car will enter the grid once spawned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarPlacement {
    pub id: CarId,
    pub color: u8,
    pub pos: RenderPos,
}

/// Every car of the run with its intended entry cell, so a renderer can
/// create all vehicles up front
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSnapshot {
    pub car_initial_positions: Vec<CarPlacement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightState {
    pub id: LightId,
    pub main_phase: LightPhase,
    pub ramp_phase: LightPhase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarState {
    pub id: CarId,
    pub pos: RenderPos,
}

/// State of the avenue after one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSnapshot {
    pub tick: u64,
    pub traffic_lights: Vec<LightState>,
    pub cars: Vec<CarState>,
}

/// Final report once every car has left the avenue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_steps: u64,
    pub cars_per_step: f64,
    pub car_count: usize,
}

impl SimulationSummary {
    pub fn new(total_steps: u64, car_count: usize) -> Self {
        let cars_per_step = if total_steps == 0 {
            0.0
        } else {
            car_count as f64 / total_steps as f64
        };
        Self {
            total_steps,
            cars_per_step,
            car_count,
        }
    }
}

/// Outcome of stepping a registered simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepResult {
    Snapshot(StepSnapshot),
    Finished(SimulationSummary),
}
