//! Avenue layout that cars query while they move
//!
//! Owns the grid and the traffic lights. Cars only read from it during their
//! update; every mutation goes through the owning avenue.

use super::config::SimulationConfig;
use super::grid::SimGrid;
use super::intersection::SimTrafficLight;
use super::types::{Direction, GridPos, LightId, LAST_LANE};

#[derive(Debug, Clone)]
pub struct SimRoadway {
    pub(crate) grid: SimGrid,
    lights: Vec<SimTrafficLight>,
    intersections: Vec<GridPos>,
    first_lane: i32,
}

impl SimRoadway {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            grid: SimGrid::new(config.width() as i32, config.lane_length as i32),
            lights: Vec::new(),
            intersections: Vec::new(),
            first_lane: config.first_lane(),
        }
    }

    /// Registers a traffic light; its cell becomes an intersection
    pub fn add_light(&mut self, light: SimTrafficLight) {
        self.grid.place_light(light.id, light.position);
        self.intersections.push(light.position);
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[SimTrafficLight] {
        &self.lights
    }

    pub(crate) fn lights_mut(&mut self) -> &mut [SimTrafficLight] {
        &mut self.lights
    }

    pub fn intersections(&self) -> &[GridPos] {
        &self.intersections
    }

    pub fn grid(&self) -> &SimGrid {
        &self.grid
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn first_lane(&self) -> i32 {
        self.first_lane
    }

    /// Rightmost cell of the ramp, where ramp traffic enters
    pub fn ramp_entry_x(&self) -> i32 {
        self.width() - 1
    }

    pub fn direction_at(&self, pos: GridPos) -> Direction {
        Direction::at(pos)
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        self.grid.in_bounds(pos)
    }

    pub fn has_car(&self, pos: GridPos) -> bool {
        self.grid.has_car(pos)
    }

    pub fn is_intersection(&self, pos: GridPos) -> bool {
        self.intersections.contains(&pos)
    }

    pub fn light_at(&self, pos: GridPos) -> Option<&SimTrafficLight> {
        let light_id: LightId = self.grid.light_at(pos)?;
        self.lights.iter().find(|light| light.id == light_id)
    }

    /// Whether `lane` is one of the avenue lanes cars may drive in
    pub fn is_usable_lane(&self, lane: i32) -> bool {
        (self.first_lane..=LAST_LANE).contains(&lane)
    }
}
