//! Car movement logic for the avenue simulation
//!
//! A car advances cell by cell along the direction of the column it is in,
//! slows down behind other cars, stops at red lights, and tries to switch to
//! a neighbouring lane when it is held up.

use log::debug;
use ordered_float::OrderedFloat;

use super::error::SimError;
use super::road_network::SimRoadway;
use super::types::{
    CarColor, CarId, GridPos, LANE_SCAN_RADIUS, LAST_LANE, MAX_REACTION_TIME, MAX_SPEED,
    MIN_REACTION_TIME, MIN_SPEED,
};

/// Cells that must be free of cars in the target lane before switching,
/// as offsets along the travel axis: the cell alongside, two behind, one ahead.
const LANE_CHANGE_GUARD: [i32; 4] = [0, -1, -2, 1];

/// Result of a car update indicating what the avenue should do with the car
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarUpdateResult {
    /// Still reacting after a stop; the car did not look ahead this tick
    Waiting,
    /// Looked ahead but could not leave its cell
    Held,
    /// Car moved to a new cell inside the grid
    Moved(GridPos),
    /// Car drove past the edge of the grid and should be retired
    Exited,
}

/// Randomized attributes a car is generated with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarProfile {
    /// Color code, 1..=4
    pub color: u8,
    /// Cruising speed in cells per tick, 1..=3
    pub base_speed: u32,
    /// Ticks needed to pull away after a stop, 2..=3
    pub reaction_time: u32,
}

impl CarProfile {
    pub fn new(color: u8, base_speed: u32, reaction_time: u32) -> Self {
        Self {
            color,
            base_speed,
            reaction_time,
        }
    }
}

/// A car in the avenue simulation
#[derive(Debug, Clone)]
pub struct SimCar {
    pub id: CarId,
    color: CarColor,
    base_speed: u32,
    /// Ratchets down behind obstructions and recovers by one per clear tick
    current_speed: u32,
    reaction_time: u32,
    position: GridPos,
    moving: bool,
    /// Ticks spent stopped since the car last moved
    stall_counter: u32,
    /// Lane change attempts since the last successful switch
    lane_change_cooldown: u32,
    /// Set while a car ahead has been seen and not yet cleared
    obstructed: bool,
}

impl SimCar {
    pub fn new(id: CarId, profile: CarProfile, position: GridPos) -> Result<Self, SimError> {
        let color = CarColor::try_from(profile.color)?;

        if !(MIN_SPEED..=MAX_SPEED).contains(&profile.base_speed) {
            return Err(SimError::InvalidConfiguration(format!(
                "base speed {} outside {MIN_SPEED}..={MAX_SPEED}",
                profile.base_speed
            )));
        }
        if !(MIN_REACTION_TIME..=MAX_REACTION_TIME).contains(&profile.reaction_time) {
            return Err(SimError::InvalidConfiguration(format!(
                "reaction time {} outside {MIN_REACTION_TIME}..={MAX_REACTION_TIME}",
                profile.reaction_time
            )));
        }

        Ok(Self {
            id,
            color,
            base_speed: profile.base_speed,
            current_speed: profile.base_speed,
            reaction_time: profile.reaction_time,
            position,
            moving: true,
            stall_counter: 0,
            lane_change_cooldown: 0,
            obstructed: false,
        })
    }

    pub fn color(&self) -> CarColor {
        self.color
    }

    pub fn base_speed(&self) -> u32 {
        self.base_speed
    }

    pub fn current_speed(&self) -> u32 {
        self.current_speed
    }

    pub fn reaction_time(&self) -> u32 {
        self.reaction_time
    }

    pub fn position(&self) -> GridPos {
        self.position
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn stall_counter(&self) -> u32 {
        self.stall_counter
    }

    pub fn lane_change_cooldown(&self) -> u32 {
        self.lane_change_cooldown
    }

    pub fn is_obstructed(&self) -> bool {
        self.obstructed
    }

    /// Records the cell the avenue committed this car to
    pub(crate) fn commit_position(&mut self, position: GridPos) {
        self.position = position;
    }

    /// Update car movement logic
    /// Returns CarUpdateResult indicating what the avenue should commit
    pub fn update(&mut self, roadway: &SimRoadway) -> CarUpdateResult {
        if !self.moving {
            self.stall_counter += 1;
            if self.stall_counter < self.reaction_time {
                return CarUpdateResult::Waiting;
            }
            self.moving = true;
            self.stall_counter = 0;
        }

        let start = self.position;
        let mut new_pos = start;
        let mut cells_advanced = 0;

        // A stopped car still probes the cell in front of it so it can notice
        // the obstruction clearing.
        for _ in 0..self.current_speed.max(1) {
            let direction = roadway.direction_at(new_pos);
            let forward = new_pos.step(direction);

            // Past the edge the car keeps going; the exit check below retires it.
            if !roadway.in_bounds(forward) {
                self.obstructed = false;
                new_pos = forward;
                cells_advanced += 1;
                continue;
            }

            if roadway.has_car(forward) {
                self.obstructed = true;
                new_pos = self.change_lane(roadway, new_pos);
                break;
            }
            self.obstructed = false;

            if roadway.is_intersection(forward) {
                let green = roadway
                    .light_at(forward)
                    .map_or(true, |light| light.is_green_for(direction));
                if !green {
                    new_pos = self.change_lane(roadway, new_pos);
                    break;
                }
            }

            new_pos = forward;
            cells_advanced += 1;
        }

        self.current_speed = cells_advanced;
        if !self.obstructed && self.current_speed < self.base_speed {
            self.current_speed += 1;
        }

        if new_pos == start {
            self.moving = false;
            return CarUpdateResult::Held;
        }

        if !roadway.in_bounds(new_pos) {
            return CarUpdateResult::Exited;
        }

        CarUpdateResult::Moved(new_pos)
    }

    /// Try to move sideways out of the current lane.
    ///
    /// Returns the position the car ends up at: `pos` itself when it stays.
    /// The attempt counter only resets on a successful switch, so once it has
    /// reached the reaction time every later attempt is evaluated.
    fn change_lane(&mut self, roadway: &SimRoadway, pos: GridPos) -> GridPos {
        if !(0..=LAST_LANE).contains(&pos.x) {
            return pos;
        }

        self.lane_change_cooldown = self.lane_change_cooldown.saturating_add(1);
        if self.lane_change_cooldown < self.reaction_time {
            return pos;
        }

        let left_allowed = pos.x > roadway.first_lane();
        let right_allowed = pos.x < LAST_LANE;

        let left_score = if left_allowed {
            lane_score(roadway, pos, -1)
        } else {
            OrderedFloat(0.0)
        };
        let right_score = if right_allowed {
            lane_score(roadway, pos, 1)
        } else {
            OrderedFloat(0.0)
        };

        let delta = if left_allowed && left_score >= right_score && lane_is_clear(roadway, pos, -1)
        {
            -1
        } else if right_allowed && right_score >= left_score && lane_is_clear(roadway, pos, 1) {
            1
        } else {
            return pos;
        };

        self.lane_change_cooldown = 0;
        let target = pos.offset(delta, 0);
        debug!(
            "Car {:?} changing lane {} -> {} at row {}",
            self.id.0, pos.x, target.x, pos.y
        );
        target
    }
}

/// Distance along the avenue to the nearest car in the lane at `pos.x + delta`,
/// or infinity when none is within the scan radius
pub fn lane_score(roadway: &SimRoadway, pos: GridPos, delta: i32) -> OrderedFloat<f32> {
    let lane = pos.x + delta;
    (0..=LANE_SCAN_RADIUS)
        .find(|d| {
            roadway.has_car(GridPos::new(lane, pos.y + d))
                || roadway.has_car(GridPos::new(lane, pos.y - d))
        })
        .map_or(OrderedFloat(f32::INFINITY), |d| OrderedFloat(d as f32))
}

/// Whether the guarded cells of the lane at `pos.x + delta` hold no car
pub fn lane_is_clear(roadway: &SimRoadway, pos: GridPos, delta: i32) -> bool {
    LANE_CHANGE_GUARD
        .iter()
        .all(|dy| !roadway.has_car(pos.offset(delta, *dy)))
}
