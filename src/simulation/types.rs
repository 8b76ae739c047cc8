//! Core types for the avenue simulation
//!
//! Ids, grid coordinates and the fixed constants of the avenue layout.

use serde::Serialize;

use super::error::SimError;

/// A unique identifier for simulation agents
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SimId(pub usize);

/// A wrapper type for car IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CarId(pub SimId);

/// A wrapper type for traffic light IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LightId(pub SimId);

/// A cell coordinate on the avenue grid.
///
/// Coordinates are signed so a car's tentative position may run past the
/// grid edge before it is retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `direction`
    pub fn step(self, direction: Direction) -> GridPos {
        let (dx, dy) = direction.delta();
        GridPos::new(self.x + dx, self.y + dy)
    }

    pub fn offset(self, dx: i32, dy: i32) -> GridPos {
        GridPos::new(self.x + dx, self.y + dy)
    }
}

/// Travel direction of a car, derived from the column it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Along the avenue (+y)
    North,
    /// Along the ramp towards the avenue (-x)
    West,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Lane columns run north; every column past the last lane is ramp.
    pub fn at(pos: GridPos) -> Direction {
        if (0..=LAST_LANE).contains(&pos.x) {
            Direction::North
        } else {
            Direction::West
        }
    }
}

/// One phase of a traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightPhase {
    Green,
    Red,
}

impl LightPhase {
    pub fn opposite(self) -> LightPhase {
        match self {
            LightPhase::Green => LightPhase::Red,
            LightPhase::Red => LightPhase::Green,
        }
    }
}

/// Paint colour of a car, carried by its numeric code on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarColor {
    Red = 1,
    Blue = 2,
    Green = 3,
    Purple = 4,
}

impl CarColor {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            CarColor::Red => "red",
            CarColor::Blue => "blue",
            CarColor::Green => "green",
            CarColor::Purple => "purple",
        }
    }
}

impl TryFrom<u8> for CarColor {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(CarColor::Red),
            2 => Ok(CarColor::Blue),
            3 => Ok(CarColor::Green),
            4 => Ok(CarColor::Purple),
            other => Err(SimError::InvalidColor(other)),
        }
    }
}

/// Number of usable avenue lanes (columns 0..=3)
pub const AVENUE_LANES: i32 = 4;

/// Rightmost avenue lane; also the column holding the traffic lights
pub const LAST_LANE: i32 = AVENUE_LANES - 1;

/// Number of signalled intersections along the avenue
pub const INTERSECTION_COUNT: usize = 2;

/// Default ramp length in cells
pub const DEFAULT_RAMP_LENGTH: usize = 15;

/// Default avenue length in cells
pub const DEFAULT_LANE_LENGTH: usize = 60;

/// Ticks between traffic light flips
pub const DEFAULT_FLIP_INTERVAL: u32 = 90;

/// How far along a neighbouring lane a car looks when scoring it
pub const LANE_SCAN_RADIUS: i32 = 10;

/// Base speed range in cells per tick
pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 3;

/// Reaction time range in ticks
pub const MIN_REACTION_TIME: u32 = 2;
pub const MAX_REACTION_TIME: u32 = 3;
