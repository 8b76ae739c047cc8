//! Traffic light logic for the avenue intersections
//!
//! Each intersection carries one light with two linked phases: the main
//! phase for north-bound avenue traffic and the ramp phase for west-bound
//! merging traffic. The ramp phase is always the opposite of the main one.

use log::trace;

use super::types::{Direction, GridPos, LightId, LightPhase};

/// A traffic light at an intersection
#[derive(Debug, Clone)]
pub struct SimTrafficLight {
    pub id: LightId,
    pub position: GridPos,
    main_phase: LightPhase,
    /// Ticks since the last flip
    ticks_since_flip: u32,
    /// Ticks between flips
    flip_interval: u32,
}

impl SimTrafficLight {
    pub fn new(id: LightId, position: GridPos, main_phase: LightPhase, flip_interval: u32) -> Self {
        Self {
            id,
            position,
            main_phase,
            ticks_since_flip: 0,
            flip_interval,
        }
    }

    pub fn main_phase(&self) -> LightPhase {
        self.main_phase
    }

    pub fn ramp_phase(&self) -> LightPhase {
        self.main_phase.opposite()
    }

    pub fn ticks_since_flip(&self) -> u32 {
        self.ticks_since_flip
    }

    /// Phase seen by a car approaching in the given direction
    pub fn state_for(&self, direction: Direction) -> LightPhase {
        match direction {
            Direction::North => self.main_phase(),
            Direction::West => self.ramp_phase(),
        }
    }

    pub fn is_green_for(&self, direction: Direction) -> bool {
        self.state_for(direction) == LightPhase::Green
    }

    /// Advance the light by one tick, flipping both phases together once the
    /// interval has elapsed
    pub fn tick(&mut self) {
        self.ticks_since_flip += 1;
        if self.ticks_since_flip >= self.flip_interval {
            self.main_phase = self.main_phase.opposite();
            self.ticks_since_flip = 0;
            trace!(
                "Light {:?} flipped: main={:?}, ramp={:?}",
                self.id.0,
                self.main_phase(),
                self.ramp_phase()
            );
        }
    }
}
