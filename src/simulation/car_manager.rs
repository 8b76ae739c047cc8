//! Car spawning and management for the avenue simulation
//!
//! This module contains functions for spawning, despawning, and updating cars.
//! It separates car bookkeeping from the avenue's scheduling.

use log::debug;

use super::car::{CarProfile, CarUpdateResult, SimCar};
use super::road_network::SimRoadway;
use super::types::{CarId, GridPos};

/// A car waiting to enter the avenue, with the cell it will enter at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedCar {
    pub profile: CarProfile,
    pub origin: GridPos,
}

impl PlannedCar {
    pub fn new(profile: CarProfile, origin: GridPos) -> Self {
        Self { profile, origin }
    }
}

/// Outcome of trying to put the next queued car on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(CarId),
    /// The entry cell is taken; the car stays at the head of the queue
    Deferred(CarId),
    /// Every generated car has already entered
    Exhausted,
}

/// Place a car on its current cell
/// Returns false if the cell already holds a car
pub fn spawn_car(car: &SimCar, roadway: &mut SimRoadway) -> bool {
    if !roadway.grid.place_car(car.id, car.position()) {
        return false;
    }
    debug!(
        "Spawned car {:?} ({}) at ({}, {})",
        car.id.0,
        car.color().name(),
        car.position().x,
        car.position().y
    );
    true
}

/// Take a car off the grid
pub fn despawn_car(car: &SimCar, roadway: &mut SimRoadway) {
    roadway.grid.remove_car(car.id);
    debug!("Car {:?} left the avenue", car.id.0);
}

/// Update all active cars in spawn order.
///
/// Each car's move is committed to the grid before the next car looks at it,
/// and cars that drive off the grid are removed from `cars` straight away.
/// Returns every car's result in the order they ran.
pub fn update_cars(
    cars: &mut Vec<SimCar>,
    roadway: &mut SimRoadway,
) -> Vec<(CarId, CarUpdateResult)> {
    let mut results = Vec::with_capacity(cars.len());
    let mut index = 0;

    while index < cars.len() {
        let car = &mut cars[index];
        let car_id = car.id;
        let result = car.update(roadway);

        match result {
            CarUpdateResult::Moved(pos) => {
                roadway.grid.move_car(car_id, pos);
                car.commit_position(pos);
                index += 1;
            }
            CarUpdateResult::Exited => {
                let car = cars.remove(index);
                despawn_car(&car, roadway);
            }
            CarUpdateResult::Waiting | CarUpdateResult::Held => {
                index += 1;
            }
        }

        results.push((car_id, result));
    }

    results
}
