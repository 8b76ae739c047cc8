//! The avenue that ties everything together
//!
//! Owns the grid, the traffic lights and every car, decides when the next
//! car enters, and runs one tick at a time: lights first, then cars in the
//! order they entered.

use log::{debug, info, warn};
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::VecDeque;

use super::car::{CarProfile, CarUpdateResult, SimCar};
use super::car_manager::{self, PlannedCar, SpawnOutcome};
use super::config::SimulationConfig;
use super::error::SimError;
use super::intersection::SimTrafficLight;
use super::road_network::SimRoadway;
use super::snapshot::{
    CarPlacement, CarState, InitialSnapshot, LightState, SimulationSummary, StepSnapshot,
};
use super::types::{
    CarId, GridPos, LightId, LightPhase, SimId, INTERSECTION_COUNT, LAST_LANE, MAX_REACTION_TIME,
    MAX_SPEED, MIN_REACTION_TIME, MIN_SPEED,
};

/// The main simulation: a one-way avenue with a merging ramp
pub struct SimAvenue {
    config: SimulationConfig,

    /// Grid and traffic lights
    roadway: SimRoadway,

    /// Cars on the grid, in the order they entered
    cars: Vec<SimCar>,

    /// Generated cars that have not entered yet, in generation order
    pending: VecDeque<SimCar>,

    /// Every generated car with its entry cell, for the initial snapshot
    placements: Vec<CarPlacement>,

    /// Ticks until the next spawn attempt
    spawn_countdown: u32,

    total_cars: usize,
    spawned_count: usize,
    exited_count: usize,
    tick_count: u64,

    /// Next ID to assign
    next_id: usize,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimAvenue {
    fn new_internal(config: SimulationConfig) -> Self {
        let rng = config.seed.map(StdRng::seed_from_u64);
        let roadway = SimRoadway::new(&config);

        let mut avenue = Self {
            config,
            roadway,
            cars: Vec::new(),
            pending: VecDeque::new(),
            placements: Vec::new(),
            spawn_countdown: 1,
            total_cars: 0,
            spawned_count: 0,
            exited_count: 0,
            tick_count: 0,
            next_id: 1,
            rng,
        };
        avenue.add_traffic_lights();
        avenue
    }

    /// Create an avenue with `config.car_count` randomly generated cars.
    ///
    /// The first car enters immediately.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let car_count = config.car_count;
        let mut avenue = Self::new_internal(config);

        for _ in 0..car_count {
            let profile = avenue.random_profile();
            let origin = avenue.random_origin();
            avenue.enqueue(PlannedCar::new(profile, origin))?;
        }

        avenue.spawn_first();
        info!(
            "Created avenue {}x{} with {} cars (lane 0 {})",
            avenue.roadway.width(),
            avenue.roadway.height(),
            avenue.total_cars,
            if avenue.config.all_lanes {
                "open"
            } else {
                "reserved"
            }
        );
        Ok(avenue)
    }

    /// Create an avenue whose cars are given explicitly instead of generated.
    /// `config.car_count` is ignored; the plan decides how many cars run.
    pub fn from_plan(config: SimulationConfig, plan: Vec<PlannedCar>) -> Result<Self, SimError> {
        config.validate()?;
        let mut avenue = Self::new_internal(config);
        for planned in plan {
            avenue.enqueue(planned)?;
        }
        avenue.spawn_first();
        Ok(avenue)
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    fn random_bool(&mut self, p: f64) -> bool {
        match &mut self.rng {
            Some(rng) => rng.random_bool(p),
            None => rand::rng().random_bool(p),
        }
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place one light per intersection, alternating their starting phase
    fn add_traffic_lights(&mut self) {
        let spacing = self.config.lane_length / (INTERSECTION_COUNT + 1);
        for i in 0..INTERSECTION_COUNT {
            let id = LightId(self.next_sim_id());
            let position = GridPos::new(LAST_LANE, (spacing * (i + 1)) as i32);
            let phase = if id.0 .0 % 2 == 0 {
                LightPhase::Green
            } else {
                LightPhase::Red
            };
            self.roadway.add_light(SimTrafficLight::new(
                id,
                position,
                phase,
                self.config.flip_interval,
            ));
        }
    }

    fn random_profile(&mut self) -> CarProfile {
        CarProfile {
            color: self.random_range(1..=4u8),
            base_speed: self.random_range(MIN_SPEED..=MAX_SPEED),
            reaction_time: self.random_range(MIN_REACTION_TIME..=MAX_REACTION_TIME),
        }
    }

    /// Half the cars enter at the head of the avenue, half at the end of the
    /// ramp level with one of the intersections
    fn random_origin(&mut self) -> GridPos {
        if self.random_bool(0.5) {
            let first_lane = self.roadway.first_lane();
            let lane = self.random_range(first_lane..=LAST_LANE);
            GridPos::new(lane, 0)
        } else {
            let count = self.roadway.intersections().len();
            let index = self.random_range(0..count);
            let row = self.roadway.intersections()[index].y;
            GridPos::new(self.roadway.ramp_entry_x(), row)
        }
    }

    fn enqueue(&mut self, planned: PlannedCar) -> Result<CarId, SimError> {
        if !self.roadway.in_bounds(planned.origin) {
            return Err(SimError::InvalidConfiguration(format!(
                "car origin ({}, {}) is outside the grid",
                planned.origin.x, planned.origin.y
            )));
        }
        if !self.roadway.is_usable_lane(planned.origin.x) && planned.origin.x <= LAST_LANE {
            return Err(SimError::InvalidConfiguration(format!(
                "car origin lane {} is reserved",
                planned.origin.x
            )));
        }

        let id = CarId(self.next_sim_id());
        let car = SimCar::new(id, planned.profile, planned.origin)?;
        self.placements.push(CarPlacement {
            id,
            color: car.color().code(),
            pos: planned.origin.into(),
        });
        self.pending.push_back(car);
        self.total_cars += 1;
        Ok(id)
    }

    fn spawn_first(&mut self) {
        self.try_spawn_next();
        self.spawn_countdown = 1;
    }

    /// Put the next queued car on the grid if its entry cell is free
    fn try_spawn_next(&mut self) -> SpawnOutcome {
        let Some(car) = self.pending.front() else {
            return SpawnOutcome::Exhausted;
        };
        let car_id = car.id;

        if !car_manager::spawn_car(car, &mut self.roadway) {
            return SpawnOutcome::Deferred(car_id);
        }

        if let Some(car) = self.pending.pop_front() {
            self.cars.push(car);
            self.spawned_count += 1;
        }
        SpawnOutcome::Spawned(car_id)
    }

    /// Place a car on the grid right away, bypassing the spawn queue.
    /// The car counts as both generated and spawned.
    pub fn insert_car(&mut self, profile: CarProfile, pos: GridPos) -> Result<CarId, SimError> {
        if !self.roadway.in_bounds(pos) || self.roadway.has_car(pos) {
            return Err(SimError::InvalidConfiguration(format!(
                "cell ({}, {}) is not free for a car",
                pos.x, pos.y
            )));
        }

        let id = CarId(self.next_sim_id());
        let car = SimCar::new(id, profile, pos)?;
        car_manager::spawn_car(&car, &mut self.roadway);
        self.placements.push(CarPlacement {
            id,
            color: car.color().code(),
            pos: pos.into(),
        });
        self.cars.push(car);
        self.total_cars += 1;
        self.spawned_count += 1;
        Ok(id)
    }

    /// Main simulation tick
    pub fn step(&mut self) -> StepSnapshot {
        if self.is_finished() {
            warn!("Stepping avenue after every car has left");
        }
        self.tick_count += 1;

        self.spawn_countdown = self.spawn_countdown.saturating_sub(1);
        if self.spawn_countdown == 0 {
            self.spawn_countdown = match self.try_spawn_next() {
                SpawnOutcome::Deferred(car_id) => {
                    debug!(
                        "Tick {}: entry cell of car {:?} occupied, retrying next tick",
                        self.tick_count, car_id.0
                    );
                    1
                }
                SpawnOutcome::Spawned(car_id) => {
                    debug!("Tick {}: car {:?} entered", self.tick_count, car_id.0);
                    self.random_range(1..=2)
                }
                SpawnOutcome::Exhausted => self.random_range(1..=2),
            };
        }

        for light in self.roadway.lights_mut() {
            light.tick();
        }

        let results = car_manager::update_cars(&mut self.cars, &mut self.roadway);
        self.exited_count += results
            .iter()
            .filter(|(_, result)| *result == CarUpdateResult::Exited)
            .count();

        self.snapshot()
    }

    /// Current state of every light and every car on the grid
    pub fn snapshot(&self) -> StepSnapshot {
        StepSnapshot {
            tick: self.tick_count,
            traffic_lights: self
                .roadway
                .lights()
                .iter()
                .map(|light| LightState {
                    id: light.id,
                    main_phase: light.main_phase(),
                    ramp_phase: light.ramp_phase(),
                })
                .collect(),
            cars: self
                .cars
                .iter()
                .map(|car| CarState {
                    id: car.id,
                    pos: car.position().into(),
                })
                .collect(),
        }
    }

    pub fn initial_snapshot(&self) -> InitialSnapshot {
        InitialSnapshot {
            car_initial_positions: self.placements.clone(),
        }
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::new(self.tick_count, self.total_cars)
    }

    pub fn active_car_count(&self) -> usize {
        self.cars.len()
    }

    /// Lights plus active cars
    pub fn agent_count(&self) -> usize {
        self.roadway.lights().len() + self.cars.len()
    }

    pub fn is_finished(&self) -> bool {
        self.spawned_count == self.total_cars && self.cars.is_empty()
    }

    pub fn total_cars(&self) -> usize {
        self.total_cars
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned_count
    }

    pub fn exited_count(&self) -> usize {
        self.exited_count
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn roadway(&self) -> &SimRoadway {
        &self.roadway
    }

    pub fn lights(&self) -> &[SimTrafficLight] {
        self.roadway.lights()
    }

    pub fn cars(&self) -> &[SimCar] {
        &self.cars
    }

    pub fn car(&self, car_id: CarId) -> Option<&SimCar> {
        self.cars.iter().find(|car| car.id == car_id)
    }

    pub fn occupancy_matrix(&self) -> Vec<Vec<u8>> {
        self.roadway.grid().occupancy_matrix()
    }

    /// Print a summary of the avenue state
    pub fn print_summary(&self) {
        println!("=== Avenue Simulation Summary ===");
        println!("Tick: {}", self.tick_count);
        println!(
            "Grid: {}x{}, Lanes: {}..={}",
            self.roadway.width(),
            self.roadway.height(),
            self.roadway.first_lane(),
            LAST_LANE
        );
        println!(
            "Cars: {} active, {} spawned, {} exited, {} total",
            self.cars.len(),
            self.spawned_count,
            self.exited_count,
            self.total_cars
        );
        println!();

        println!("--- Traffic Lights ---");
        for light in self.roadway.lights() {
            println!(
                "  Light {:?} at ({}, {}): main={:?}, ramp={:?}",
                light.id.0 .0,
                light.position.x,
                light.position.y,
                light.main_phase(),
                light.ramp_phase()
            );
        }

        if !self.cars.is_empty() {
            println!("--- Active Cars ---");
            for car in &self.cars {
                println!(
                    "  Car {:?}: color={}, speed={}/{}, position=({}, {}), {}",
                    car.id.0 .0,
                    car.color().name(),
                    car.current_speed(),
                    car.base_speed(),
                    car.position().x,
                    car.position().y,
                    if car.is_moving() { "moving" } else { "stopped" }
                );
            }
        }
    }

    /// Draw a visual map of the avenue in the terminal, north at the top
    pub fn draw_map(&self) {
        let width = self.roadway.width();
        let height = self.roadway.height();
        let ramp_rows: Vec<i32> = self
            .roadway
            .intersections()
            .iter()
            .map(|pos| pos.y)
            .collect();

        println!("\n=== Avenue Map ===");
        println!("Legend: C=Car, G/R=Light (main phase), .=Lane, -=Ramp");
        println!();
        for y in (0..height).rev() {
            let line: String = (0..width)
                .map(|x| {
                    let pos = GridPos::new(x, y);
                    if self.roadway.has_car(pos) {
                        'C'
                    } else if let Some(light) = self.roadway.light_at(pos) {
                        match light.main_phase() {
                            LightPhase::Green => 'G',
                            LightPhase::Red => 'R',
                        }
                    } else if x <= LAST_LANE {
                        if self.roadway.is_usable_lane(x) {
                            '.'
                        } else {
                            ' '
                        }
                    } else if ramp_rows.contains(&y) {
                        '-'
                    } else {
                        ' '
                    }
                })
                .collect();
            println!("{:>3} {}", y, line);
        }
        println!();
    }
}
