//! Bounded cell space for the avenue
//!
//! Tracks which car sits on which cell (at most one per cell) and where the
//! traffic lights are. Both directions of the car mapping are kept so moves
//! and lookups stay O(1).

use std::collections::HashMap;

use super::types::{CarId, GridPos, LightId};

#[derive(Debug, Clone, Default)]
pub struct SimGrid {
    width: i32,
    height: i32,

    /// Maps occupied cells to the car standing on them
    cars_by_cell: HashMap<GridPos, CarId>,

    /// Maps car IDs back to their cell
    car_positions: HashMap<CarId, GridPos>,

    /// Traffic lights never move, so a single index is enough
    lights_by_cell: HashMap<GridPos, LightId>,
}

impl SimGrid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// No wraparound: anything outside the rectangle is out of bounds
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Places a car on an empty cell.
    /// Returns false (and leaves the grid untouched) if the cell is taken or
    /// out of bounds.
    pub fn place_car(&mut self, car_id: CarId, pos: GridPos) -> bool {
        if !self.in_bounds(pos) || self.cars_by_cell.contains_key(&pos) {
            return false;
        }
        if let Some(old) = self.car_positions.insert(car_id, pos) {
            self.cars_by_cell.remove(&old);
        }
        self.cars_by_cell.insert(pos, car_id);
        true
    }

    /// Removes a car from the grid, returning the cell it was on
    pub fn remove_car(&mut self, car_id: CarId) -> Option<GridPos> {
        let pos = self.car_positions.remove(&car_id)?;
        self.cars_by_cell.remove(&pos);
        Some(pos)
    }

    /// Moves a car to a new cell.
    /// The caller guarantees the target is in bounds and free of other cars.
    pub fn move_car(&mut self, car_id: CarId, new_pos: GridPos) {
        debug_assert!(self.in_bounds(new_pos));
        debug_assert!(self
            .cars_by_cell
            .get(&new_pos)
            .map_or(true, |other| *other == car_id));

        if let Some(old) = self.car_positions.insert(car_id, new_pos) {
            self.cars_by_cell.remove(&old);
        }
        self.cars_by_cell.insert(new_pos, car_id);
    }

    pub fn car_at(&self, pos: GridPos) -> Option<CarId> {
        self.cars_by_cell.get(&pos).copied()
    }

    pub fn has_car(&self, pos: GridPos) -> bool {
        self.cars_by_cell.contains_key(&pos)
    }

    pub fn position_of(&self, car_id: CarId) -> Option<GridPos> {
        self.car_positions.get(&car_id).copied()
    }

    pub fn car_count(&self) -> usize {
        self.car_positions.len()
    }

    pub fn place_light(&mut self, light_id: LightId, pos: GridPos) {
        self.lights_by_cell.insert(pos, light_id);
    }

    pub fn light_at(&self, pos: GridPos) -> Option<LightId> {
        self.lights_by_cell.get(&pos).copied()
    }

    /// Car occupancy as rows of 0/1, indexed `[y][x]`
    pub fn occupancy_matrix(&self) -> Vec<Vec<u8>> {
        let mut matrix = vec![vec![0u8; self.width as usize]; self.height as usize];
        for pos in self.cars_by_cell.keys() {
            matrix[pos.y as usize][pos.x as usize] = 1;
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::SimId;

    fn car(n: usize) -> CarId {
        CarId(SimId(n))
    }

    #[test]
    fn test_place_and_lookup() {
        let mut grid = SimGrid::new(19, 60);
        assert!(grid.place_car(car(1), GridPos::new(2, 5)));
        assert_eq!(grid.car_at(GridPos::new(2, 5)), Some(car(1)));
        assert_eq!(grid.position_of(car(1)), Some(GridPos::new(2, 5)));
        assert!(!grid.has_car(GridPos::new(2, 6)));
    }

    #[test]
    fn test_place_refuses_occupied_cell() {
        let mut grid = SimGrid::new(19, 60);
        assert!(grid.place_car(car(1), GridPos::new(0, 0)));
        assert!(!grid.place_car(car(2), GridPos::new(0, 0)));
        assert_eq!(grid.car_at(GridPos::new(0, 0)), Some(car(1)));
        assert_eq!(grid.position_of(car(2)), None);
    }

    #[test]
    fn test_move_updates_both_indexes() {
        let mut grid = SimGrid::new(19, 60);
        grid.place_car(car(1), GridPos::new(1, 1));
        grid.move_car(car(1), GridPos::new(1, 3));

        assert!(!grid.has_car(GridPos::new(1, 1)));
        assert_eq!(grid.car_at(GridPos::new(1, 3)), Some(car(1)));
        assert_eq!(grid.position_of(car(1)), Some(GridPos::new(1, 3)));
        assert_eq!(grid.car_count(), 1);
    }

    #[test]
    fn test_remove_car() {
        let mut grid = SimGrid::new(19, 60);
        grid.place_car(car(1), GridPos::new(3, 10));
        assert_eq!(grid.remove_car(car(1)), Some(GridPos::new(3, 10)));
        assert_eq!(grid.remove_car(car(1)), None);
        assert_eq!(grid.car_count(), 0);
    }

    #[test]
    fn test_bounds() {
        let grid = SimGrid::new(19, 60);
        assert!(grid.in_bounds(GridPos::new(0, 0)));
        assert!(grid.in_bounds(GridPos::new(18, 59)));
        assert!(!grid.in_bounds(GridPos::new(19, 0)));
        assert!(!grid.in_bounds(GridPos::new(0, 60)));
        assert!(!grid.in_bounds(GridPos::new(-1, 0)));
    }

    #[test]
    fn test_lights_coexist_with_cars() {
        let mut grid = SimGrid::new(19, 60);
        let light = LightId(SimId(1));
        grid.place_light(light, GridPos::new(3, 20));
        assert!(grid.place_car(car(2), GridPos::new(3, 20)));
        assert_eq!(grid.light_at(GridPos::new(3, 20)), Some(light));
        assert_eq!(grid.car_at(GridPos::new(3, 20)), Some(car(2)));
    }

    #[test]
    fn test_occupancy_matrix() {
        let mut grid = SimGrid::new(5, 4);
        grid.place_car(car(1), GridPos::new(4, 3));
        let matrix = grid.occupancy_matrix();
        assert_eq!(matrix.len(), 4);
        assert_eq!(matrix[0].len(), 5);
        assert_eq!(matrix[3][4], 1);
        assert_eq!(matrix.iter().flatten().filter(|c| **c == 1).count(), 1);
    }
}
