//! Configuration for a single avenue simulation

use super::error::SimError;
use super::types::{
    AVENUE_LANES, DEFAULT_FLIP_INTERVAL, DEFAULT_LANE_LENGTH, DEFAULT_RAMP_LENGTH,
    INTERSECTION_COUNT,
};

/// Parameters for building an [`Avenue`](super::Avenue)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Whether lane 0 is usable; when false it is reserved and never entered
    pub all_lanes: bool,
    /// Number of cars generated for the run
    pub car_count: usize,
    /// Length of the avenue in cells (grid height)
    pub lane_length: usize,
    /// Length of the merging ramp in cells
    pub ramp_length: usize,
    /// Ticks between traffic light flips
    pub flip_interval: u32,
    /// Optional seed for reproducible simulations
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            all_lanes: true,
            car_count: 20,
            lane_length: DEFAULT_LANE_LENGTH,
            ramp_length: DEFAULT_RAMP_LENGTH,
            flip_interval: DEFAULT_FLIP_INTERVAL,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn new(all_lanes: bool, car_count: usize, lane_length: usize) -> Self {
        Self {
            all_lanes,
            car_count,
            lane_length,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_flip_interval(mut self, flip_interval: u32) -> Self {
        self.flip_interval = flip_interval;
        self
    }

    pub fn with_ramp_length(mut self, ramp_length: usize) -> Self {
        self.ramp_length = ramp_length;
        self
    }

    /// Smallest avenue that fits every intersection on its own row strictly
    /// between the entry row and the far edge.
    pub fn min_lane_length() -> usize {
        INTERSECTION_COUNT + 1
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.lane_length < Self::min_lane_length() {
            return Err(SimError::InvalidConfiguration(format!(
                "lane length {} is too small to host {} intersections (minimum {})",
                self.lane_length,
                INTERSECTION_COUNT,
                Self::min_lane_length()
            )));
        }
        if self.ramp_length == 0 {
            return Err(SimError::InvalidConfiguration(
                "ramp length must be at least 1".to_string(),
            ));
        }
        if self.flip_interval == 0 {
            return Err(SimError::InvalidConfiguration(
                "flip interval must be at least 1 tick".to_string(),
            ));
        }
        if self.width() > i32::MAX as usize || self.lane_length > i32::MAX as usize {
            return Err(SimError::InvalidConfiguration(
                "grid dimensions exceed the addressable range".to_string(),
            ));
        }
        Ok(())
    }

    /// First usable lane: lane 0 is reserved unless all lanes are enabled
    pub fn first_lane(&self) -> i32 {
        if self.all_lanes {
            0
        } else {
            1
        }
    }

    /// Grid width: the avenue lanes plus the ramp
    pub fn width(&self) -> usize {
        AVENUE_LANES as usize + self.ramp_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width(), 19);
        assert_eq!(config.first_lane(), 0);
    }

    #[test]
    fn test_short_avenue_rejected() {
        let config = SimulationConfig::new(true, 5, 2);
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));

        let config = SimulationConfig::new(true, 5, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_flip_interval_rejected() {
        let config = SimulationConfig::default().with_flip_interval(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reserved_lane() {
        let config = SimulationConfig::new(false, 5, 60);
        assert_eq!(config.first_lane(), 1);
    }
}
