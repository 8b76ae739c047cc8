//! Registry lifecycle tests: create, step until finished, handle retired

use avenue_sim::simulation::{SimError, SimulationConfig, SimulationRegistry, StepResult};

#[test]
fn test_registry_lifecycle() {
    let mut registry = SimulationRegistry::new();
    let (handle, initial) = registry
        .create(SimulationConfig::new(true, 6, 60).with_seed(5))
        .unwrap();

    assert_eq!(initial.car_initial_positions.len(), 6);
    assert!(registry.contains(handle));
    assert_eq!(registry.active_car_count(handle), Ok(1));
    assert_eq!(registry.is_finished(handle), Ok(false));

    let mut snapshots = 0;
    let summary = loop {
        assert!(snapshots < 5000, "simulation did not finish");
        match registry.step(handle).unwrap() {
            StepResult::Snapshot(snapshot) => {
                snapshots += 1;
                assert_eq!(snapshot.tick, snapshots);
                assert_eq!(snapshot.traffic_lights.len(), 2);
            }
            StepResult::Finished(summary) => break summary,
        }
    };

    assert_eq!(summary.total_steps, snapshots);
    assert_eq!(summary.car_count, 6);
    assert!((summary.cars_per_step - 6.0 / snapshots as f64).abs() < 1e-9);

    // The finished simulation is dropped from the registry
    assert!(!registry.contains(handle));
    assert!(registry.is_empty());
    assert_eq!(
        registry.step(handle).unwrap_err(),
        SimError::UnknownSimulation(handle)
    );
    assert!(registry.is_finished(handle).is_err());
    assert!(registry.active_car_count(handle).is_err());
}

#[test]
fn test_handles_are_independent() {
    let mut registry = SimulationRegistry::new();
    let (first, _) = registry
        .create(SimulationConfig::new(true, 3, 60).with_seed(1))
        .unwrap();
    let (second, _) = registry
        .create(SimulationConfig::new(false, 3, 60).with_seed(1))
        .unwrap();

    assert_ne!(first, second);
    assert_ne!(first.to_string(), second.to_string());
    assert_eq!(registry.len(), 2);

    for _ in 0..10 {
        registry.step(first).unwrap();
    }
    assert_eq!(registry.avenue(first).unwrap().tick_count(), 10);
    assert_eq!(registry.avenue(second).unwrap().tick_count(), 0);
}

#[test]
fn test_invalid_configuration_is_not_registered() {
    let mut registry = SimulationRegistry::new();
    let result = registry.create(SimulationConfig::new(true, 3, 1));
    assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
    assert!(registry.is_empty());
}

#[test]
fn test_zero_car_simulation_finishes_on_first_step() {
    let mut registry = SimulationRegistry::new();
    let (handle, initial) = registry.create(SimulationConfig::new(true, 0, 60)).unwrap();
    assert!(initial.car_initial_positions.is_empty());

    match registry.step(handle).unwrap() {
        StepResult::Finished(summary) => {
            assert_eq!(summary.total_steps, 0);
            assert_eq!(summary.cars_per_step, 0.0);
        }
        StepResult::Snapshot(_) => panic!("expected the run to be finished"),
    }
}
