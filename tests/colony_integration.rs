//! Colony lifecycle integration tests

use beehive_colony::core::config::{Activation, BehaviorPolicy, ColonyConfig, HormoneGrowth};
use beehive_colony::core::types::{GridPos, Task};
use beehive_colony::entity::WorkerBee;
use beehive_colony::simulation::{Colony, ColonySnapshot};

fn config(activation: Activation, seed: u64) -> ColonyConfig {
    ColonyConfig {
        activation,
        seed,
        ..ColonyConfig::default()
    }
}

/// Structural invariants that must hold between ticks
fn assert_consistent(colony: &Colony) {
    let snap = colony.snapshot();
    let population = colony.population();

    if let Some(ceiling) = colony.pool().ceiling() {
        assert!(colony.resource_level() <= ceiling);
    }

    let total = snap.workers() + snap.larvae + u32::from(snap.queen_alive);
    assert_eq!(total as usize, population.len());

    // Every live agent is on the grid and the grid holds nobody else
    for agent in population.iter() {
        assert!(colony.position_of(agent.id).is_some(), "{:?} not placed", agent.id);
    }
    assert_eq!(colony.grid().len(), population.len());

    // Brood entries are live larvae
    for larva in population.brood() {
        let agent = colony.agent(*larva).unwrap();
        assert!(agent.as_larva().is_some());
    }
    assert_eq!(population.brood().len() as u32, snap.larvae);

    // Tasks are always the threshold function of the current hormone level
    for agent in population.iter() {
        if let Some(bee) = agent.as_worker() {
            assert_eq!(bee.task(), Task::from_jh(bee.jh()));
        }
    }
}

fn run_checked(colony: &mut Colony, ticks: u64) {
    for _ in 0..ticks {
        if colony.is_extinct() {
            break;
        }
        colony.step_once();
        assert_consistent(colony);
    }
}

#[test]
fn test_default_colony_random_activation() {
    let mut colony = Colony::new(config(Activation::Random, 42)).unwrap();
    assert_consistent(&colony);
    assert_eq!(colony.agents_view().count(), 151);

    run_checked(&mut colony, 60);

    let records = colony.statistics().records();
    assert!(records.len() >= 2);
    assert_eq!(records[0].step, 0);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.step, i as u64);
    }
}

#[test]
fn test_default_colony_simultaneous_activation() {
    let mut colony = Colony::new(config(Activation::Simultaneous, 42)).unwrap();
    run_checked(&mut colony, 60);
    assert_eq!(
        colony.statistics().len() as u64,
        colony.step_index() + 1
    );
}

#[test]
fn test_spatial_and_aggressive_presets_run() {
    for policy in [BehaviorPolicy::spatial(), BehaviorPolicy::aggressive()] {
        let mut colony = Colony::new(ColonyConfig {
            policy,
            ..config(Activation::Random, 7)
        })
        .unwrap();
        run_checked(&mut colony, 40);
    }
}

#[test]
fn test_delayed_hormone_growth_runs() {
    let policy = BehaviorPolicy::default().with_hormone_growth(HormoneGrowth::Delayed { onset_age: 3 });
    let mut colony = Colony::new(ColonyConfig {
        policy,
        ..config(Activation::Simultaneous, 3)
    })
    .unwrap();
    run_checked(&mut colony, 30);
}

#[test]
fn test_same_seed_same_series() {
    for activation in [Activation::Random, Activation::Simultaneous] {
        let mut a = Colony::new(config(activation, 99)).unwrap();
        let mut b = Colony::new(config(activation, 99)).unwrap();
        a.run(50);
        b.run(50);
        assert_eq!(a.statistics().records(), b.statistics().records());
        assert_eq!(
            a.agents_view().collect::<Vec<_>>(),
            b.agents_view().collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_run_stops_on_extinction() {
    let mut colony = Colony::empty(ColonyConfig {
        population: 0,
        initial_resources: 0,
        ..ColonyConfig::default()
    })
    .unwrap();
    for x in 0..5 {
        colony
            .spawn_worker(WorkerBee::new(0.1, 5, 3), GridPos::new(x, 0))
            .unwrap();
    }

    let ran = colony.run(100);

    assert!(ran <= 3, "workers should starve within their lifecredit, ran {ran}");
    assert!(colony.is_extinct());
    assert_eq!(colony.statistics().len() as u64, ran + 1);
    assert_eq!(colony.run(10), 0);
}

#[test]
fn test_pool_never_exceeds_ceiling() {
    let mut colony = Colony::new(ColonyConfig {
        initial_resources: 100,
        max_resources: Some(120),
        forager_fraction: 0.8,
        nurse_fraction: 0.1,
        guard_fraction: 0.1,
        ..config(Activation::Random, 5)
    })
    .unwrap();
    for _ in 0..30 {
        colony.step_once();
        assert!(colony.resource_level() <= 120);
    }
}

#[test]
fn test_statistics_json_round_trip() {
    let mut colony = Colony::new(config(Activation::Random, 11)).unwrap();
    colony.run(5);
    let json = colony.statistics().to_json();
    let parsed: Vec<ColonySnapshot> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, colony.statistics().records());
}

#[test]
fn test_agent_lookup_after_retirement_fails() {
    let mut colony = Colony::empty(ColonyConfig {
        population: 0,
        initial_resources: 0,
        ..ColonyConfig::default()
    })
    .unwrap();
    let bee = colony
        .spawn_worker(WorkerBee::new(0.1, 5, 1), GridPos::new(0, 0))
        .unwrap();
    colony.step_once();
    assert!(colony.agent(bee).is_err());
}
