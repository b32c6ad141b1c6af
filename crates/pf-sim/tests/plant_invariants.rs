//! Invariants that must hold for any command sequence, and for readers
//! running concurrently with the clock.

use pf_sim::{
    Action, ClockOptions, Plant, PlantSnapshot, SimulationClock, StationTemplate, TankKey,
    TickMode,
};
use proptest::prelude::*;
use std::thread;
use std::time::Duration;

fn plant(stations: usize, mode: TickMode) -> Plant {
    let template = StationTemplate {
        supply_capacity: 20.0,
        mixer_capacity: 30.0,
        ..StationTemplate::default()
    };
    let stations = (1..=stations)
        .map(|i| template.build(format!("station{i}")).unwrap())
        .collect();
    Plant::new("prop", stations).unwrap().with_tick_mode(mode)
}

fn assert_bounds(snap: &PlantSnapshot) -> Result<(), TestCaseError> {
    for station in &snap.stations {
        for reading in &station.tanks {
            prop_assert!(reading.level >= 0.0, "{} below empty", reading.tank);
            prop_assert!(reading.level <= reading.capacity, "{} above capacity", reading.tank);
            prop_assert!((0.0..=1.0).contains(&reading.capacity_fraction));
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum Step {
    Command { station: usize, tank: usize, action: Action },
    Tick { dt: f64 },
}

fn step() -> impl Strategy<Value = Step> {
    let action = prop_oneof![
        6 => (-0.5_f64..1.5).prop_map(Action::SetOpening),
        1 => Just(Action::Fill),
        1 => Just(Action::Flush),
    ];
    prop_oneof![
        (1_usize..=2, 0_usize..TankKey::COUNT, action)
            .prop_map(|(station, tank, action)| Step::Command { station, tank, action }),
        (0.05_f64..5.0).prop_map(|dt| Step::Tick { dt }),
    ]
}

proptest! {
    #[test]
    fn levels_stay_within_capacity(steps in prop::collection::vec(step(), 1..120)) {
        let mut plant = plant(2, TickMode::Sequential);
        for step in steps {
            match step {
                Step::Command { station, tank, action } => {
                    // Rejections are fine; they must simply leave no trace.
                    let pending = plant.pending_commands();
                    let name = TankKey::ALL[tank].name();
                    if plant.submit(&format!("station{station}"), name, action).is_err() {
                        prop_assert_eq!(plant.pending_commands(), pending);
                    }
                }
                Step::Tick { dt } => {
                    plant.run_tick(dt).unwrap();
                    assert_bounds(&plant.snapshot())?;
                }
            }
        }
    }

    #[test]
    fn parallel_ticks_match_sequential(
        openings in prop::collection::vec((0_usize..TankKey::COUNT, 0.0_f64..=1.0), 1..12),
        ticks in 1_usize..30,
    ) {
        let mut seq = plant(3, TickMode::Sequential);
        let mut par = plant(3, TickMode::Parallel);
        for (i, (tank, x)) in openings.iter().enumerate() {
            let station = format!("station{}", i % 3 + 1);
            let tank = TankKey::ALL[*tank].name();
            seq.apply_command(&station, tank, *x).unwrap();
            par.apply_command(&station, tank, *x).unwrap();
        }
        for _ in 0..ticks {
            seq.run_tick(1.0).unwrap();
            par.run_tick(1.0).unwrap();
        }
        prop_assert_eq!(&seq.snapshot().stations, &par.snapshot().stations);
    }
}

/// With the pump stopped and every supply wired, paint is conserved until the
/// mixer overflows. A torn read would show up as a change in the total.
#[test]
fn concurrent_readers_only_see_whole_ticks() {
    let mut plant = plant(2, TickMode::Parallel);
    plant.apply_command("station1", "cyan", 1.0).unwrap();
    plant.apply_command("station1", "white", 0.5).unwrap();
    let total_of = |snap: &PlantSnapshot| -> Vec<f64> {
        snap.stations
            .iter()
            .map(|s| s.tanks.iter().map(|t| t.level).sum())
            .collect()
    };
    let expected = total_of(&plant.snapshot());

    let options = ClockOptions {
        period: Duration::from_millis(3),
        dt: 1.0,
        max_ticks: Some(8),
    };
    let (clock, handle) = SimulationClock::spawn(plant, options).unwrap();
    handle.apply_command("station2", "black", 1.0).unwrap();

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let handle = handle.clone();
            let expected = expected.clone();
            thread::spawn(move || {
                let mut seen = 0u64;
                while handle.is_running() {
                    if let Some(snap) = handle.try_snapshot() {
                        for (got, want) in total_of(&snap).iter().zip(expected.iter()) {
                            assert!(
                                (got - want).abs() < 1e-9,
                                "torn snapshot at tick {}",
                                snap.tick
                            );
                        }
                        seen = seen.max(snap.tick);
                    }
                    if let Ok(Some(reading)) = handle.try_read_state("station2", "mixer") {
                        assert!(reading.level <= reading.capacity);
                    }
                    thread::yield_now();
                }
                seen
            })
        })
        .collect();

    let plant = clock.join().unwrap();
    for reader in readers {
        assert!(reader.join().unwrap() <= 8);
    }
    assert_eq!(plant.tick_count(), 8);

    let final_snap = handle.snapshot();
    assert_eq!(final_snap.tick, 8);
    let mixer = final_snap.find("station1", "mixer").unwrap();
    assert!(mixer.level > 0.0);
}
