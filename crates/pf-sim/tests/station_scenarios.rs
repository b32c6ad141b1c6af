//! Behaviour of a single station and plant over short, hand-checked runs.

use pf_pigments::{Pigment, PigmentMix, Portion, blend};
use pf_sim::{Plant, SimError, StationTemplate};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn plant_with(template: StationTemplate) -> Plant {
    let station = template.build("station1").unwrap();
    Plant::new("scenario", vec![station]).unwrap()
}

fn plant() -> Plant {
    plant_with(StationTemplate::default())
}

#[test]
fn closed_valve_never_changes_level() {
    let mut plant = plant();
    let start = plant.read_state("station1", "magenta").unwrap().level;
    for _ in 0..500 {
        plant.run_tick(1.0).unwrap();
        let reading = plant.read_state("station1", "magenta").unwrap();
        assert_eq!(reading.level, start);
        assert_eq!(reading.outflow, 0.0);
    }
}

#[test]
fn empty_supply_with_open_valve_emits_nothing() {
    let mut plant = plant();
    plant.flush_now("station1", "black").unwrap();
    plant.apply_command("station1", "black", 1.0).unwrap();
    for _ in 0..10 {
        let report = plant.run_tick(1.0).unwrap();
        assert_eq!(report.stations[0].supply_outflow[Pigment::Black.index()], 0.0);
        assert_eq!(plant.read_state("station1", "black").unwrap().level, 0.0);
    }
    assert_eq!(plant.read_state("station1", "mixer").unwrap().level, 0.0);
}

#[test]
fn single_cyan_stream_fills_empty_mixer() {
    let mut plant = plant_with(StationTemplate {
        valve_max_flow: 2.0,
        ..StationTemplate::default()
    });
    plant.apply_command("station1", "cyan", 1.0).unwrap();
    plant.run_tick(1.0).unwrap();

    let cyan = plant.read_state("station1", "cyan").unwrap();
    assert!(close(cyan.outflow, 2.0));

    let mixer = plant.read_state("station1", "mixer").unwrap();
    assert!(close(mixer.level, 2.0));
    assert_eq!(mixer.color.is_pure(), Some(Pigment::Cyan));
    assert_eq!(mixer.color_hex, PigmentMix::pure(Pigment::Cyan).to_hex());
}

#[test]
fn cyan_and_yellow_make_green_not_gray() {
    let mut plant = plant();
    plant.apply_command("station1", "cyan", 1.0).unwrap();
    plant.apply_command("station1", "yellow", 1.0).unwrap();
    plant.run_tick(1.0).unwrap();

    let mixer = plant.read_state("station1", "mixer").unwrap();
    assert!(close(mixer.level, 2.0));
    assert!(close(mixer.color.fraction(Pigment::Cyan), 0.5));
    assert!(close(mixer.color.fraction(Pigment::Yellow), 0.5));

    let rgb = mixer.color.to_rgb();
    assert!(rgb.g > rgb.r, "green dominates red: {rgb:?}");
    assert!(rgb.g > rgb.b, "green dominates blue: {rgb:?}");

    // Averaging the two reflectances would give a washed-out gray-green.
    let c = Pigment::Cyan.reflectance();
    let y = Pigment::Yellow.reflectance();
    let avg = [(c.r + y.r) / 2.0, (c.g + y.g) / 2.0, (c.b + y.b) / 2.0];
    assert!(rgb.r < avg[0] && rgb.b < avg[2]);
}

#[test]
fn blend_is_order_independent() {
    let a = PigmentMix::pure(Pigment::Magenta);
    let b = PigmentMix::pure(Pigment::White);
    let empty = PigmentMix::empty();
    let ab = blend(
        Portion::new(&empty, 0.0),
        &[Portion::new(&a, 5.0), Portion::new(&b, 3.0)],
    );
    let ba = blend(
        Portion::new(&empty, 0.0),
        &[Portion::new(&b, 3.0), Portion::new(&a, 5.0)],
    );
    assert_eq!(ab, ba);
}

#[test]
fn zero_inflow_keeps_mixer_colour() {
    let mut plant = plant();
    plant.apply_command("station1", "magenta", 1.0).unwrap();
    plant.apply_command("station1", "white", 0.5).unwrap();
    for _ in 0..3 {
        plant.run_tick(1.0).unwrap();
    }
    plant.apply_command("station1", "magenta", 0.0).unwrap();
    plant.apply_command("station1", "white", 0.0).unwrap();
    plant.apply_command("station1", "mixer", 0.25).unwrap();
    plant.run_tick(1.0).unwrap();

    let before = plant.read_state("station1", "mixer").unwrap();
    for _ in 0..3 {
        let report = plant.run_tick(1.0).unwrap();
        assert_eq!(report.stations[0].mixer_inflow, 0.0);
        let after = plant.read_state("station1", "mixer").unwrap();
        assert_eq!(after.color, before.color);
    }
}

#[test]
fn resident_paint_is_weighted_by_level() {
    let mut plant = plant();
    plant.apply_command("station1", "cyan", 1.0).unwrap();
    for _ in 0..3 {
        plant.run_tick(1.0).unwrap();
    }
    plant.apply_command("station1", "cyan", 0.0).unwrap();
    plant.apply_command("station1", "yellow", 1.0).unwrap();
    plant.run_tick(1.0).unwrap();

    let mixer = plant.read_state("station1", "mixer").unwrap();
    assert!(close(mixer.level, 4.0));
    assert!(close(mixer.color.fraction(Pigment::Cyan), 0.75));
    assert!(close(mixer.color.fraction(Pigment::Yellow), 0.25));
}

#[test]
fn out_of_range_command_keeps_prior_setting() {
    let mut plant = plant();
    plant.apply_command("station1", "cyan", 0.3).unwrap();
    plant.run_tick(1.0).unwrap();

    let err = plant.apply_command("station1", "cyan", 1.5).unwrap_err();
    assert!(matches!(err, SimError::InvalidCommand { .. }));
    assert_eq!(plant.pending_commands(), 0);

    plant.run_tick(1.0).unwrap();
    assert_eq!(plant.read_state("station1", "cyan").unwrap().open_fraction, 0.3);
}

#[test]
fn unknown_tank_leaves_state_untouched() {
    let mut reference = plant();
    let mut probed = plant();
    for p in [&mut reference, &mut probed] {
        p.apply_command("station1", "yellow", 0.8).unwrap();
        p.run_tick(1.0).unwrap();
    }

    let err = probed.apply_command("station1", "orange", 0.5).unwrap_err();
    assert!(matches!(err, SimError::UnknownTarget { .. }));
    let err = probed.apply_command("station42", "cyan", 0.5).unwrap_err();
    assert!(matches!(err, SimError::UnknownTarget { .. }));
    assert!(probed.read_state("station1", "orange").is_err());

    reference.run_tick(1.0).unwrap();
    probed.run_tick(1.0).unwrap();
    assert_eq!(reference.snapshot().stations, probed.snapshot().stations);
}

#[test]
fn mixer_overflow_is_a_silent_clamp() {
    let mut plant = plant_with(StationTemplate {
        mixer_capacity: 3.0,
        ..StationTemplate::default()
    });
    for tank in ["cyan", "magenta", "yellow", "black", "white"] {
        plant.apply_command("station1", tank, 1.0).unwrap();
    }
    let report = plant.run_tick(1.0).unwrap();
    assert!(close(report.stations[0].overflow, 2.0));

    let mixer = plant.read_state("station1", "mixer").unwrap();
    assert_eq!(mixer.capacity_fraction, 1.0);
    assert_eq!(report.alarms.len(), 1);
    assert_eq!(report.alarms[0].threshold, 0.9);
}

#[test]
fn stations_are_independent() {
    let template = StationTemplate::default();
    let stations = vec![template.build("a").unwrap(), template.build("b").unwrap()];
    let mut plant = Plant::new("two", stations).unwrap();
    plant.apply_command("a", "black", 1.0).unwrap();
    for _ in 0..5 {
        plant.run_tick(1.0).unwrap();
    }
    assert!(close(plant.read_state("a", "mixer").unwrap().level, 5.0));
    assert_eq!(plant.read_state("b", "mixer").unwrap().level, 0.0);
    assert_eq!(plant.read_state("b", "black").unwrap().capacity_fraction, 1.0);
}
