use pf_project::{ValidationError, reference_plant, validate_plant};
use proptest::prelude::*;

proptest! {
    #[test]
    fn in_range_initial_state_is_accepted(
        station in 0usize..6,
        supply in 0usize..5,
        level in 0.0f64..=1.0,
        open in 0.0f64..=1.0,
        speed in 0.0f64..=1.0,
    ) {
        let mut plant = reference_plant();
        let s = &mut plant.stations[station];
        s.supplies[supply].level_l = level * s.supplies[supply].capacity_l;
        s.supplies[supply].valve_open = open;
        s.mixer.pump_speed = speed;
        prop_assert!(validate_plant(&plant).is_ok());
    }

    #[test]
    fn out_of_range_opening_is_rejected(
        supply in 0usize..5,
        excess in 1e-6f64..10.0,
        below in any::<bool>(),
    ) {
        let mut plant = reference_plant();
        plant.stations[0].supplies[supply].valve_open = if below { -excess } else { 1.0 + excess };
        let is_invalid_value = matches!(
            validate_plant(&plant),
            Err(ValidationError::InvalidValue { .. })
        );
        prop_assert!(is_invalid_value);
    }
}
