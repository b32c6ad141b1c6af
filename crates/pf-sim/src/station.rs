//! Mixing station: five supply tanks wired into one mixing tank.

use crate::error::{SimError, SimResult};
use pf_components::{Outlet, Pump, Tank, Valve};
use pf_core::units::{liters, lps};
use pf_pigments::{Pigment, PigmentMix, Portion, blend};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one of the six tanks of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TankKey {
    Supply(Pigment),
    Mixer,
}

impl TankKey {
    /// Number of tanks in every station.
    pub const COUNT: usize = Pigment::COUNT + 1;

    /// All tanks in reading order: the supplies by pigment, then the mixer.
    pub const ALL: [TankKey; TankKey::COUNT] = [
        TankKey::Supply(Pigment::Cyan),
        TankKey::Supply(Pigment::Magenta),
        TankKey::Supply(Pigment::Yellow),
        TankKey::Supply(Pigment::Black),
        TankKey::Supply(Pigment::White),
        TankKey::Mixer,
    ];

    /// Position of this tank in [`TankKey::ALL`].
    pub fn slot(self) -> usize {
        match self {
            TankKey::Supply(p) => p.index(),
            TankKey::Mixer => Pigment::COUNT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TankKey::Supply(p) => p.key(),
            TankKey::Mixer => "mixer",
        }
    }

    /// Resolve a tank name. Only canonical names are accepted.
    pub fn parse(name: &str) -> Option<Self> {
        TankKey::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn is_mixer(self) -> bool {
        matches!(self, TankKey::Mixer)
    }
}

impl fmt::Display for TankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which supply tank feeds which mixer inlet.
///
/// Fixed at construction. A supply without a route drains to waste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wiring {
    routes: BTreeMap<Pigment, usize>,
}

impl Default for Wiring {
    fn default() -> Self {
        Self::standard()
    }
}

impl Wiring {
    /// Number of inlets on a mixing tank.
    pub const INLETS: usize = Pigment::COUNT;

    /// Every supply wired to the inlet matching its pigment index.
    pub fn standard() -> Self {
        Self {
            routes: Pigment::ALL.into_iter().map(|p| (p, p.index())).collect(),
        }
    }

    /// Build an explicit wiring.
    ///
    /// # Errors
    /// Rejects inlets out of range, a pigment routed twice and two pigments
    /// sharing one inlet.
    pub fn new(routes: impl IntoIterator<Item = (Pigment, usize)>) -> SimResult<Self> {
        let mut map = BTreeMap::new();
        let mut used = [false; Self::INLETS];
        for (pigment, inlet) in routes {
            if inlet >= Self::INLETS {
                return Err(SimError::Topology {
                    what: format!("{pigment} routed to inlet {inlet}, mixer has {}", Self::INLETS),
                });
            }
            if used[inlet] {
                return Err(SimError::Topology {
                    what: format!("mixer inlet {inlet} wired twice"),
                });
            }
            if map.insert(pigment, inlet).is_some() {
                return Err(SimError::Topology {
                    what: format!("{pigment} wired twice"),
                });
            }
            used[inlet] = true;
        }
        Ok(Self { routes: map })
    }

    pub fn inlet(&self, pigment: Pigment) -> Option<usize> {
        self.routes.get(&pigment).copied()
    }

    pub fn is_wired(&self, pigment: Pigment) -> bool {
        self.routes.contains_key(&pigment)
    }

    pub fn routes(&self) -> impl Iterator<Item = (Pigment, usize)> + '_ {
        self.routes.iter().map(|(p, i)| (*p, *i))
    }
}

/// Volumes moved by one station tick (litres).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StationTick {
    /// Indexed by `Pigment::index`
    pub supply_outflow: [f64; Pigment::COUNT],
    /// Volume that entered through each mixer inlet, indexed by inlet
    pub inlet_inflow: [f64; Wiring::INLETS],
    pub mixer_inflow: f64,
    pub mixer_outflow: f64,
    pub overflow: f64,
}

/// Five supply tanks with fixed colours, one mixing tank, fixed wiring.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    name: String,
    /// Indexed by `Pigment::index`
    supplies: Vec<Tank>,
    mixer: Tank,
    wiring: Wiring,
}

impl Station {
    /// Assemble a station.
    ///
    /// Each supply tank's colour is forced to its pure pigment.
    ///
    /// # Errors
    /// Every pigment must appear exactly once in `supplies`.
    pub fn new(
        name: impl Into<String>,
        supplies: Vec<(Pigment, Tank)>,
        mixer: Tank,
        wiring: Wiring,
    ) -> SimResult<Self> {
        let name = name.into();
        let mut slots: [Option<Tank>; Pigment::COUNT] = [const { None }; Pigment::COUNT];
        for (pigment, mut tank) in supplies {
            tank.set_color(PigmentMix::pure(pigment));
            if slots[pigment.index()].replace(tank).is_some() {
                return Err(SimError::Topology {
                    what: format!("station {name}: duplicate {pigment} supply tank"),
                });
            }
        }
        let supplies = slots
            .into_iter()
            .collect::<Option<Vec<Tank>>>()
            .ok_or_else(|| SimError::Topology {
                what: format!("station {name}: every pigment needs a supply tank"),
            })?;

        Ok(Self {
            name,
            supplies,
            mixer,
            wiring,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    pub fn supply(&self, pigment: Pigment) -> &Tank {
        &self.supplies[pigment.index()]
    }

    pub fn mixer(&self) -> &Tank {
        &self.mixer
    }

    pub fn tank(&self, key: TankKey) -> &Tank {
        match key {
            TankKey::Supply(p) => &self.supplies[p.index()],
            TankKey::Mixer => &self.mixer,
        }
    }

    pub fn tank_mut(&mut self, key: TankKey) -> &mut Tank {
        match key {
            TankKey::Supply(p) => &mut self.supplies[p.index()],
            TankKey::Mixer => &mut self.mixer,
        }
    }

    /// All tanks in [`TankKey::ALL`] order.
    pub fn tanks(&self) -> impl Iterator<Item = (TankKey, &Tank)> + '_ {
        TankKey::ALL.into_iter().map(move |k| (k, self.tank(k)))
    }

    /// Advance all six tanks by `dt` seconds.
    ///
    /// Supplies drain first; the volumes of wired supplies become the mixer's
    /// inflow. The mixer's new colour is blended from its pre-tick colour and
    /// level plus the incoming streams, then the mixer advances with its pump.
    pub fn tick(&mut self, dt: f64) -> StationTick {
        let mut supply_outflow = [0.0; Pigment::COUNT];
        for (slot, tank) in self.supplies.iter_mut().enumerate() {
            supply_outflow[slot] = tank.advance(0.0, dt).outflow;
        }

        let mut inlet_inflow = [0.0; Wiring::INLETS];
        let mut incoming = Vec::with_capacity(Wiring::INLETS);
        for (pigment, inlet) in self.wiring.routes() {
            let volume = supply_outflow[pigment.index()];
            inlet_inflow[inlet] = volume;
            incoming.push(Portion::new(self.supplies[pigment.index()].color(), volume));
        }
        let mixer_inflow: f64 = inlet_inflow.iter().sum();
        let color = blend(
            Portion::new(self.mixer.color(), self.mixer.level()),
            &incoming,
        );

        let step = self.mixer.advance(mixer_inflow, dt);
        self.mixer.set_color(color);

        StationTick {
            supply_outflow,
            inlet_inflow,
            mixer_inflow,
            mixer_outflow: step.outflow,
            overflow: step.overflow,
        }
    }
}

/// Uniform station parameters, handy for building identical stations.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTemplate {
    /// Supply tank capacity (litres)
    pub supply_capacity: f64,
    /// Initial supply level as a fraction of capacity
    pub supply_fill: f64,
    /// Supply valve flow when fully open (l/s)
    pub valve_max_flow: f64,
    /// Mixing tank capacity (litres)
    pub mixer_capacity: f64,
    /// Mixer pump flow at full speed (l/s)
    pub pump_max_flow: f64,
}

impl Default for StationTemplate {
    fn default() -> Self {
        Self {
            supply_capacity: 100.0,
            supply_fill: 1.0,
            valve_max_flow: 1.0,
            mixer_capacity: 200.0,
            pump_max_flow: 2.0,
        }
    }
}

impl StationTemplate {
    /// Build a station with closed valves, a stopped pump and an empty mixer.
    pub fn build(&self, name: impl Into<String>) -> SimResult<Station> {
        let supplies = Pigment::ALL
            .into_iter()
            .map(|p| -> SimResult<(Pigment, Tank)> {
                let valve = Valve::new(p.key(), lps(self.valve_max_flow), 0.0)?;
                let tank = Tank::new(
                    p.key(),
                    liters(self.supply_capacity),
                    liters(self.supply_capacity * self.supply_fill),
                    PigmentMix::pure(p),
                    Outlet::Valve(valve),
                )?;
                Ok((p, tank))
            })
            .collect::<SimResult<Vec<_>>>()?;

        let pump = Pump::new("mixer", lps(self.pump_max_flow), 0.0)?;
        let mixer = Tank::new(
            "mixer",
            liters(self.mixer_capacity),
            liters(0.0),
            PigmentMix::empty(),
            Outlet::Pump(pump),
        )?;

        Station::new(name, supplies, mixer, Wiring::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_components::FlowControl;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn tank_keys_round_trip_names() {
        for key in TankKey::ALL {
            assert_eq!(TankKey::parse(key.name()), Some(key));
            assert_eq!(TankKey::ALL[key.slot()], key);
        }
        assert_eq!(TankKey::parse("orange"), None);
        assert_eq!(TankKey::parse("c"), None);
    }

    #[test]
    fn wiring_rejects_bad_routes() {
        assert!(Wiring::new([(Pigment::Cyan, 5)]).is_err());
        assert!(Wiring::new([(Pigment::Cyan, 0), (Pigment::Yellow, 0)]).is_err());
        assert!(Wiring::new([(Pigment::Cyan, 0), (Pigment::Cyan, 1)]).is_err());

        let wiring = Wiring::new([(Pigment::Black, 0)]).unwrap();
        assert_eq!(wiring.inlet(Pigment::Black), Some(0));
        assert!(!wiring.is_wired(Pigment::Cyan));
    }

    #[test]
    fn station_needs_every_pigment() {
        let template = StationTemplate::default();
        let full = template.build("s").unwrap();
        let mixer = full.mixer().clone();

        let partial: Vec<_> = Pigment::ALL[..4]
            .iter()
            .map(|p| (*p, full.supply(*p).clone()))
            .collect();
        assert!(Station::new("s", partial, mixer.clone(), Wiring::standard()).is_err());

        let mut doubled: Vec<_> = Pigment::ALL
            .iter()
            .map(|p| (*p, full.supply(*p).clone()))
            .collect();
        doubled.push((Pigment::Cyan, full.supply(Pigment::Cyan).clone()));
        assert!(Station::new("s", doubled, mixer, Wiring::standard()).is_err());
    }

    #[test]
    fn supply_colours_are_forced_pure() {
        let station = StationTemplate::default().build("s").unwrap();
        for p in Pigment::ALL {
            assert_eq!(station.supply(p).color().is_pure(), Some(p));
        }
        assert!(station.mixer().color().is_empty());
    }

    #[test]
    fn inflow_arrives_on_the_wired_inlet() {
        let built = StationTemplate::default().build("s").unwrap();
        let supplies = Pigment::ALL
            .iter()
            .map(|p| (*p, built.supply(*p).clone()))
            .collect();
        let wiring = Wiring::new([(Pigment::Black, 4), (Pigment::Cyan, 2)]).unwrap();
        let mut station = Station::new("s", supplies, built.mixer().clone(), wiring).unwrap();

        station
            .tank_mut(TankKey::Supply(Pigment::Black))
            .outlet_mut()
            .set_open_fraction(1.0)
            .unwrap();
        station
            .tank_mut(TankKey::Supply(Pigment::Cyan))
            .outlet_mut()
            .set_open_fraction(0.5)
            .unwrap();
        let tick = station.tick(1.0);

        assert!(close(tick.inlet_inflow[4], 1.0));
        assert!(close(tick.inlet_inflow[2], 0.5));
        assert_eq!(tick.inlet_inflow[Pigment::Cyan.index()], 0.0);
        assert_eq!(tick.inlet_inflow[Pigment::Black.index()], 0.0);
        assert!(close(tick.mixer_inflow, 1.5));
    }

    #[test]
    fn unwired_supply_drains_to_waste() {
        let template = StationTemplate::default();
        let built = template.build("s").unwrap();
        let supplies = Pigment::ALL
            .iter()
            .map(|p| (*p, built.supply(*p).clone()))
            .collect();
        let wiring = Wiring::new([(Pigment::Yellow, 2)]).unwrap();
        let mut station = Station::new("s", supplies, built.mixer().clone(), wiring).unwrap();

        for p in [Pigment::Cyan, Pigment::Yellow] {
            station
                .tank_mut(TankKey::Supply(p))
                .outlet_mut()
                .set_open_fraction(1.0)
                .unwrap();
        }
        let tick = station.tick(1.0);

        assert!(close(tick.supply_outflow[Pigment::Cyan.index()], 1.0));
        assert!(close(tick.mixer_inflow, 1.0));
        assert!(close(station.mixer().level(), 1.0));
        assert_eq!(station.mixer().color().is_pure(), Some(Pigment::Yellow));
    }

    #[test]
    fn mixer_pump_drains_resident_paint() {
        let mut station = StationTemplate::default().build("s").unwrap();
        station
            .tank_mut(TankKey::Supply(Pigment::Magenta))
            .outlet_mut()
            .set_open_fraction(1.0)
            .unwrap();
        for _ in 0..4 {
            station.tick(1.0);
        }
        assert!(close(station.mixer().level(), 4.0));

        station
            .tank_mut(TankKey::Supply(Pigment::Magenta))
            .outlet_mut()
            .set_open_fraction(0.0)
            .unwrap();
        station
            .tank_mut(TankKey::Mixer)
            .outlet_mut()
            .set_open_fraction(1.0)
            .unwrap();
        let tick = station.tick(1.0);
        assert!(close(tick.mixer_outflow, 2.0));
        assert!(close(station.mixer().level(), 2.0));
        assert_eq!(station.mixer().color().is_pure(), Some(Pigment::Magenta));
    }
}
