//! Level alarms raised when a tank crosses an operator threshold.

use crate::snapshot::PlantSnapshot;
use crate::station::TankKey;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    /// A supply tank is running out.
    SupplyLow,
    /// The mixing tank is close to overflowing.
    MixerHigh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelAlarm {
    /// Tick that produced the crossing
    pub tick: u64,
    pub station: String,
    pub tank: String,
    pub kind: AlarmKind,
    /// Threshold crossed, as a level fraction
    pub threshold: f64,
    pub level_fraction: f64,
}

impl fmt::Display for LevelAlarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = self.threshold * 100.0;
        match self.kind {
            AlarmKind::SupplyLow => {
                write!(f, "{}/{} : {pct:.0}% remaining", self.station, self.tank)
            }
            AlarmKind::MixerHigh => write!(f, "{}/{} : {pct:.0}% full", self.station, self.tank),
        }
    }
}

/// Level fractions that trigger alarms.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmThresholds {
    /// Supply tanks alarm when falling to or below any of these
    pub supply_low: Vec<f64>,
    /// The mixer alarms when rising to or above any of these
    pub mixer_high: Vec<f64>,
}

impl Default for AlarmThresholds {
    fn default() -> Self {
        Self {
            supply_low: vec![0.2, 0.1],
            mixer_high: vec![0.8, 0.9],
        }
    }
}

impl AlarmThresholds {
    /// No alarms at all.
    pub fn none() -> Self {
        Self {
            supply_low: Vec::new(),
            mixer_high: Vec::new(),
        }
    }

    /// Most severe threshold crossed between `before` and `after`, if any.
    fn crossed(&self, key: TankKey, before: f64, after: f64) -> Option<(AlarmKind, f64)> {
        if key.is_mixer() {
            self.mixer_high
                .iter()
                .copied()
                .filter(|t| before < *t && after >= *t)
                .max_by(f64::total_cmp)
                .map(|t| (AlarmKind::MixerHigh, t))
        } else {
            self.supply_low
                .iter()
                .copied()
                .filter(|t| before > *t && after <= *t)
                .min_by(f64::total_cmp)
                .map(|t| (AlarmKind::SupplyLow, t))
        }
    }

    /// Compare two consecutive snapshots of the same plant.
    ///
    /// Only crossings raise alarms; a tank sitting below a threshold stays
    /// quiet until it is refilled and drains past it again.
    pub fn detect(&self, before: &PlantSnapshot, after: &PlantSnapshot) -> Vec<LevelAlarm> {
        let mut alarms = Vec::new();
        for (prev, next) in before.stations.iter().zip(after.stations.iter()) {
            for key in TankKey::ALL {
                let (Some(a), Some(b)) = (prev.reading(key), next.reading(key)) else {
                    continue;
                };
                if let Some((kind, threshold)) =
                    self.crossed(key, a.capacity_fraction, b.capacity_fraction)
                {
                    alarms.push(LevelAlarm {
                        tick: after.tick,
                        station: next.name.clone(),
                        tank: b.tank.clone(),
                        kind,
                        threshold,
                        level_fraction: b.capacity_fraction,
                    });
                }
            }
        }
        alarms
    }
}

/// Most recent alarms, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmLog {
    entries: VecDeque<LevelAlarm>,
    capacity: usize,
}

impl Default for AlarmLog {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl AlarmLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, alarm: LevelAlarm) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(alarm);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelAlarm> + '_ {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LevelAlarm> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
