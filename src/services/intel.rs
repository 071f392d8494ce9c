//! Per-faction intelligence picture of the enemy
//!
//! Reports only move up the quality ladder when written; they move down
//! only through age-based decay.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::geometry::GeometryService;
use crate::combat::base::CombatRng;
use crate::core::types::{Faction, HexCoord, Turn, UnitId};
use crate::units::Unit;

/// How much is known about an enemy unit, worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelQuality {
    #[default]
    None,
    /// Something is there
    Suspected,
    /// Unit type known
    Detected,
    /// Identity and approximate strength
    Identified,
    /// Accurate current information
    Confirmed,
}

impl IntelQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Suspected => "suspected",
            Self::Detected => "detected",
            Self::Identified => "identified",
            Self::Confirmed => "confirmed",
        }
    }

    /// One step down the ladder
    pub fn decayed(&self) -> Self {
        match self {
            Self::Confirmed => Self::Identified,
            Self::Identified => Self::Detected,
            Self::Detected => Self::Suspected,
            Self::Suspected | Self::None => Self::None,
        }
    }

    /// Pre-mission intel quality used by special-forces planning
    pub fn mission_value(&self) -> f32 {
        match self {
            Self::Confirmed => 0.9,
            Self::Identified => 0.7,
            Self::Detected => 0.5,
            Self::Suspected => 0.3,
            Self::None => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelSource {
    #[default]
    Unknown,
    Visual,
    Radar,
    Sigint,
    Humint,
    Isr,
    Satellite,
    SpecialForces,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelReport {
    pub unit_id: UnitId,
    /// Faction of the observed unit
    pub faction: Faction,
    pub quality: IntelQuality,
    pub last_updated: Turn,
    pub reported_location: Option<HexCoord>,
    pub reported_type: Option<String>,
    pub reported_strength: Option<u32>,
    /// 0-1
    pub confidence: f32,
    pub source: IntelSource,
}

impl IntelReport {
    pub fn new(unit_id: UnitId, faction: Faction, quality: IntelQuality, turn: Turn) -> Self {
        Self {
            unit_id,
            faction,
            quality,
            last_updated: turn,
            reported_location: None,
            reported_type: None,
            reported_strength: None,
            confidence: 0.5,
            source: IntelSource::Unknown,
        }
    }

    pub fn with_source(mut self, source: IntelSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_location(mut self, location: Option<HexCoord>) -> Self {
        self.reported_location = location;
        self
    }

    pub fn with_strength(mut self, strength: u32) -> Self {
        self.reported_strength = Some(strength);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    #[default]
    Radar,
    Visual,
    Sigint,
    Satellite,
}

impl SensorKind {
    fn source(&self) -> IntelSource {
        match self {
            Self::Radar => IntelSource::Radar,
            Self::Visual => IntelSource::Visual,
            Self::Sigint => IntelSource::Sigint,
            Self::Satellite => IntelSource::Satellite,
        }
    }
}

/// Fixed sensor coverage owned by a faction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub faction: Faction,
    #[serde(default)]
    pub kind: SensorKind,
    pub location: HexCoord,
    pub range_hexes: u32,
    /// 0-100
    pub detection_rating: f32,
    /// 0-100
    pub identification_rating: f32,
    #[serde(default = "active")]
    pub active: bool,
}

fn active() -> bool {
    true
}

impl Sensor {
    pub fn awacs(id: impl Into<String>, faction: Faction, location: HexCoord) -> Self {
        Self::new(id, faction, SensorKind::Radar, location, 40, 90.0, 75.0)
    }

    pub fn ground_radar(id: impl Into<String>, faction: Faction, location: HexCoord) -> Self {
        Self::new(id, faction, SensorKind::Radar, location, 20, 80.0, 60.0)
    }

    pub fn recon(id: impl Into<String>, faction: Faction, location: HexCoord, range_hexes: u32) -> Self {
        Self::new(id, faction, SensorKind::Visual, location, range_hexes, 70.0, 80.0)
    }

    fn new(
        id: impl Into<String>,
        faction: Faction,
        kind: SensorKind,
        location: HexCoord,
        range_hexes: u32,
        detection_rating: f32,
        identification_rating: f32,
    ) -> Self {
        Self {
            id: id.into(),
            faction,
            kind,
            location,
            range_hexes,
            detection_rating,
            identification_rating,
            active: true,
        }
    }
}

/// What the combat core reads from and writes to the intelligence picture
pub trait IntelStore {
    /// Record a report. Returns false if it would lower the existing quality.
    fn add_intel(&mut self, observer: Faction, report: IntelReport) -> bool;

    fn unit_intel(&self, observer: Faction, unit_id: &UnitId) -> Option<&IntelReport>;

    fn known_enemies(&self, observer: Faction, min_quality: IntelQuality) -> Vec<&IntelReport>;

    /// Quality of what `observer` knows about `unit_id`
    fn quality_of(&self, observer: Faction, unit_id: &UnitId) -> IntelQuality {
        self.unit_intel(observer, unit_id)
            .map_or(IntelQuality::None, |r| r.quality)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FactionIntel {
    reports: BTreeMap<UnitId, IntelReport>,
    sensors: Vec<Sensor>,
}

/// Default intelligence store with sensor-driven detection and decay
#[derive(Debug, Clone)]
pub struct FogOfWar {
    india: FactionIntel,
    pakistan: FactionIntel,
    rng: CombatRng,
}

impl FogOfWar {
    pub fn new(seed: u64) -> Self {
        Self {
            india: FactionIntel::default(),
            pakistan: FactionIntel::default(),
            rng: CombatRng::seeded(seed),
        }
    }

    fn side(&self, faction: Faction) -> &FactionIntel {
        match faction {
            Faction::India => &self.india,
            Faction::Pakistan => &self.pakistan,
        }
    }

    fn side_mut(&mut self, faction: Faction) -> &mut FactionIntel {
        match faction {
            Faction::India => &mut self.india,
            Faction::Pakistan => &mut self.pakistan,
        }
    }

    pub fn add_sensor(&mut self, sensor: Sensor) {
        self.side_mut(sensor.faction).sensors.push(sensor);
    }

    pub fn remove_sensor(&mut self, faction: Faction, sensor_id: &str) {
        self.side_mut(faction).sensors.retain(|s| s.id != sensor_id);
    }

    pub fn sensors(&self, faction: Faction) -> &[Sensor] {
        &self.side(faction).sensors
    }

    /// Run every active sensor of `observer` against `enemies`. Returns the
    /// reports that were written.
    pub fn process_detection(
        &mut self,
        observer: Faction,
        enemies: &[&Unit],
        geometry: &dyn GeometryService,
        turn: Turn,
    ) -> Vec<IntelReport> {
        let sensors: Vec<Sensor> = self.side(observer).sensors.iter().filter(|s| s.active).cloned().collect();
        let mut written = Vec::new();

        for enemy in enemies {
            let Some(location) = enemy.location else {
                continue;
            };
            let terrain_mod = geometry
                .terrain_at(location)
                .map_or(1.0, |t| t.detection_modifier());
            let concealment = geometry.concealment(location);
            let unit_concealment = 1.0 - f32::from(enemy.state.dug_in) * 0.15;

            let mut best: Option<(IntelQuality, f32, IntelSource)> = None;
            for sensor in &sensors {
                let distance = geometry.hex_distance(sensor.location, location);
                if distance > sensor.range_hexes || sensor.range_hexes == 0 {
                    continue;
                }
                let range_factor = 1.0 - (distance as f32 / sensor.range_hexes as f32) * 0.5;
                let detection = sensor.detection_rating / 100.0
                    * range_factor
                    * terrain_mod
                    * unit_concealment
                    * (1.0 - concealment / 200.0);
                if !self.rng.hit_check(detection) {
                    continue;
                }

                let id_chance = sensor.identification_rating / 100.0 * range_factor * terrain_mod;
                let (quality, confidence) = if self.rng.hit_check(id_chance * 0.5) {
                    (IntelQuality::Confirmed, 0.9)
                } else if self.rng.hit_check(id_chance) {
                    (IntelQuality::Identified, 0.7)
                } else {
                    (IntelQuality::Detected, 0.5)
                };
                tracing::trace!(sensor = %sensor.id, unit = %enemy.id, quality = quality.as_str(), "sensor contact");

                if best.map_or(true, |(q, c, _)| quality > q || confidence > c) {
                    best = Some((quality, confidence, sensor.kind.source()));
                }
            }

            let Some((quality, confidence, source)) = best else {
                continue;
            };
            let mut report = IntelReport::new(enemy.id.clone(), enemy.faction, quality, turn)
                .with_confidence(confidence)
                .with_source(source)
                .with_location(Some(location));
            if quality >= IntelQuality::Detected {
                report.reported_type = Some(enemy.unit_type.clone());
            }
            if quality >= IntelQuality::Identified {
                report.reported_strength = Some(self.estimate_strength(enemy, confidence));
            }
            if self.add_intel(observer, report.clone()) {
                written.push(report);
            }
        }

        written
    }

    fn estimate_strength(&mut self, unit: &Unit, confidence: f32) -> u32 {
        let error = 1.0 + (1.0 - confidence) * self.rng.uniform(-0.3, 0.3);
        (unit.state.strength_current as f32 * error).max(0.0) as u32
    }

    /// Age out stale reports: four turns old loses a quality step, two
    /// turns old loses confidence
    pub fn decay(&mut self, observer: Faction, turn: Turn) {
        let reports = &mut self.side_mut(observer).reports;
        reports.retain(|_, report| {
            let age = turn.saturating_sub(report.last_updated);
            if age >= 4 {
                report.quality = report.quality.decayed();
                report.confidence *= 0.8;
                report.quality != IntelQuality::None
            } else {
                if age >= 2 {
                    report.confidence *= 0.9;
                }
                true
            }
        });
    }

    pub fn is_detected(&self, observer: Faction, unit_id: &UnitId) -> bool {
        self.quality_of(observer, unit_id) >= IntelQuality::Detected
    }

    pub fn tracked(&self, observer: Faction) -> usize {
        self.side(observer).reports.len()
    }
}

impl IntelStore for FogOfWar {
    fn add_intel(&mut self, observer: Faction, report: IntelReport) -> bool {
        let reports = &mut self.side_mut(observer).reports;
        if let Some(existing) = reports.get(&report.unit_id) {
            if report.quality < existing.quality {
                return false;
            }
        }
        reports.insert(report.unit_id.clone(), report);
        true
    }

    fn unit_intel(&self, observer: Faction, unit_id: &UnitId) -> Option<&IntelReport> {
        self.side(observer).reports.get(unit_id)
    }

    fn known_enemies(&self, observer: Faction, min_quality: IntelQuality) -> Vec<&IntelReport> {
        self.side(observer)
            .reports
            .values()
            .filter(|r| r.quality >= min_quality)
            .collect()
    }
}
