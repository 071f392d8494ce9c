//! Air-defense engagement entries and layered selection
//!
//! The orchestrator turns air-defense units into `SamEntry` values; the
//! missile, air, drone and helicopter resolvers only ever see these.

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;

/// Engagement layer of a SAM system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamTier {
    /// Outer umbrella, 200-400 km
    Long,
    /// Sector defense, 30-100 km
    Medium,
    /// Point defense, 15-30 km
    Short,
    Unknown,
}

impl SamTier {
    pub fn of(system_type: &str) -> Self {
        match system_type.to_lowercase().as_str() {
            "s400" | "hq9" => Self::Long,
            "barak8" | "mrsam" | "akash" | "hq16" => Self::Medium,
            "spyder" | "spada2000" | "fm90" => Self::Short,
            _ => Self::Unknown,
        }
    }
}

/// One defending air-defense system as seen by a resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamEntry {
    pub unit_id: Option<UnitId>,
    pub system_type: String,
    /// Interceptor rounds available
    pub rounds: u32,
    pub ready: bool,
    /// Per-engagement kill probability against aircraft, when known
    pub effectiveness: Option<f32>,
    pub range_km: f32,
}

impl SamEntry {
    pub fn new(system_type: impl Into<String>, rounds: u32) -> Self {
        Self {
            unit_id: None,
            system_type: system_type.into(),
            rounds,
            ready: true,
            effectiveness: None,
            range_km: 30.0,
        }
    }

    pub fn with_effectiveness(mut self, effectiveness: f32) -> Self {
        self.effectiveness = Some(effectiveness);
        self
    }

    pub fn with_range(mut self, range_km: f32) -> Self {
        self.range_km = range_km;
        self
    }

    pub fn tier(&self) -> SamTier {
        SamTier::of(&self.system_type)
    }

    /// Lowercased type with separators stripped ("HQ-9/P" -> "hq9p")
    pub fn normalized_type(&self) -> String {
        self.system_type
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }
}

/// Build the layered defense for one target.
///
/// Every explicitly protecting SAM, then at most one long-range and one
/// medium-range system from `others`, de-duplicated by system type. When
/// that yields nothing, fall back to the first short-range system.
pub fn select_layered(protecting: Vec<SamEntry>, others: &[SamEntry]) -> Vec<SamEntry> {
    let mut layered = protecting;
    if let Some(long) = others.iter().find(|s| s.tier() == SamTier::Long) {
        layered.push(long.clone());
    }
    if let Some(medium) = others.iter().find(|s| s.tier() == SamTier::Medium) {
        layered.push(medium.clone());
    }

    let mut deduped: Vec<SamEntry> = Vec::with_capacity(layered.len());
    for sam in layered {
        if !deduped.iter().any(|s| s.system_type == sam.system_type) {
            deduped.push(sam);
        }
    }

    if deduped.is_empty() {
        if let Some(short) = others.iter().find(|s| s.tier() == SamTier::Short) {
            deduped.push(short.clone());
        }
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sam(t: &str) -> SamEntry {
        SamEntry::new(t, 16)
    }

    #[test]
    fn test_tiers() {
        assert_eq!(SamTier::of("S400"), SamTier::Long);
        assert_eq!(SamTier::of("akash"), SamTier::Medium);
        assert_eq!(SamTier::of("fm90"), SamTier::Short);
        assert_eq!(SamTier::of("flak"), SamTier::Unknown);
    }

    #[test]
    fn test_layering_one_per_tier() {
        let others = vec![sam("s400"), sam("s400"), sam("akash"), sam("mrsam"), sam("spyder")];
        let layered = select_layered(Vec::new(), &others);
        let types: Vec<&str> = layered.iter().map(|s| s.system_type.as_str()).collect();
        assert_eq!(types, vec!["s400", "akash"]);
    }

    #[test]
    fn test_protecting_first_and_deduped() {
        let protecting = vec![sam("akash"), sam("spyder")];
        let others = vec![sam("s400"), sam("akash")];
        let layered = select_layered(protecting, &others);
        let types: Vec<&str> = layered.iter().map(|s| s.system_type.as_str()).collect();
        assert_eq!(types, vec!["akash", "spyder", "s400"]);
    }

    #[test]
    fn test_short_range_fallback() {
        let others = vec![sam("fm90"), sam("spada2000")];
        let layered = select_layered(Vec::new(), &others);
        assert_eq!(layered.len(), 1);
        assert_eq!(layered[0].system_type, "fm90");
    }

    #[test]
    fn test_empty_when_nothing_defends() {
        assert!(select_layered(Vec::new(), &[]).is_empty());
    }

    #[test]
    fn test_normalized_type() {
        assert_eq!(SamEntry::new("HQ-9/P", 1).normalized_type(), "hq9p");
    }
}
