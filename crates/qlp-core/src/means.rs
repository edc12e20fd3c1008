//! The fixed catalog of cause-of-death identifiers.
//!
//! Mirrors Quake III's `meansOfDeath_t`. Declaration order is catalog order,
//! which is also the order `kills_by_means` is rendered in.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A recognised cause of death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeansOfDeath {
    Unknown,
    Shotgun,
    Gauntlet,
    Machinegun,
    Grenade,
    GrenadeSplash,
    Rocket,
    RocketSplash,
    Plasma,
    PlasmaSplash,
    Railgun,
    Lightning,
    Bfg,
    BfgSplash,
    Water,
    Slime,
    Lava,
    Crush,
    Telefrag,
    Falling,
    Suicide,
    TargetLaser,
    TriggerHurt,
    Nail,
    Chaingun,
    ProximityMine,
    Kamikaze,
    Juiced,
    Grapple,
}

impl MeansOfDeath {
    /// Every catalog member, in catalog order.
    pub const ALL: [MeansOfDeath; 29] = [
        MeansOfDeath::Unknown,
        MeansOfDeath::Shotgun,
        MeansOfDeath::Gauntlet,
        MeansOfDeath::Machinegun,
        MeansOfDeath::Grenade,
        MeansOfDeath::GrenadeSplash,
        MeansOfDeath::Rocket,
        MeansOfDeath::RocketSplash,
        MeansOfDeath::Plasma,
        MeansOfDeath::PlasmaSplash,
        MeansOfDeath::Railgun,
        MeansOfDeath::Lightning,
        MeansOfDeath::Bfg,
        MeansOfDeath::BfgSplash,
        MeansOfDeath::Water,
        MeansOfDeath::Slime,
        MeansOfDeath::Lava,
        MeansOfDeath::Crush,
        MeansOfDeath::Telefrag,
        MeansOfDeath::Falling,
        MeansOfDeath::Suicide,
        MeansOfDeath::TargetLaser,
        MeansOfDeath::TriggerHurt,
        MeansOfDeath::Nail,
        MeansOfDeath::Chaingun,
        MeansOfDeath::ProximityMine,
        MeansOfDeath::Kamikaze,
        MeansOfDeath::Juiced,
        MeansOfDeath::Grapple,
    ];

    /// The identifier exactly as it appears in the log.
    pub fn as_str(self) -> &'static str {
        match self {
            MeansOfDeath::Unknown => "MOD_UNKNOWN",
            MeansOfDeath::Shotgun => "MOD_SHOTGUN",
            MeansOfDeath::Gauntlet => "MOD_GAUNTLET",
            MeansOfDeath::Machinegun => "MOD_MACHINEGUN",
            MeansOfDeath::Grenade => "MOD_GRENADE",
            MeansOfDeath::GrenadeSplash => "MOD_GRENADE_SPLASH",
            MeansOfDeath::Rocket => "MOD_ROCKET",
            MeansOfDeath::RocketSplash => "MOD_ROCKET_SPLASH",
            MeansOfDeath::Plasma => "MOD_PLASMA",
            MeansOfDeath::PlasmaSplash => "MOD_PLASMA_SPLASH",
            MeansOfDeath::Railgun => "MOD_RAILGUN",
            MeansOfDeath::Lightning => "MOD_LIGHTNING",
            MeansOfDeath::Bfg => "MOD_BFG",
            MeansOfDeath::BfgSplash => "MOD_BFG_SPLASH",
            MeansOfDeath::Water => "MOD_WATER",
            MeansOfDeath::Slime => "MOD_SLIME",
            MeansOfDeath::Lava => "MOD_LAVA",
            MeansOfDeath::Crush => "MOD_CRUSH",
            MeansOfDeath::Telefrag => "MOD_TELEFRAG",
            MeansOfDeath::Falling => "MOD_FALLING",
            MeansOfDeath::Suicide => "MOD_SUICIDE",
            MeansOfDeath::TargetLaser => "MOD_TARGET_LASER",
            MeansOfDeath::TriggerHurt => "MOD_TRIGGER_HURT",
            MeansOfDeath::Nail => "MOD_NAIL",
            MeansOfDeath::Chaingun => "MOD_CHAINGUN",
            MeansOfDeath::ProximityMine => "MOD_PROXIMITY_MINE",
            MeansOfDeath::Kamikaze => "MOD_KAMIKAZE",
            MeansOfDeath::Juiced => "MOD_JUICED",
            MeansOfDeath::Grapple => "MOD_GRAPPLE",
        }
    }

    /// Look a raw token up in the catalog.
    ///
    /// Case-sensitive exact match: `MOD_ROCKET` never matches
    /// `MOD_ROCKET_SPLASH` and `mod_railgun` matches nothing.
    pub fn from_token(token: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().as_bytes() == token)
    }
}

// ── CauseTally ────────────────────────────────────────────────────────────────

/// Occurrence count per catalog member, seeded at zero for every member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseTally {
    counts: BTreeMap<MeansOfDeath, u64>,
}

impl Default for CauseTally {
    fn default() -> Self {
        Self {
            counts: MeansOfDeath::ALL.iter().map(|m| (*m, 0)).collect(),
        }
    }
}

impl CauseTally {
    /// Count one more occurrence of `means`.
    pub fn record(&mut self, means: MeansOfDeath) {
        *self.counts.entry(means).or_insert(0) += 1;
    }

    /// `true` once at least one cause has been recorded.
    pub fn has_recognized(&self) -> bool {
        self.counts.values().any(|&c| c > 0)
    }

    /// Non-zero entries in catalog order.
    pub fn non_zero(&self) -> impl Iterator<Item = (MeansOfDeath, u64)> + '_ {
        self.counts
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(m, &c)| (*m, c))
    }
}

impl Serialize for CauseTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (means, count) in self.non_zero() {
            map.serialize_entry(means.as_str(), &count)?;
        }
        map.end()
    }
}
