use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::means::{CauseTally, MeansOfDeath};

/// Who is credited with a kill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attacker {
    /// The world pseudo-player: falling, drowning, lava, trigger hurt, ...
    World,
    /// A named player.
    Player(String),
}

/// The cause token of a kill line, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// The token is a catalog member.
    Known(MeansOfDeath),
    /// A token was present but is not in the catalog.
    Unrecognized(String),
    /// The line carried no `by <cause>` clause.
    Missing,
}

impl Cause {
    /// Resolve a raw token; an empty token counts as missing.
    pub fn from_token(token: &[u8]) -> Self {
        if token.is_empty() {
            return Cause::Missing;
        }
        match MeansOfDeath::from_token(token) {
            Some(means) => Cause::Known(means),
            None => Cause::Unrecognized(String::from_utf8_lossy(token).into_owned()),
        }
    }

    /// The catalog member, if the token was recognised.
    pub fn means(&self) -> Option<MeansOfDeath> {
        match self {
            Cause::Known(means) => Some(*means),
            _ => None,
        }
    }
}

/// One classified kill event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillRecord {
    pub attacker: Attacker,
    pub victim: String,
    pub cause: Cause,
}

/// A roster member and their running score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScore {
    pub name: String,
    /// Kills minus world-caused deaths. May go negative.
    pub score: i64,
}

/// Aggregated statistics for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    /// Number of kill events in the match, whatever their attribution.
    pub total_kills: u64,
    /// Roster in report order (most recently joined first).
    pub players: Vec<PlayerScore>,
    pub kills_by_means: CauseTally,
}

impl MatchReport {
    /// A report seeded from `roster` with every score and tally at zero.
    pub fn seeded<I, S>(roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            total_kills: 0,
            players: roster
                .into_iter()
                .map(|name| PlayerScore {
                    name: name.into(),
                    score: 0,
                })
                .collect(),
            kills_by_means: CauseTally::default(),
        }
    }

    /// Score for `name`, or `None` when they are not on the roster.
    pub fn score_of(&self, name: &str) -> Option<i64> {
        self.players.iter().find(|p| p.name == name).map(|p| p.score)
    }

    /// Add `delta` to `name`'s score. Returns `false` when `name` is not on
    /// the roster, in which case nothing changes.
    pub fn adjust_score(&mut self, name: &str, delta: i64) -> bool {
        match self.players.iter_mut().find(|p| p.name == name) {
            Some(player) => {
                player.score += delta;
                true
            }
            None => false,
        }
    }
}

/// Renders as `{ total_kills, players: [..], kills: {..}, kills_by_means? }`.
impl Serialize for MatchReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_means = self.kills_by_means.has_recognized();
        let field_count = if with_means { 4 } else { 3 };

        let mut state = serializer.serialize_struct("MatchReport", field_count)?;
        state.serialize_field("total_kills", &self.total_kills)?;
        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        state.serialize_field("players", &names)?;
        state.serialize_field("kills", &PlayerKills(&self.players))?;
        if with_means {
            state.serialize_field("kills_by_means", &self.kills_by_means)?;
        } else {
            state.skip_field("kills_by_means")?;
        }
        state.end()
    }
}

/// `name -> score` map in roster order.
struct PlayerKills<'a>(&'a [PlayerScore]);

impl Serialize for PlayerKills<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for player in self.0 {
            map.serialize_entry(&player.name, &player.score)?;
        }
        map.end()
    }
}

/// The final report: one [`MatchReport`] per match, in log order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub matches: Vec<MatchReport>,
}

impl Report {
    /// JSON key of the match at `index` (zero-based): `game_1`, `game_2`, ...
    pub fn game_key(index: usize) -> String {
        format!("game_{}", index + 1)
    }

    /// Total kills across all matches.
    pub fn total_kills(&self) -> u64 {
        self.matches.iter().map(|m| m.total_kills).sum()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.matches.len()))?;
        for (index, report) in self.matches.iter().enumerate() {
            map.serialize_entry(&Self::game_key(index), report)?;
        }
        map.end()
    }
}
