//! Folds a match's roster and classified kills into a [`MatchReport`].

use qlp_core::error::{QlpError, Result};
use qlp_core::models::{Attacker, Cause, KillRecord, MatchReport};
use tracing::debug;

// ── MatchAggregator ───────────────────────────────────────────────────────────

/// Running aggregate for one match.
///
/// Participants that are not on the roster never get a score entry: the
/// update is dropped and the kill still counts towards `total_kills`.
#[derive(Debug)]
pub struct MatchAggregator {
    /// 1-based match number, used in diagnostics.
    game: usize,
    report: MatchReport,
    dropped_updates: usize,
    unrecognized_causes: usize,
}

impl MatchAggregator {
    /// Seed scores from `roster` and the cause tally from the catalog.
    pub fn new(game: usize, roster: Vec<String>) -> Self {
        Self {
            game,
            report: MatchReport::seeded(roster),
            dropped_updates: 0,
            unrecognized_causes: 0,
        }
    }

    /// Apply one kill.
    pub fn add_kill(&mut self, kill: &KillRecord) {
        self.report.total_kills += 1;

        let (name, delta) = match &kill.attacker {
            Attacker::World => (kill.victim.as_str(), -1),
            Attacker::Player(attacker) => (attacker.as_str(), 1),
        };
        if !self.report.adjust_score(name, delta) {
            self.dropped_updates += 1;
            debug!(
                "game_{}: {:?} is not on the roster; score update dropped",
                self.game, name
            );
        }

        match &kill.cause {
            Cause::Known(means) => self.report.kills_by_means.record(*means),
            Cause::Unrecognized(token) => {
                self.unrecognized_causes += 1;
                debug!("game_{}: unrecognized cause {:?} dropped", self.game, token);
            }
            Cause::Missing => {}
        }
    }

    /// Close the match. Fails with `EmptyRoster` when it saw neither players
    /// nor kills.
    pub fn finish(self) -> Result<MatchReport> {
        if self.report.players.is_empty() && self.report.total_kills == 0 {
            return Err(QlpError::EmptyRoster { game: self.game });
        }
        debug!(
            "game_{}: {} players, {} kills, {} dropped updates, {} unrecognized causes",
            self.game,
            self.report.players.len(),
            self.report.total_kills,
            self.dropped_updates,
            self.unrecognized_causes
        );
        Ok(self.report)
    }
}

/// Aggregate a whole match in one call.
pub fn aggregate_match(game: usize, roster: Vec<String>, kills: &[KillRecord]) -> Result<MatchReport> {
    let mut aggregator = MatchAggregator::new(game, roster);
    for kill in kills {
        aggregator.add_kill(kill);
    }
    aggregator.finish()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
