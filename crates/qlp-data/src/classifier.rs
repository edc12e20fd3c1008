//! Kill line classification.
//!
//! A kill line reads
//! `Kill: 1022 2 22: <world> killed Isgalamido by MOD_TRIGGER_HURT`: three
//! numeric ids, then an `<attacker> killed <victim> by <cause>` sentence.
//! Only the kill's own line is scanned; anything after the first line break
//! belongs to other events.

use bstr::ByteSlice;
use qlp_core::error::{QlpError, Result};
use qlp_core::models::{Attacker, Cause, KillRecord};

use crate::segmenter::Segment;

const KILLED: &[u8] = b" killed";
const KILLED_VICTIM: &[u8] = b"killed ";
const BY: &[u8] = b" by ";
const BY_CAUSE: &[u8] = b"by ";

/// Parse one kill segment into a [`KillRecord`].
///
/// `marker` is the kill marker the segment starts with; `world_id` the
/// reserved attacker name for environmental deaths. Offsets in errors are
/// relative to the segment's parent text.
pub fn classify_kill(kill: &Segment<'_>, marker: &[u8], world_id: &[u8]) -> Result<KillRecord> {
    let line = kill.first_line();
    let malformed = |field: &'static str, at: usize| QlpError::MalformedField {
        field,
        offset: kill.offset + at,
    };

    // 1. Sentence starts two bytes past the first ':' after the marker.
    let after_marker = marker.len().min(line.len());
    let colon = line[after_marker..]
        .find_byte(b':')
        .map(|p| after_marker + p)
        .ok_or_else(|| malformed("kill ids", after_marker))?;
    let sentence = colon + 2;
    if sentence > line.len() {
        return Err(malformed("kill sentence", colon));
    }

    // 2. Attacker field runs up to " killed".
    let killed = line[sentence..]
        .find(KILLED)
        .map(|p| sentence + p)
        .ok_or_else(|| malformed("kill attacker", sentence))?;
    let attacker = &line[sentence..killed];
    let victim_start = killed + KILLED_VICTIM.len() + 1;

    if attacker == world_id {
        // 3. World kill: victim is bounded by " by ", which must be present.
        let by = line
            .get(victim_start..)
            .and_then(|rest| rest.find(BY))
            .map(|p| victim_start + p)
            .ok_or_else(|| malformed("kill victim", victim_start))?;
        return Ok(KillRecord {
            attacker: Attacker::World,
            victim: lossy(&line[victim_start..by]),
            cause: cause_after(line, by + 1),
        });
    }

    // 4. Player kill: " by <cause>" is optional. The victim ends at the first
    // " by ", so a name like "Bob byte" stays whole.
    let rest = line.get(victim_start..).unwrap_or(&[]);
    let (victim, cause) = match rest.find(BY) {
        Some(p) => (&rest[..p], cause_after(line, victim_start + p + 1)),
        None => (rest.trim_end(), Cause::Missing),
    };

    Ok(KillRecord {
        attacker: Attacker::Player(lossy(attacker)),
        victim: lossy(victim),
        cause,
    })
}

/// 5. Resolve the token following `"by "` at `by_at`, up to whitespace.
fn cause_after(line: &[u8], by_at: usize) -> Cause {
    let Some(rest) = line.get(by_at..) else {
        return Cause::Missing;
    };
    if !rest.starts_with(BY_CAUSE) {
        return Cause::Missing;
    }
    let token = &rest[BY_CAUSE.len()..];
    let end = token
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(token.len());
    Cause::from_token(&token[..end])
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
