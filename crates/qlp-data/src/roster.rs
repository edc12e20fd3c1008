//! Player roster extraction from `ClientUserinfoChanged:` lines.
//!
//! A roster line looks like
//! `ClientUserinfoChanged: 2 n\Isgalamido\t\0\model\uriel/zael\hmodel\...`;
//! the player name sits between `n\` and the following `\t`.

use bstr::ByteSlice;
use qlp_core::error::{QlpError, Result};
use tracing::debug;

use crate::segmenter::Segment;

const NAME_OPEN: &[u8] = b"n\\";
const NAME_CLOSE: &[u8] = b"\\t";

/// Distinct player names of one match, most recently joined first.
///
/// Names equal to `world_id` and empty names are skipped; a name seen again is
/// kept at the position of its first join.
pub fn extract_roster(game: &Segment<'_>, marker: &[u8], world_id: &[u8]) -> Result<Vec<String>> {
    let bytes = game.bytes;
    let mut joined: Vec<String> = Vec::new();
    let mut cursor = 0usize;

    while let Some(pos) = bytes[cursor..].find(marker) {
        let after_marker = cursor + pos + marker.len();

        let name_start = bytes[after_marker..]
            .find(NAME_OPEN)
            .map(|p| after_marker + p + NAME_OPEN.len())
            .ok_or(QlpError::MalformedField {
                field: "roster name opening",
                offset: game.offset + after_marker,
            })?;
        let name_end = bytes[name_start..]
            .find(NAME_CLOSE)
            .map(|p| name_start + p)
            .ok_or(QlpError::MalformedField {
                field: "roster name closing",
                offset: game.offset + name_start,
            })?;

        cursor = name_end;

        let raw = &bytes[name_start..name_end];
        if raw.is_empty() || raw == world_id {
            debug!("Skipping roster name {:?}", raw.as_bstr());
            continue;
        }
        let name = String::from_utf8_lossy(raw).into_owned();
        if !joined.contains(&name) {
            joined.push(name);
        }
    }

    joined.reverse();
    Ok(joined)
}
