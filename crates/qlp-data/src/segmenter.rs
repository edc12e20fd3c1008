//! Marker-based segmentation of an immutable byte view.
//!
//! The same splitter serves both levels of the log: matches within the whole
//! text (`InitGame:`) and kill events within one match (`Kill:`).

use bstr::ByteSlice; // attaches `find` to `&[u8]`
use qlp_core::error::{QlpError, Result};

// ── Segment ───────────────────────────────────────────────────────────────────

/// A contiguous, non-empty range of a parent text that begins at a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Byte offset of the marker within the text the segment was cut from.
    pub offset: usize,
    /// The segment's bytes, marker included.
    pub bytes: &'a [u8],
}

impl<'a> Segment<'a> {
    /// Byte offset one past the segment's last byte, in parent coordinates.
    pub fn end(&self) -> usize {
        self.offset + self.bytes.len()
    }

    /// The segment up to, not including, its first line break.
    pub fn first_line(&self) -> &'a [u8] {
        match self.bytes.find_byteset(b"\r\n") {
            Some(pos) => &self.bytes[..pos],
            None => self.bytes,
        }
    }
}

// ── Segments ──────────────────────────────────────────────────────────────────

/// Lazy iterator over the segments of `text` opened by `marker`.
///
/// Cloning the iterator restarts from the clone point; [`segments`] builds a
/// fresh one from the start. After an error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a [u8],
    marker: &'a [u8],
    cursor: Option<usize>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<Segment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor?;
        let begin = match self.text[cursor..].find(self.marker) {
            Some(pos) => cursor + pos,
            None => {
                self.cursor = None;
                return None;
            }
        };

        // The next occurrence is searched past the current marker, so a
        // marker never terminates its own segment.
        let after_marker = begin + self.marker.len();
        let end = self.text[after_marker..]
            .find(self.marker)
            .map(|pos| after_marker + pos)
            .unwrap_or(self.text.len());

        // Only an empty marker could yield a zero-length span, and `segments`
        // rejects those; the branches below are a guard.
        let mut len = end - begin;
        if len == 0 {
            // Fall back to the remaining text length.
            len = self.text.len() - begin;
        }
        if len == 0 {
            self.cursor = None;
            return Some(Err(QlpError::InvalidSegment { offset: begin }));
        }

        self.cursor = if begin + len < self.text.len() {
            Some(begin + len)
        } else {
            None
        };

        Some(Ok(Segment {
            offset: begin,
            bytes: &self.text[begin..begin + len],
        }))
    }
}

/// Split `text` at every occurrence of `marker`.
///
/// Bytes before the first marker belong to no segment. An empty marker is an
/// `InvalidArgument` error.
pub fn segments<'a>(text: &'a [u8], marker: &'a [u8]) -> Result<Segments<'a>> {
    if marker.is_empty() {
        return Err(QlpError::InvalidArgument(
            "segment marker must not be empty".to_string(),
        ));
    }
    Ok(Segments {
        text,
        marker,
        cursor: Some(0),
    })
}

/// All match segments of the log, in appearance order.
///
/// Fails with `NoMatchFound` when the marker never occurs.
pub fn split_matches<'a>(text: &'a [u8], marker: &'a [u8]) -> Result<Vec<Segment<'a>>> {
    let matches = segments(text, marker)?.collect::<Result<Vec<_>>>()?;
    if matches.is_empty() {
        return Err(QlpError::NoMatchFound);
    }
    Ok(matches)
}

/// All kill segments of one match, in appearance order. May be empty.
///
/// Offsets of the returned segments are relative to the match segment.
pub fn split_kills<'a>(game: &Segment<'a>, marker: &'a [u8]) -> Result<Vec<Segment<'a>>> {
    segments(game.bytes, marker)?.collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &[u8] = b"InitGame:";

    fn offsets(segs: &[Segment<'_>]) -> Vec<usize> {
        segs.iter().map(|s| s.offset).collect()
    }

    #[test]
    fn test_split_matches_counts_every_marker() {
        let text = b"  0:00 InitGame: a\n  1:00 InitGame: b\n  2:00 InitGame: c\n";
        let segs = split_matches(text, MARKER).unwrap();
        assert_eq!(segs.len(), 3);
        for seg in &segs {
            assert!(seg.bytes.starts_with(MARKER));
        }
    }

    #[test]
    fn test_split_matches_covers_text_without_gaps() {
        let text = b"header\nInitGame: one\nnoise\nInitGame: two\nInitGame:";
        let segs = split_matches(text, MARKER).unwrap();

        let first = text.find(MARKER).unwrap();
        assert_eq!(segs[0].offset, first);
        for pair in segs.windows(2) {
            assert_eq!(pair[0].end(), pair[1].offset);
        }
        assert_eq!(segs.last().unwrap().end(), text.len());

        let covered: usize = segs.iter().map(|s| s.bytes.len()).sum();
        assert_eq!(covered, text.len() - first);
    }

    #[test]
    fn test_split_matches_marker_at_end_of_text() {
        let text = b"InitGame: x\nInitGame:";
        let segs = split_matches(text, MARKER).unwrap();
        assert_eq!(offsets(&segs), vec![0, 12]);
        assert_eq!(segs[1].bytes, b"InitGame:");
    }

    #[test]
    fn test_split_matches_adjacent_markers() {
        let text = b"InitGame:InitGame:";
        let segs = split_matches(text, MARKER).unwrap();
        assert_eq!(offsets(&segs), vec![0, 9]);
        assert!(segs.iter().all(|s| s.bytes == MARKER));
    }

    #[test]
    fn test_split_matches_no_marker() {
        let text = b"ShutdownGame:\nKill: 1 2 3: a killed b by MOD_RAILGUN\n";
        assert!(matches!(
            split_matches(text, MARKER),
            Err(QlpError::NoMatchFound)
        ));
    }

    #[test]
    fn test_empty_marker_is_invalid_argument() {
        assert!(matches!(
            segments(b"text", b""),
            Err(QlpError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_segments_is_restartable() {
        let text = b"InitGame: a InitGame: b";
        let iter = segments(text, MARKER).unwrap();
        let first: Vec<_> = iter.clone().collect::<Result<Vec<_>>>().unwrap();
        let second: Vec<_> = iter.collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_split_kills_empty_is_ok() {
        let game = Segment {
            offset: 0,
            bytes: b"InitGame: \\sv_hostname\\x\n ClientConnect: 2\n",
        };
        assert!(split_kills(&game, b"Kill:").unwrap().is_empty());
    }

    #[test]
    fn test_split_kills_stays_within_match() {
        let text = b"InitGame: a\nKill: 1: x killed y by MOD_SHOTGUN\nKill: 2: y killed x by MOD_BFG\nInitGame: b\nKill: 3: z killed w by MOD_LAVA\n";
        let games = split_matches(text, MARKER).unwrap();
        let first = split_kills(&games[0], b"Kill:").unwrap();
        let second = split_kills(&games[1], b"Kill:").unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(first.last().unwrap().end(), games[0].bytes.len());
        assert!(!first[1].bytes.contains_str("InitGame:"));
    }

    #[test]
    fn test_first_line_stops_at_line_break() {
        let seg = Segment {
            offset: 0,
            bytes: b"Kill: 1 2 3: a killed b by MOD_BFG\r\n 20:40 Item: 2\n",
        };
        assert_eq!(seg.first_line(), b"Kill: 1 2 3: a killed b by MOD_BFG");
    }
}
