//! Reply formatter for backend assistant output
//!
//! Backend replies are free text with `**...**` emphasis markers. This module
//! tokenizes a reply into ordered plain/emphasized segments so the same parse
//! drives both rendering and message construction. The parser is pure and
//! independent of any I/O.

/// Marker pair delimiting an emphasized run
pub const EMPHASIS_MARKER: &str = "**";

/// A contiguous run of reply text, tagged plain or emphasized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The trimmed text content of this run
    pub text: String,

    /// Whether this run was wrapped in emphasis markers
    pub emphasis: bool,
}

impl Segment {
    /// Create a plain segment
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: false,
        }
    }

    /// Create an emphasized segment
    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: true,
        }
    }
}

/// Split a raw reply into ordered plain/emphasized segments
///
/// Runs alternate plain/emphasized starting with plain; each run is trimmed
/// and empty runs are dropped. An opening marker with no matching close is
/// left verbatim inside the final plain run, which matches how the dashboard
/// always rendered such replies.
pub fn format_reply(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = raw;

    while let Some(open) = rest.find(EMPHASIS_MARKER) {
        let after_open = &rest[open + EMPHASIS_MARKER.len()..];
        match after_open.find(EMPHASIS_MARKER) {
            Some(close) => {
                push_trimmed(&mut segments, &rest[..open], false);
                push_trimmed(&mut segments, &after_open[..close], true);
                rest = &after_open[close + EMPHASIS_MARKER.len()..];
            }
            None => {
                // Unmatched opener: the remainder is one plain run
                push_trimmed(&mut segments, rest, false);
                return segments;
            }
        }
    }

    push_trimmed(&mut segments, rest, false);
    segments
}

fn push_trimmed(segments: &mut Vec<Segment>, run: &str, emphasis: bool) {
    let trimmed = run.trim();
    if !trimmed.is_empty() {
        segments.push(Segment {
            text: trimmed.to_string(),
            emphasis,
        });
    }
}
