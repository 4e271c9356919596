//! Heuristic detection of the highlight marker convention.
//!
//! Every line that starts (after indentation) with one of the candidate
//! markers is counted under its exact indentation. The most frequent
//! (marker, indent) pair wins. Ties are resolved deterministically:
//!
//! - within a marker, the indent seen last in document order wins, so a
//!   nested list with one quote per source picks the nested level;
//! - across markers, [`Marker::ALL`] order (`>`, `*`, `-`) wins.
//!
//! Documents that mix conventions can fool this. That is accepted.

use crate::highlight::model::{Delimiter, Marker, is_relevant};

/// Per-marker tally of indentation strings, in first-seen order.
#[derive(Default)]
struct IndentCounts {
    entries: Vec<(String, usize)>,
}

impl IndentCounts {
    fn bump(&mut self, indent: &str) {
        match self.entries.iter_mut().find(|(i, _)| i == indent) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((indent.to_string(), 1)),
        }
    }

    /// Most common indent. Later entries win ties.
    fn most_common(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (indent, count) in &self.entries {
            if best.is_none_or(|(_, c)| *count >= c) {
                best = Some((indent.as_str(), *count));
            }
        }
        best
    }
}

/// Guess which marker and indentation delimit highlights in `content`.
///
/// Falls back to `>` with no indentation when no line carries a marker.
pub fn detect_delimiter(content: &str) -> Delimiter {
    let mut counts: [IndentCounts; 3] = Default::default();

    for line in content.lines().filter(|l| is_relevant(l)) {
        let trimmed = line.trim_start();
        let Some(marker) = trimmed.chars().next().and_then(Marker::from_char) else {
            continue;
        };
        let indent = &line[..line.len() - trimmed.len()];
        counts[slot(marker)].bump(indent);
    }

    let mut best = Delimiter::default();
    let mut best_count = 0usize;
    for marker in Marker::ALL {
        if let Some((indent, count)) = counts[slot(marker)].most_common() {
            if count > best_count {
                best = Delimiter::new(marker, indent);
                best_count = count;
            }
        }
    }

    tracing::debug!(
        marker = %best.marker,
        indent = best.indent.len(),
        count = best_count,
        "detected highlight delimiter"
    );
    best
}

fn slot(marker: Marker) -> usize {
    match marker {
        Marker::Quote => 0,
        Marker::Asterisk => 1,
        Marker::Dash => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_quote() {
        let d = detect_delimiter("\n> quote\n\nstuff\n\n> quote\n\nstuff\n");
        assert_eq!(d.marker, Marker::Quote);
        assert_eq!(d.indent, "");
    }

    #[test]
    fn detect_indented_dash() {
        let d = detect_delimiter("\n- stuff\n  - quote\n  - quote\n");
        assert_eq!(d.marker, Marker::Dash);
        assert_eq!(d.indent, "  ");
    }

    #[test]
    fn detect_indented_dash_with_comments() {
        let d = detect_delimiter(
            "\n- stuff\n  - quote\n  - quote\n    - comment\n- stuff\n  - quote\n",
        );
        assert_eq!(d.marker, Marker::Dash);
        assert_eq!(d.indent, "  ");
    }

    #[test]
    fn no_markers_defaults_to_quote() {
        let d = detect_delimiter("just some prose\nwith no markers at all\n");
        assert_eq!(d, Delimiter::default());
    }

    #[test]
    fn short_lines_are_ignored() {
        // Two `**` artifacts would otherwise outvote the single quote.
        let d = detect_delimiter("**\n**\n> the only real quote\n");
        assert_eq!(d.marker, Marker::Quote);
    }

    #[test]
    fn tie_within_marker_keeps_last_indent() {
        let d = detect_delimiter("    - deep item\n  - shallow item\n");
        assert_eq!(d.marker, Marker::Dash);
        assert_eq!(d.indent, "  ");
    }

    #[test]
    fn one_quote_per_source_picks_nested_level() {
        let d = detect_delimiter("- [A](https://a)\n  - q\n- [B](https://b)\n  - q\n");
        assert_eq!(d, Delimiter::new(Marker::Dash, "  "));

        let d = detect_delimiter("- [A](https://a)\n  - q");
        assert_eq!(d, Delimiter::new(Marker::Dash, "  "));
    }

    #[test]
    fn tie_across_markers_keeps_enumeration_order() {
        let d = detect_delimiter("- a list item\n> a quoted line\n* a starred item\n");
        assert_eq!(d.marker, Marker::Quote);
    }

    #[test]
    fn tab_indentation_is_literal() {
        let d = detect_delimiter("- [T](u)\n\t- quote one\n\t- quote two\n");
        assert_eq!(d.indent, "\t");
    }
}
