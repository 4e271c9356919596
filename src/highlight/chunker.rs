//! Split clipping text into per-highlight chunks.
//!
//! A chunk starts at each `"\n" + indent + marker` and runs until the next
//! one. With indented delimiters (nested lists), a chunk can swallow the
//! next top-level item; such chunks are split again at `"\n" + marker`.

use crate::highlight::error::{HighlightError, HighlightResult};
use crate::highlight::model::{Delimiter, is_relevant};

/// Split `content` into chunks anchored at the delimiter, in document order.
///
/// Fails with [`HighlightError::NoHighlights`] when nothing but noise remains.
pub fn split_chunks(content: &str, delimiter: &Delimiter) -> HighlightResult<Vec<String>> {
    let content = normalize_newlines(content);
    let token = format!("\n{}", delimiter.prefix());

    let mut chunks = Vec::new();
    for (i, piece) in content.split(token.as_str()).enumerate() {
        if !is_relevant(piece) {
            continue;
        }
        // Every piece but the first was preceded by the token.
        let chunk = if i > 0 {
            format!("{token}{piece}")
        } else {
            piece.to_string()
        };

        if delimiter.indent.is_empty() {
            chunks.push(chunk);
        } else {
            chunks.extend(split_less_indented(&chunk, delimiter));
        }
    }

    if chunks.is_empty() {
        return Err(HighlightError::NoHighlights);
    }
    tracing::debug!(count = chunks.len(), "split clipping into chunks");
    Ok(chunks)
}

/// Split a chunk at every less-indented marker (`"\n" + marker`), which
/// belongs to the next sibling group rather than to this highlight.
fn split_less_indented(chunk: &str, delimiter: &Delimiter) -> Vec<String> {
    let boundary = format!("\n{}", delimiter.marker.as_char());

    let mut starts: Vec<usize> = chunk
        .match_indices(boundary.as_str())
        .map(|(i, _)| i)
        .collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(chunk.len());

    starts
        .windows(2)
        .map(|w| &chunk[w[0]..w[1]])
        .filter(|part| is_relevant(part))
        .map(str::to_string)
        .collect()
}

pub(crate) fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::model::Marker;

    #[test]
    fn split_quotes() {
        let chunks = split_chunks(
            "\n> quote (chunk 1)\n\nstuff\n\n> quote (chunk 2)\n\nstuff\n",
            &Delimiter::new(Marker::Quote, ""),
        )
        .unwrap();
        assert_eq!(chunks.len(), 2);
        for c in &chunks {
            assert!(c.starts_with("\n>"));
            assert!(c.contains("stuff"));
        }
    }

    #[test]
    fn split_nested_list() {
        let chunks = split_chunks(
            "\n- stuff\n  - quote\n  - quote\n",
            &Delimiter::new(Marker::Dash, "  "),
        )
        .unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "\n- stuff");
        assert_eq!(chunks[1], "\n  - quote");
    }

    #[test]
    fn split_nested_list_with_less_indented_pollution() {
        let chunks = split_chunks(
            "
- stuff (chunk 1)
  - quote (chunk 2)
  - quote (chunk 3)
    - comment
      - another comment
    - comment
  - quote (chunk 4)
    - comment
- stuff (chunk 5)
  - quote (chunk 6)
",
            &Delimiter::new(Marker::Dash, "  "),
        )
        .unwrap();
        assert_eq!(chunks.len(), 6);
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(
                chunk.contains(&format!("(chunk {})", i + 1)),
                "chunk {i} out of order: {chunk:?}"
            );
        }
        assert!(chunks[3].ends_with("    - comment"));
        assert!(chunks[4].starts_with("\n- stuff (chunk 5)"));
    }

    #[test]
    fn several_top_level_items_in_one_chunk_are_all_kept() {
        let chunks = split_chunks(
            "- [A](a)\n- [B](b)\n- [C](c)\n  - quote for c\n",
            &Delimiter::new(Marker::Dash, "  "),
        )
        .unwrap();
        assert_eq!(
            chunks,
            vec!["- [A](a)", "\n- [B](b)", "\n- [C](c)", "\n  - quote for c\n"]
        );
    }

    #[test]
    fn noise_pieces_dropped() {
        let chunks = split_chunks(
            "**\n> first quote\n>\n> second quote\n",
            &Delimiter::new(Marker::Quote, ""),
        )
        .unwrap();
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn crlf_is_normalized() {
        let chunks = split_chunks(
            "> one quote\r\n\r\n[T](u)\r\n> two quote\r\n",
            &Delimiter::new(Marker::Quote, ""),
        )
        .unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(!chunks[0].contains('\r'));
    }

    #[test]
    fn only_noise_fails() {
        let err = split_chunks("**\n \n", &Delimiter::default()).unwrap_err();
        assert!(matches!(err, HighlightError::NoHighlights));
    }
}
