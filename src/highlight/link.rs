//! Source link lines: `[title](url) optional comment`.

use crate::highlight::error::{HighlightError, HighlightResult};

/// A parsed source link line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
    /// Whatever follows the closing parenthesis.
    pub comment: Option<String>,
}

/// Parse a `[title](url)` line, tolerating list noise before the link
/// (e.g. `- `) and treating trailing text as a comment.
pub fn parse_link(line: &str) -> HighlightResult<SourceLink> {
    let malformed = || HighlightError::MalformedLink {
        line: line.to_string(),
    };

    let open = line.find('[').ok_or_else(malformed)?;
    let close = line[open..].find(']').map(|i| open + i).ok_or_else(malformed)?;
    let title = line[open + 1..close].trim();

    let rest = line[close + 1..].strip_prefix('(').ok_or_else(malformed)?;
    let end = rest.find(')').ok_or_else(malformed)?;
    let url = rest[..end].trim();
    if url.is_empty() {
        return Err(malformed());
    }

    let trailing = rest[end + 1..].trim();
    Ok(SourceLink {
        title: title.to_string(),
        url: url.to_string(),
        comment: (!trailing.is_empty()).then(|| trailing.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_with_comment() {
        let link = parse_link(
            "[Looking Closely is Everything](https://craigmod.com/essays/looking_closely/) Nice comment!",
        )
        .unwrap();
        assert_eq!(link.title, "Looking Closely is Everything");
        assert_eq!(link.url, "https://craigmod.com/essays/looking_closely/");
        assert_eq!(link.comment.as_deref(), Some("Nice comment!"));
    }

    #[test]
    fn link_with_list_noise() {
        let link = parse_link("- [Title](http://x)").unwrap();
        assert_eq!(link.title, "Title");
        assert_eq!(link.url, "http://x");
        assert_eq!(link.comment, None);
    }

    #[test]
    fn trailing_text() {
        let link = parse_link("[Title](http://x) trailing").unwrap();
        assert_eq!(link.comment.as_deref(), Some("trailing"));
    }

    #[test]
    fn empty_title_is_allowed() {
        let link = parse_link("[](http://x)").unwrap();
        assert_eq!(link.title, "");
        assert_eq!(link.url, "http://x");
    }

    #[test]
    fn malformed_links_are_errors() {
        for line in [
            "[no closing bracket(http://x)",
            "[Title] (http://x)",
            "[Title](http://x",
            "[Title]()",
            "no brackets at all",
        ] {
            let err = parse_link(line).unwrap_err();
            assert!(
                matches!(err, HighlightError::MalformedLink { .. }),
                "expected malformed link for {line:?}"
            );
        }
    }
}
