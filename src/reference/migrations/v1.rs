use std::sync::LazyLock;

use regex::Regex;

use super::Migration;
use crate::reference::ReferenceVersion;
use crate::reference::frontmatter::{DeclaredVersion, Frontmatter};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[^\s#\\]+$").unwrap());
static HIGHLIGHTS_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## Highlights[ \t]*$").unwrap());

/// `v0 → v1`: normalizes the frontmatter fields and moves the tag line from
/// the top of the note to just above the highlights.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1;

impl Migration for V1 {
    fn version(&self) -> ReferenceVersion {
        ReferenceVersion::V1
    }

    fn should_migrate(&self, current: &DeclaredVersion) -> bool {
        matches!(
            current,
            DeclaredVersion::Absent | DeclaredVersion::Known(ReferenceVersion::V0)
        )
    }

    fn migrate(&self, mut frontmatter: Frontmatter, body: String) -> (Frontmatter, String) {
        frontmatter.set_version(self.version());

        let author = frontmatter.non_empty("author").unwrap_or_default().to_string();
        let publisher = frontmatter
            .non_empty("publisher")
            .or_else(|| frontmatter.non_empty("source"))
            .unwrap_or_default()
            .to_string();
        let published = frontmatter.non_empty("published").unwrap_or_default().to_string();
        frontmatter.set("author", author);
        frontmatter.set("publisher", publisher);
        frontmatter.set("published", published);
        frontmatter.remove("source");

        let body = body.replacen("\n---\n\n", "\n", 1);
        (frontmatter, move_tag_line(body))
    }
}

fn is_tag_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|t| TAG.is_match(t))
}

/// Move the first tag line above `## Highlights`, or to the end of the body
/// when there is no such heading.
fn move_tag_line(mut body: String) -> String {
    let mut offset = 0;
    let mut found = None;
    for line in body.split_inclusive('\n') {
        if is_tag_line(line) {
            found = Some(offset..offset + line.len());
            break;
        }
        offset += line.len();
    }
    let Some(range) = found else {
        return body;
    };

    let tags = body[range.clone()].to_string();
    body.replace_range(range, "");
    let tags = tags.trim();

    match HIGHLIGHTS_HEADING.find(&body).map(|m| m.start()) {
        Some(at) => body.insert_str(at, &format!("{tags}\n\n")),
        None => {
            body.push_str("\n\n");
            body.push_str(tags);
            body.push('\n');
        }
    }
    body
}
