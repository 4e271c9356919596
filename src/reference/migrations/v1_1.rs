use std::sync::LazyLock;

use regex::Regex;

use super::Migration;
use crate::reference::ReferenceVersion;
use crate::reference::frontmatter::{DeclaredVersion, Frontmatter};

static TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#[ \t].*$").unwrap());
static TITLE_LINE_WITH_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t].*\n").unwrap());

/// `v1 → v1.1`: the `# Title` heading gives way to the bare URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1_1;

impl Migration for V1_1 {
    fn version(&self) -> ReferenceVersion {
        ReferenceVersion::V1_1
    }

    fn should_migrate(&self, current: &DeclaredVersion) -> bool {
        *current == DeclaredVersion::Known(ReferenceVersion::V1)
    }

    fn migrate(&self, mut frontmatter: Frontmatter, body: String) -> (Frontmatter, String) {
        frontmatter.set_version(self.version());

        let body = match frontmatter.non_empty("url") {
            Some(url) => TITLE_LINE
                .replace_all(&body, regex::NoExpand(url))
                .into_owned(),
            None => TITLE_LINE_WITH_NEWLINE.replace_all(&body, "").into_owned(),
        };
        (frontmatter, body)
    }
}
