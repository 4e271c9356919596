//! Versioned upgrades of reference notes.
//!
//! Each [`Migration`] moves a note from one `reference_format` to the next.
//! A [`MigrationChain`] runs its steps in order, re-reading the declared
//! version after every step, so one run can cascade `v0 → v1 → v1.1`.

mod v1;
mod v1_1;

pub use v1::V1;
pub use v1_1::V1_1;

use crate::reference::ReferenceVersion;
use crate::reference::frontmatter::{DeclaredVersion, Frontmatter, split_frontmatter};

/// One format upgrade over `(frontmatter, body)`.
pub trait Migration: Send + Sync {
    /// The version this step produces.
    fn version(&self) -> ReferenceVersion;

    /// Whether a note declaring `current` should go through this step.
    fn should_migrate(&self, current: &DeclaredVersion) -> bool;

    fn migrate(&self, frontmatter: Frontmatter, body: String) -> (Frontmatter, String);
}

/// The result of running a chain over one note.
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub frontmatter: Frontmatter,
    pub body: String,
    /// Versions applied, in order. Empty when the note was already current
    /// or declared a version no step accepts.
    pub applied: Vec<ReferenceVersion>,
}

impl Migrated {
    pub fn is_changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// An ordered list of migration steps.
pub struct MigrationChain {
    steps: Vec<Box<dyn Migration>>,
}

impl MigrationChain {
    pub fn new(steps: Vec<Box<dyn Migration>>) -> Self {
        Self { steps }
    }

    /// Every known step, oldest first.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(V1), Box::new(V1_1)])
    }

    /// The version a fully migrated note ends at.
    pub fn current_version(&self) -> ReferenceVersion {
        self.steps
            .last()
            .map(|step| step.version())
            .unwrap_or(ReferenceVersion::V0)
    }

    /// Run every applicable step over a note.
    ///
    /// `frontmatter` is the already-parsed block; `file_contents` is the raw
    /// note text, from which the block is stripped to get the body. `note`
    /// only names the note in logs.
    pub fn run(&self, note: &str, frontmatter: Frontmatter, file_contents: &str) -> Migrated {
        let (_, body) = split_frontmatter(file_contents);
        let mut migrated = Migrated {
            frontmatter,
            body: body.trim_start().to_string(),
            applied: Vec::new(),
        };

        for step in &self.steps {
            if !step.should_migrate(&migrated.frontmatter.declared_version()) {
                continue;
            }
            tracing::info!(note, version = %step.version(), "running migration");
            let (frontmatter, body) = step.migrate(migrated.frontmatter, migrated.body);
            migrated.frontmatter = frontmatter;
            migrated.body = body;
            migrated.applied.push(step.version());
        }

        migrated
    }
}

impl Default for MigrationChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationChain")
            .field(
                "steps",
                &self.steps.iter().map(|s| s.version()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::frontmatter::parse_note;

    const V0_NOTE: &str = "---
reference_format: v0
source: https://bobheadxi.dev
---

#reference/tag #tag
# Title

Description

---

## Highlights

### Something";

    fn run_standard(text: &str) -> Migrated {
        let (frontmatter, _) = parse_note("test", text).unwrap();
        MigrationChain::standard().run("test", frontmatter, text)
    }

    #[test]
    fn v0_cascades_to_current() {
        let migrated = run_standard(V0_NOTE);

        assert_eq!(migrated.applied, vec![ReferenceVersion::V1, ReferenceVersion::V1_1]);
        let fm = &migrated.frontmatter;
        assert_eq!(fm.get_str("reference_format"), Some("v1.1"));
        assert_eq!(fm.get_str("publisher"), Some("https://bobheadxi.dev"));
        assert_eq!(fm.get_str("author"), Some(""));
        assert_eq!(fm.get_str("published"), Some(""));
        assert!(!fm.contains("source"));

        assert!(!migrated.body.contains("---"));
        assert!(
            migrated
                .body
                .contains("Description\n\n#reference/tag #tag\n\n## Highlights")
        );
        assert!(!migrated.body.contains("# Title"));
        assert!(migrated.body.ends_with("### Something"));
    }

    #[test]
    fn first_step_alone() {
        let (frontmatter, _) = parse_note("test", V0_NOTE).unwrap();
        let chain = MigrationChain::new(vec![Box::new(V1)]);
        let migrated = chain.run("test", frontmatter, V0_NOTE);

        assert_eq!(chain.current_version(), ReferenceVersion::V1);
        assert_eq!(migrated.applied, vec![ReferenceVersion::V1]);
        assert_eq!(migrated.frontmatter.get_str("reference_format"), Some("v1"));
        assert!(
            migrated
                .body
                .starts_with("# Title\n\nDescription\n\n#reference/tag #tag\n\n## Highlights")
        );
    }

    #[test]
    fn missing_version_is_v0() {
        let text =
            "---\nurl: https://example.com\n---\n\n#reference/inbox\n# Title\n\n## Highlights\n";
        let migrated = run_standard(text);
        assert_eq!(migrated.applied, vec![ReferenceVersion::V1, ReferenceVersion::V1_1]);
        // The heading is replaced by the URL.
        assert!(migrated.body.starts_with("https://example.com\n"));
    }

    #[test]
    fn current_note_is_untouched() {
        let text = "---\nreference_format: v1.1\nurl: x\n---\n\nbody\n";
        let migrated = run_standard(text);
        assert!(!migrated.is_changed());
        assert_eq!(migrated.body, "body\n");
    }

    #[test]
    fn unknown_version_is_untouched() {
        let text = "---\nreference_format: v7\n---\n\n# Keep me\n";
        let migrated = run_standard(text);
        assert!(!migrated.is_changed());
        assert_eq!(migrated.body, "# Keep me\n");
        assert_eq!(migrated.frontmatter.get_str("reference_format"), Some("v7"));
    }

    #[test]
    fn standard_chain_ends_at_current() {
        assert_eq!(
            MigrationChain::standard().current_version(),
            crate::reference::CURRENT_VERSION
        );
    }
}
