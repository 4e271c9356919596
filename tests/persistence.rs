//! Format migration tests over a vault on disk.
//!
//! These tests write notes in older formats, run the vault-wide migration,
//! and verify what ends up on disk.

use std::path::{Path, PathBuf};

use clippings::reference::frontmatter::parse_note;
use clippings::reference::{MigrationChain, ReferenceVersion, migrate_all};
use clippings::vault::{FsVault, NoteStore};

const V0_NOTE: &str = "---
reference_format: v0
source: https://bobheadxi.dev
created: 2021-01-01T00:00:00Z
---

#reference/inbox #review
# [Some Article](https://bobheadxi.dev/article)

> A description.

---

## Highlights

### TODO

> A quote.
";

const V1_NOTE: &str = "---
url: https://example.com/v1
author: Ada
publisher: ''
published: ''
reference_format: v1
---

# Example

#reference/inbox

## Highlights
";

const TAGGED_WITHOUT_FRONTMATTER: &str = "#reference/inbox
# Untracked

Some text

## Highlights
";

fn vault_with(notes: &[(&str, &str)]) -> (tempfile::TempDir, FsVault) {
    let dir = tempfile::TempDir::new().unwrap();
    let vault = FsVault::open(dir.path());
    for (path, content) in notes {
        vault.create(Path::new(path), content).unwrap();
    }
    (dir, vault)
}

#[test]
fn migrate_all_upgrades_every_reference_note() {
    let (_dir, vault) = vault_with(&[
        ("reference/old.md", V0_NOTE),
        ("reference/newer.md", V1_NOTE),
        ("untracked.md", TAGGED_WITHOUT_FRONTMATTER),
        ("journal/today.md", "# Today\n\nWrote some code. #daily\n"),
    ]);

    let chain = MigrationChain::standard();
    let report = migrate_all(&vault, &chain, "#reference").unwrap();
    assert_eq!(
        report.migrated,
        vec![
            PathBuf::from("reference/newer.md"),
            PathBuf::from("reference/old.md"),
            PathBuf::from("untracked.md"),
        ]
    );
    assert_eq!(report.up_to_date, 0);
    assert_eq!(report.skipped, 1);

    // v0 → v1.1
    let text = vault.read(Path::new("reference/old.md")).unwrap();
    let (fm, body) = parse_note("old", &text).unwrap();
    assert_eq!(fm.get_str("reference_format"), Some("v1.1"));
    assert_eq!(fm.get_str("publisher"), Some("https://bobheadxi.dev"));
    assert_eq!(fm.get_str("created"), Some("2021-01-01T00:00:00Z"));
    assert!(!fm.contains("source"));
    assert_eq!(
        body,
        "\n\n> A description.\n\n#reference/inbox #review\n\n## Highlights\n\n### TODO\n\n> A quote.\n"
    );

    // v1 → v1.1, heading replaced by the URL.
    let text = vault.read(Path::new("reference/newer.md")).unwrap();
    let (fm, body) = parse_note("newer", &text).unwrap();
    assert_eq!(fm.get_str("reference_format"), Some("v1.1"));
    assert_eq!(fm.get_str("author"), Some("Ada"));
    assert_eq!(body, "\nhttps://example.com/v1\n\n#reference/inbox\n\n## Highlights\n");

    // A tagged note without frontmatter gains one.
    let text = vault.read(Path::new("untracked.md")).unwrap();
    assert!(text.starts_with("---\nreference_format: v1.1\n"));
    let (_, body) = parse_note("untracked", &text).unwrap();
    assert_eq!(body, "\n\nSome text\n\n#reference/inbox\n\n## Highlights\n");

    // Unrelated notes are untouched.
    assert_eq!(
        vault.read(Path::new("journal/today.md")).unwrap(),
        "# Today\n\nWrote some code. #daily\n"
    );
}

#[test]
fn second_run_is_a_no_op() {
    let (_dir, vault) = vault_with(&[("old.md", V0_NOTE)]);
    let chain = MigrationChain::standard();

    let first = migrate_all(&vault, &chain, "#reference").unwrap();
    assert_eq!(first.migrated.len(), 1);
    let after_first = vault.read(Path::new("old.md")).unwrap();

    let second = migrate_all(&vault, &chain, "#reference").unwrap();
    assert!(second.migrated.is_empty());
    assert_eq!(second.up_to_date, 1);
    assert_eq!(vault.read(Path::new("old.md")).unwrap(), after_first);
}

#[test]
fn partial_chain_stops_at_its_last_step() {
    let (_dir, vault) = vault_with(&[("old.md", V0_NOTE)]);
    let chain = MigrationChain::new(vec![Box::new(clippings::reference::migrations::V1)]);
    assert_eq!(chain.current_version(), ReferenceVersion::V1);

    migrate_all(&vault, &chain, "#reference").unwrap();
    let text = vault.read(Path::new("old.md")).unwrap();
    let (fm, body) = parse_note("old", &text).unwrap();
    assert_eq!(fm.get_str("reference_format"), Some("v1"));
    assert!(body.contains("# [Some Article](https://bobheadxi.dev/article)"));
}

#[test]
fn unknown_format_is_left_alone() {
    let note = "---\nreference_format: v9\n---\n\n# Future\n";
    let (_dir, vault) = vault_with(&[("future.md", note)]);

    let report = migrate_all(&vault, &MigrationChain::standard(), "#reference").unwrap();
    assert!(report.migrated.is_empty());
    assert_eq!(report.up_to_date, 1);
    assert_eq!(vault.read(Path::new("future.md")).unwrap(), note);
}
