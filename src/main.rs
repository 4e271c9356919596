//! clippings CLI: import reading highlights into reference notes.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::Result;

use clippings::config::Settings;
use clippings::error::ClippingsResult;
use clippings::integrations::{self, ImportContext, REGISTRY};
use clippings::metadata::{HttpMetadataProvider, MetadataProvider, OfflineMetadataProvider};
use clippings::paths::ClippingsPaths;
use clippings::reference::{MigrationChain, NoteOutcome, migrate_all, migrate_note};
use clippings::vault::FsVault;

#[derive(Parser)]
#[command(
    name = "clippings",
    version,
    about = "Import reading highlights into reference notes"
)]
struct Cli {
    /// Vault directory (overrides `vault_dir` from the config).
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Config file (defaults to $XDG_CONFIG_HOME/clippings/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import highlights and write reference notes.
    Import {
        /// Vault-relative clipping note (markdown) or export file (ibooks).
        source: String,

        /// Integration to import with.
        #[arg(long, default_value = "markdown")]
        integration: String,

        /// Do not fetch pages; use the titles and URLs from the clipping.
        #[arg(long)]
        offline: bool,
    },

    /// Upgrade one reference note to the current format.
    Migrate {
        /// Vault-relative path of the note.
        note: PathBuf,
    },

    /// Upgrade every reference note in the vault.
    MigrateAll,

    /// List registered integrations and their settings.
    Integrations,

    /// Print the effective configuration.
    Config {
        /// Write the effective configuration to the config file when none exists.
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run(Cli::parse())?;
    Ok(())
}

fn run(cli: Cli) -> ClippingsResult<()> {
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => ClippingsPaths::resolve()?.config_file(),
    };
    let mut settings = Settings::load_or_default(&config_path)?;
    if let Some(vault) = cli.vault.clone() {
        settings.vault_dir = vault;
    }
    let vault = FsVault::open(&settings.vault_dir);

    match cli.command {
        Commands::Import {
            source,
            integration,
            offline,
        } => {
            let importer = integrations::construct(
                &integration,
                &settings.integration_settings(&integration),
            )?;
            let http;
            let metadata: &dyn MetadataProvider = if offline {
                &OfflineMetadataProvider
            } else {
                http = HttpMetadataProvider::new(settings.http_timeout_secs, &settings.user_agent);
                &http
            };
            let write = settings.write_options();
            let ctx = ImportContext {
                store: &vault,
                metadata,
                write: &write,
            };

            let report = importer.handle_import(&ctx, &source)?;
            println!(
                "{} note(s) written ({} created, {} appended):",
                report.notes.len(),
                report.created(),
                report.appended()
            );
            for note in &report.notes {
                println!("  {}", note.path.display());
            }
        }

        Commands::Migrate { note } => {
            let chain = MigrationChain::standard();
            let outcome = migrate_note(&vault, &chain, &note, &settings.reference_tag)?;
            print_outcome(&note, &outcome, &chain);
        }

        Commands::MigrateAll => {
            let chain = MigrationChain::standard();
            let report = migrate_all(&vault, &chain, &settings.reference_tag)?;
            for path in &report.migrated {
                println!("  migrated {}", path.display());
            }
            println!(
                "{} migrated to {}, {} already current, {} skipped",
                report.migrated.len(),
                chain.current_version(),
                report.up_to_date,
                report.skipped
            );
        }

        Commands::Integrations => {
            for entry in REGISTRY {
                let integration =
                    (entry.construct)(&settings.integration_settings(entry.id))?;
                println!("{:<10} {}", entry.id, entry.description);
                for setting in integration.contribute_settings() {
                    println!(
                        "  {} (default: {})\n      {}",
                        setting.key, setting.default, setting.description
                    );
                }
            }
        }

        Commands::Config { init } => {
            if init && !config_path.exists() {
                settings.save(&config_path)?;
                println!("Wrote {}", config_path.display());
            } else {
                if init {
                    println!("# {} already exists, left unchanged", config_path.display());
                }
                println!("# {}", config_path.display());
                print!("{}", settings.to_toml()?);
            }
        }
    }

    Ok(())
}

fn print_outcome(note: &Path, outcome: &NoteOutcome, chain: &MigrationChain) {
    match outcome {
        NoteOutcome::Migrated(applied) => {
            let steps: Vec<String> = applied.iter().map(|v| v.to_string()).collect();
            println!(
                "Migrated {} to {} ({})",
                note.display(),
                chain.current_version(),
                steps.join(" → ")
            );
        }
        NoteOutcome::UpToDate => {
            println!("{} is already at {}", note.display(), chain.current_version())
        }
        NoteOutcome::Skipped => println!("{} is not a reference note", note.display()),
    }
}
