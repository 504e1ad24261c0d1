use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::backlinks::relink_collection;
use crate::collection::CollectionWriter;
use crate::ingest::{ingest, sync_collection};
use crate::models::Source;
use crate::tagger::retag::tag_collection;

#[derive(Parser)]
#[command(name = "palimpsest")]
#[command(version)]
#[command(about = "Turn AI chat exports and session logs into a linked markdown collection")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args)]
pub struct VaultArg {
    /// Collection directory
    #[arg(long, env = "PALIMPSEST_VAULT", default_value = "vault")]
    pub vault: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import conversations from one source
    Ingest {
        #[arg(long, value_enum)]
        source: SourceArg,
        /// Export file, or session log file/directory (defaults to the tool's own location)
        #[arg(long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        vault: VaultArg,
    },
    /// Add derived tags to every document
    Tag {
        #[command(flatten)]
        vault: VaultArg,
    },
    /// Rewrite Related sections from shared tags
    Backlink {
        #[command(flatten)]
        vault: VaultArg,
    },
    /// Ingest every source, then relink
    Sync {
        #[command(flatten)]
        vault: VaultArg,
        /// ChatGPT export (conversations.json or the export .zip)
        #[arg(long)]
        chatgpt: Option<PathBuf>,
        /// Claude web export (conversations.json)
        #[arg(long)]
        claude_web: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Chatgpt,
    ClaudeWeb,
    ClaudeCode,
    Codex,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Chatgpt => Source::ChatGpt,
            SourceArg::ClaudeWeb => Source::ClaudeWeb,
            SourceArg::ClaudeCode => Source::ClaudeCode,
            SourceArg::Codex => Source::Codex,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { source, input, vault } => {
            run_ingest(source.into(), input.as_deref(), &vault.vault)
        }
        Commands::Tag { vault } => {
            let updated = tag_collection(&vault.vault)?;
            println!("Updated tags in {} documents", updated);
            Ok(())
        }
        Commands::Backlink { vault } => {
            let updated = relink_collection(&vault.vault)?;
            println!("Added backlinks to {} documents", updated);
            Ok(())
        }
        Commands::Sync { vault, chatgpt, claude_web } => {
            let (report, relinked) =
                sync_collection(&vault.vault, chatgpt.as_deref(), claude_web.as_deref())?;
            println!("{}", report);
            println!("Added backlinks to {} documents", relinked);
            Ok(())
        }
    }
}

fn run_ingest(source: Source, input: Option<&Path>, vault: &Path) -> Result<()> {
    let mut writer = CollectionWriter::open(vault)?;
    let report = ingest(&mut writer, source, input)?;
    println!("{}: {}", source, report);
    Ok(())
}
