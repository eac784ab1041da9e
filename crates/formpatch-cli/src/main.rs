//! Formpatch CLI
//!
//! Diff two RDF documents the way the form engine diffs two RDFa snapshots,
//! and print the resulting SPARQL Update body.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use formpatch_core::{
    diff, BlankNodeLabels, DeleteClauseStyle, Extraction, FormPatch, PatchOptions,
    SelfReferenceReduction, Snapshot,
};
use formpatch_ingest_rdf::{scope_to_resource, snapshot_from_rdf_file};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formpatch")]
#[command(author, version, about = "Formpatch: RDF form diff & SPARQL Update writer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff two documents and print the SPARQL Update body.
    Diff {
        #[command(flatten)]
        input: InputArgs,
        /// DELETE clause layout (overrides the config file)
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
        /// Self-reference reduction (overrides the config file)
        #[arg(long, value_enum)]
        self_reference: Option<SelfReferenceArg>,
        /// JSON file with `PatchOptions`
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the body here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print delta sizes before and after bounded-description closure.
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Document holding the state as loaded
    #[arg(long)]
    stored: PathBuf,
    /// Document holding the state as edited
    #[arg(long)]
    revised: PathBuf,
    /// Keep only quads about this resource (and blank nodes reachable from it)
    #[arg(long)]
    resource: Option<String>,
    /// Number blank nodes by order of appearance instead of keeping labels
    #[arg(long)]
    renumber_blank_nodes: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    DeleteWhere,
    DeleteInsertWhere,
}

impl From<StyleArg> for DeleteClauseStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::DeleteWhere => Self::DeleteWhere,
            StyleArg::DeleteInsertWhere => Self::DeleteInsertWhere,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SelfReferenceArg {
    Disabled,
    BeforeClosure,
    AfterClosure,
}

impl From<SelfReferenceArg> for SelfReferenceReduction {
    fn from(value: SelfReferenceArg) -> Self {
        match value {
            SelfReferenceArg::Disabled => Self::Disabled,
            SelfReferenceArg::BeforeClosure => Self::BeforeClosure,
            SelfReferenceArg::AfterClosure => Self::AfterClosure,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Diff {
            input,
            style,
            self_reference,
            config,
            out,
        } => {
            let options = load_options(config.as_deref(), style, self_reference)?;
            cmd_diff(&input, options, out.as_deref())?;
        }
        Commands::Stats { input } => {
            cmd_stats(&input)?;
        }
    }
    Ok(())
}

fn load_options(
    config: Option<&Path>,
    style: Option<StyleArg>,
    self_reference: Option<SelfReferenceArg>,
) -> Result<PatchOptions> {
    let mut options = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<PatchOptions>(&text)
                .with_context(|| format!("invalid options in {}", path.display()))?
        }
        None => PatchOptions::default(),
    };
    if let Some(style) = style {
        options = options.with_style(style.into());
    }
    if let Some(mode) = self_reference {
        options = options.with_self_reference(mode.into());
    }
    Ok(options)
}

fn load_snapshot(path: &Path, input: &InputArgs) -> Result<Snapshot> {
    let labels = if input.renumber_blank_nodes {
        BlankNodeLabels::Renumber
    } else {
        BlankNodeLabels::Preserve
    };
    let Extraction {
        snapshot,
        blank_nodes,
    } = snapshot_from_rdf_file(path, labels)
        .with_context(|| format!("failed to extract {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        quads = snapshot.len(),
        blank_nodes,
        "loaded snapshot"
    );

    Ok(match &input.resource {
        Some(resource) => scope_to_resource(&snapshot, resource),
        None => snapshot,
    })
}

fn load_pair(input: &InputArgs) -> Result<(Snapshot, Snapshot)> {
    let stored = load_snapshot(&input.stored, input)?;
    let revised = load_snapshot(&input.revised, input)?;
    Ok((stored, revised))
}

fn cmd_diff(input: &InputArgs, options: PatchOptions, out: Option<&Path>) -> Result<()> {
    let (stored, revised) = load_pair(input)?;
    let patch = FormPatch::compute(&stored, &revised, options);
    if patch.is_noop() {
        tracing::info!("no changes between stored and revised");
    }

    let body = patch.to_sparql_update();
    match out {
        Some(path) => fs::write(path, &body)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{body}"),
    }
    Ok(())
}

fn cmd_stats(input: &InputArgs) -> Result<()> {
    let (stored, revised) = load_pair(input)?;
    let plain = diff(&stored, &revised);
    let patch = FormPatch::compute(&stored, &revised, PatchOptions::default());

    println!("stored:  {} quads", stored.len());
    println!("revised: {} quads", revised.len());
    println!(
        "diff:    {} removed, {} added",
        plain.removed.len(),
        plain.added.len()
    );
    println!(
        "closed:  {} removed, {} added",
        patch.removed().len(),
        patch.added().len()
    );
    Ok(())
}
