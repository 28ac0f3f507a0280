//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{item, tag, view};
use crate::storage::{Config, Workspace};

#[derive(Parser)]
#[command(name = "prioritize")]
#[command(author, version, about = "Rank items and tags by how much other work depends on them")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data file (relative to the working directory)
    #[arg(long, short = 'f', global = true, env = "PRIORITIZE_FILE")]
    pub file: Option<PathBuf>,

    /// Output format (defaults to the configured one)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data file if it does not exist yet
    Init,

    /// Manage items
    #[command(subcommand)]
    Item(item::ItemCommands),

    /// Manage tags
    #[command(subcommand)]
    Tag(tag::TagCommands),

    /// Rank entities by how many others depend on them
    Rank {
        /// Rank tags instead of items
        #[arg(long)]
        tags: bool,
    },

    /// Show the ranked dependency tree
    ///
    /// Every entity is listed under each entity it depends on, so the text
    /// output grows with the number of dependency paths rather than the
    /// number of entities. Use `dot` or `--format json` for large graphs.
    Tree {
        /// Show the tag tree instead of the item tree
        #[arg(long)]
        tags: bool,
    },

    /// Print the item graph as a vis.js node/edge dataset
    Vis,

    /// Print the item tree as Graphviz DOT
    Dot,

    /// Print the whole store as one compact JSON document
    Export,

    /// Print the application name
    Name,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(file) = &cli.file {
        config.set_data_file(file.clone());
    }
    let format = cli.format.unwrap_or(config.global.default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose_ctx("config", &format!("Data file: {}", config.data_path().display()));
    let workspace = Workspace::open(config)?;

    match cli.command {
        Commands::Init => {
            let path = workspace.data_path().display();
            if workspace.was_created() {
                output.success(&format!("Initialized data file at {}", path));
            } else {
                output.success(&format!("Data file already exists at {}", path));
            }
        }

        Commands::Item(cmd) => item::run(cmd, &workspace, &output)?,
        Commands::Tag(cmd) => tag::run(cmd, &workspace, &output)?,

        Commands::Rank { tags } => {
            output.verbose_ctx("rank", &format!("Ranking {}", kind(tags)));
            view::rank(&workspace, &output, tags)?
        }
        Commands::Tree { tags } => {
            output.verbose_ctx("tree", &format!("Building {} tree", kind(tags)));
            view::tree(&workspace, &output, tags)?
        }
        Commands::Vis => view::vis(&workspace, &output)?,
        Commands::Dot => view::dot(&workspace)?,
        Commands::Export => view::export(&workspace)?,
        Commands::Name => view::name(&workspace, &output),
    }

    Ok(())
}

fn kind(tags: bool) -> &'static str {
    if tags {
        "tags"
    } else {
        "items"
    }
}

/// Sends library events to stderr, filtered by `PRIORITIZE_LOG`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PRIORITIZE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_item_put_with_repeated_flags() {
        let cli = Cli::try_parse_from([
            "prioritize", "item", "put", "n1", "--tag", "t1", "--tag", "t2", "--depends-on", "n0",
        ])
        .unwrap();

        match cli.command {
            Commands::Item(item::ItemCommands::Put { name, tags, depends_on }) => {
                assert_eq!(name, "n1");
                assert_eq!(tags, vec!["t1", "t2"]);
                assert_eq!(depends_on, vec!["n0"]);
            }
            _ => panic!("expected item put"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["prioritize", "rank", "--tags", "--format", "json", "--file", "x.json"])
            .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.file, Some(PathBuf::from("x.json")));
        assert!(matches!(cli.command, Commands::Rank { tags: true }));
    }

    #[test]
    fn short_f_selects_data_file() {
        let cli = Cli::try_parse_from(["prioritize", "-f", "plans.json", "vis"]).unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("plans.json")));
        assert_eq!(cli.format, None);
    }
}
