#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use kinship_analytics::config::{AnalysisConfig, InvalidParameter, load_config};
use kinship_core::Graph;
use kinship_core::error::ErrorCode;
use output::{OutputMode, Reported, report, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "kin: friend recommendations from social graph structure",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Emit JSON output (shorthand for `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Analysis config file (TOML). Falls back to `KINSHIP_CONFIG`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    fn config_path(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| env::var_os("KINSHIP_CONFIG").map(PathBuf::from))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List neighbours",
        long_about = "List the neighbours of one node, or the adjacency list of the whole graph.",
        after_help = "EXAMPLES:\n    # Neighbours of alice\n    kin neighbors friends.txt alice\n\n    # Full adjacency list from stdin\n    cat friends.txt | kin neighbors -"
    )]
    Neighbors(cmd::neighbors::NeighborsArgs),

    #[command(
        about = "Show connected components",
        after_help = "EXAMPLES:\n    kin components friends.txt --json"
    )]
    Components(cmd::InputArgs),

    #[command(
        about = "Degree and closeness centrality",
        after_help = "EXAMPLES:\n    kin centrality friends.txt"
    )]
    Centrality(cmd::InputArgs),

    #[command(
        about = "PageRank scores",
        long_about = "Damped PageRank over the undirected graph, highest score first.",
        after_help = "EXAMPLES:\n    kin pagerank friends.txt --format text"
    )]
    Pagerank(cmd::InputArgs),

    #[command(
        about = "Detect communities",
        long_about = "Detect communities with synchronous label propagation.",
        after_help = "EXAMPLES:\n    kin communities friends.txt"
    )]
    Communities(cmd::InputArgs),

    #[command(
        about = "Recommend friends",
        long_about = "Rank friends-of-friends by mutual friends, degree, PageRank and shared community.",
        after_help = "EXAMPLES:\n    # Top three suggestions for alice\n    kin recommend friends.txt --node alice --top 3\n\n    # Suggestions for everyone\n    kin recommend friends.txt --json"
    )]
    Recommend(cmd::recommend::RecommendArgs),

    #[command(
        about = "Run every analysis",
        after_help = "EXAMPLES:\n    kin report friends.txt"
    )]
    Report(cmd::InputArgs),
}

impl Commands {
    const fn input(&self) -> &cmd::InputArgs {
        match self {
            Self::Neighbors(args) => &args.input,
            Self::Recommend(args) => &args.input,
            Self::Components(input)
            | Self::Centrality(input)
            | Self::Pagerank(input)
            | Self::Communities(input)
            | Self::Report(input) => input,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("KINSHIP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "kin=debug,warn"
        } else {
            "kin=info,warn"
        })
    });

    let format = env::var("KINSHIP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout is reserved for command output.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

/// Resolve the analysis config.
///
/// An explicitly named file must exist; with no file named, defaults apply.
fn resolve_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    if !path.exists() {
        bail!("config file not found: {}", path.display());
    }
    load_config(path).with_context(|| format!("failed to load {}", path.display()))
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Reported errors already wrote their envelope to stderr.
            err.downcast_ref::<Reported>().map_or_else(
                || eprintln!("error: {err:#}"),
                |reported| debug!(code = %reported.code, "exiting after reported error"),
            );
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let config_path = cli.config_path();

    let config = resolve_config(config_path.as_deref()).map_err(|e| {
        let code = e
            .downcast_ref::<InvalidParameter>()
            .map_or(ErrorCode::ConfigParseError, InvalidParameter::code);
        report(output, code, e)
    })?;
    debug!(?config, "analysis config");

    let graph = input::read_graph(&cli.command.input().graph)
        .map_err(|e| report(output, ErrorCode::InputParseError, e))?;

    run(&cli.command, &graph, &config, output, &mut io::stdout().lock())
}

fn run(
    command: &Commands,
    graph: &Graph,
    config: &AnalysisConfig,
    output: OutputMode,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let command_result = match command {
        Commands::Neighbors(args) => cmd::neighbors::run_neighbors(args, graph, output, out),
        Commands::Components(_) => cmd::components::run_components(graph, output, out),
        Commands::Centrality(_) => cmd::centrality::run_centrality(graph, output, out),
        Commands::Pagerank(_) => cmd::pagerank::run_pagerank(graph, &config.pagerank, output, out),
        Commands::Communities(_) => {
            cmd::communities::run_communities(graph, &config.communities, output, out)
        }
        Commands::Recommend(args) => {
            cmd::recommend::run_recommend(args, graph, config, output, out)
        }
        Commands::Report(_) => cmd::report::run_report(graph, config, output, out),
    };

    out.flush()?;
    command_result
}
