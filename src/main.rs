use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use questgraph::graph::Status;
use questgraph::query::QuestFilters;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "qg")]
#[command(about = "Questgraph - quest dependency graph, trader lanes and catch-up planning")]
#[command(version)]
struct Cli {
    /// Path to the questgraph directory (default: .questgraph in current dir)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Output as JSON for machine consumption
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Quest filters shared by listing commands
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only quests from this trader
    #[arg(long)]
    trader: Option<String>,

    /// Only quests with these statuses (comma-separated; default all)
    #[arg(long = "status", value_delimiter = ',')]
    statuses: Vec<Status>,

    /// Case-insensitive title search
    #[arg(long)]
    search: Option<String>,

    /// Only quests required for Kappa
    #[arg(long)]
    kappa: bool,

    /// Only quests with an objective on this map
    #[arg(long)]
    map: Option<String>,
}

impl FilterArgs {
    fn into_filters(self) -> QuestFilters {
        QuestFilters {
            trader_id: self.trader,
            statuses: self.statuses,
            search: self.search,
            kappa_only: self.kappa,
            map: self.map,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new questgraph project
    Init,

    /// Show quest statuses, or one quest in detail
    Status {
        /// Quest ID (lists all quests when omitted)
        id: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show the global dependency depth of every quest
    Depths,

    /// Show a quest's ancestors and descendants
    Chain {
        /// Quest ID
        id: String,
    },

    /// Show (or complete) the incomplete prerequisites blocking a quest
    Skip {
        /// Quest ID
        id: String,

        /// Mark the prerequisites completed
        #[arg(long)]
        apply: bool,
    },

    /// Set a quest's progress status explicitly
    Set {
        /// Quest ID
        id: String,

        /// locked, available, in_progress or completed
        status: Status,
    },

    /// Remove a quest's explicit progress so its status is derived again
    Reset {
        /// Quest ID
        id: String,
    },

    /// Show trader lanes in display order
    Traders,

    /// Compute the trader-lane layout
    Layout {
        /// Highlight this quest's full chain and dim everything else
        #[arg(long)]
        focus: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show (or apply) status changes implied by objective progress
    Objectives {
        /// Write the implied progress
        #[arg(long)]
        apply: bool,
    },

    /// Recommend (or apply) a catch-up to the quests you are currently on
    CatchUp {
        /// Target quest IDs
        #[arg(required = true)]
        targets: Vec<String>,

        /// Confirmed sibling branch to complete as well (terminal quest ID)
        #[arg(long = "branch")]
        branches: Vec<String>,

        /// Write the resulting progress
        #[arg(long)]
        apply: bool,
    },

    /// Check the quest graph for cycles and missing prerequisites
    Check,
}

fn init_tracing() {
    // Logs go to stderr so --json output stays parseable
    let filter = EnvFilter::try_from_env("QG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let questgraph_dir = cli.dir.unwrap_or_else(|| PathBuf::from(".questgraph"));

    match cli.command {
        Commands::Init => commands::init::run(&questgraph_dir),
        Commands::Status { id, filters } => {
            commands::status::run(&questgraph_dir, id.as_deref(), &filters.into_filters(), cli.json)
        }
        Commands::Depths => commands::depths::run(&questgraph_dir, cli.json),
        Commands::Chain { id } => commands::chain::run(&questgraph_dir, &id, cli.json),
        Commands::Skip { id, apply } => commands::skip::run(&questgraph_dir, &id, apply, cli.json),
        Commands::Set { id, status } => commands::progress::set(&questgraph_dir, &id, status),
        Commands::Reset { id } => commands::progress::reset(&questgraph_dir, &id),
        Commands::Traders => commands::traders::run(&questgraph_dir, cli.json),
        Commands::Layout { focus, filters } => commands::layout::run(
            &questgraph_dir,
            focus.as_deref(),
            &filters.into_filters(),
            cli.json,
        ),
        Commands::Objectives { apply } => commands::objectives::run(&questgraph_dir, apply, cli.json),
        Commands::CatchUp {
            targets,
            branches,
            apply,
        } => commands::catch_up::run(&questgraph_dir, &targets, &branches, apply, cli.json),
        Commands::Check => commands::check::run(&questgraph_dir, cli.json),
    }
}
