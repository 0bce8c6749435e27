//! CLI entry point for the tower sorting solver.
//!
//! Usage:
//!   tower-sorting <instance> [options]
//!
//! Options:
//!   --strategy <name>   depth-first-tree (default), breadth-first-tree,
//!                       depth-first-graph, breadth-first-graph
//!   --timeout <secs>    Stop the search after this many seconds
//!   --max-nodes <n>     Stop the search after exploring n nodes
//!   --json              Print a JSON report instead of the text rendering
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=tower_sorting=debug`) for diagnostics on
//! stderr.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tower_sorting::{
    load_instance, search, verify_solution, Move, Problem, SearchConfig, SearchOutcome, SearchResult,
    Strategy, TowerSorting, TowerState,
};

#[derive(Parser)]
#[command(name = "tower-sorting")]
#[command(about = "Solve a tower sorting instance by state-space search")]
#[command(version)]
struct Cli {
    /// Path to the instance file
    #[arg(value_name = "INSTANCE")]
    instance: PathBuf,

    /// Search procedure
    #[arg(long, value_enum, default_value_t = StrategyArg::DepthFirstTree)]
    strategy: StrategyArg,

    /// Maximum search time in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of nodes to explore
    #[arg(long)]
    max_nodes: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    DepthFirstTree,
    BreadthFirstTree,
    DepthFirstGraph,
    BreadthFirstGraph,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::DepthFirstTree => Strategy::DepthFirstTree,
            StrategyArg::BreadthFirstTree => Strategy::BreadthFirstTree,
            StrategyArg::DepthFirstGraph => Strategy::DepthFirstGraph,
            StrategyArg::BreadthFirstGraph => Strategy::BreadthFirstGraph,
        }
    }
}

/// JSON report of a search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput<'a> {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    search_exhausted: bool,
    nodes_explored: usize,
    frontier_size: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    path_cost: Option<u64>,
    moves: Vec<Move>,
    states: Vec<&'a TowerState>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tower_sorting=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load instance
    let initial = match load_instance(&cli.instance) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error loading instance {}: {}", cli.instance.display(), e);
            std::process::exit(1);
        }
    };

    // Build search config
    let config = SearchConfig {
        timeout: cli.timeout.map(Duration::from_secs),
        max_nodes: cli.max_nodes,
    };

    // Run search
    let problem = TowerSorting::new(initial);
    let result = search(&problem, cli.strategy.into(), &config);

    // Double-check the path against the rules
    if let Some(node) = result.solution() {
        if !verify_solution(problem.initial(), &node.solution()) {
            error!("search returned a path that does not replay to a sorted state");
        }
    }

    // Print report
    if cli.json {
        let output = format_result(&result);
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_result(&result);
    }

    // Exit with appropriate code
    match result.outcome {
        SearchOutcome::Solved(_) => std::process::exit(0),
        SearchOutcome::Exhausted => std::process::exit(1),
        SearchOutcome::Interrupted(_) => std::process::exit(2),
    }
}

fn print_result(result: &SearchResult<TowerState, Move>) {
    match &result.outcome {
        SearchOutcome::Solved(node) => {
            for step in node.path() {
                println!("{}", step.state());
            }
            println!("* Execution time:\t {}", result.elapsed.as_secs_f64());
            println!("* Path cost to goal:\t {} moves", node.path_cost());
            println!("* #Nodes explored:\t {}", result.nodes_explored);
            println!("* Queue size at goal:\t {}", result.frontier_size);
        }
        SearchOutcome::Exhausted => {
            println!("No solution: search space exhausted");
            println!("* Execution time:\t {}", result.elapsed.as_secs_f64());
            println!("* #Nodes explored:\t {}", result.nodes_explored);
        }
        SearchOutcome::Interrupted(reason) => {
            println!("Search interrupted: {reason}");
            println!("* Execution time:\t {}", result.elapsed.as_secs_f64());
            println!("* #Nodes explored:\t {}", result.nodes_explored);
            println!("* Queue size at stop:\t {}", result.frontier_size);
        }
    }
}

fn format_result(result: &SearchResult<TowerState, Move>) -> SolveOutput<'_> {
    let solution = result.solution();
    SolveOutput {
        solved: solution.is_some(),
        reason: match &result.outcome {
            SearchOutcome::Solved(_) => None,
            SearchOutcome::Exhausted => Some("search_exhausted".to_string()),
            SearchOutcome::Interrupted(reason) => Some(reason.to_string()),
        },
        search_exhausted: result.is_exhausted(),
        nodes_explored: result.nodes_explored,
        frontier_size: result.frontier_size,
        time_elapsed_ms: result.elapsed.as_millis() as u64,
        path_cost: solution.map(|node| node.path_cost()),
        moves: solution.map(|node| node.solution()).unwrap_or_default(),
        states: solution
            .map(|node| node.path().into_iter().map(|step| step.state()).collect())
            .unwrap_or_default(),
    }
}
