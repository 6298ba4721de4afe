//! Starrail Planner - Entry Point
//!
//! Loads the TOML configuration, then either generates plans, drives the
//! decision loop for a number of rounds, or prints a stored entry.

use starrail_planner::battle::DecisionLoop;
use starrail_planner::core::config::PlannerConfig;
use starrail_planner::core::error::Result;
use starrail_planner::llm::{Advisor, DisabledAdvisor, LlmClient};
use starrail_planner::planning::PlanningSession;
use starrail_planner::storage::{keys, load_record, FileMemoryStore, MemoryStore};
use starrail_planner::strategy::StrategyPlan;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Combat analytics and strategy planner
#[derive(Parser, Debug)]
#[command(name = "starrail-planner")]
#[command(about = "Plan turn-based battles and recommend actions round by round")]
struct Cli {
    /// TOML configuration file (defaults are used when it does not exist)
    #[arg(long, short = 'c', default_value = "config/planner.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute, print and persist strategy plans
    Plan {
        /// Override the configured mode key
        #[arg(long)]
        mode: Option<String>,
    },
    /// Drive the decision loop with the selected plan
    Battle {
        /// Rounds to decide (defaults to battle.max_rounds)
        #[arg(long)]
        rounds: Option<u32>,

        /// Result label recorded when the battle ends
        #[arg(long, default_value = "unknown")]
        result: String,
    },
    /// Print a stored entry, or list entries when no name is given
    Show { name: Option<String> },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("starrail_planner=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }

    let store: Arc<dyn MemoryStore> = Arc::new(FileMemoryStore::new(&config.storage.root)?);

    // Async runtime for advisor calls
    let rt = Runtime::new()?;

    match cli.command {
        Command::Plan { mode } => {
            let mut config = config;
            if let Some(mode) = mode {
                config.mode = mode;
            }
            rt.block_on(run_plan(config, store))
        }
        Command::Battle { rounds, result } => rt.block_on(run_battle(config, store, rounds, &result)),
        Command::Show { name } => show(store.as_ref(), name.as_deref()),
    }
}

fn load_config(path: &Path) -> Result<PlannerConfig> {
    if path.exists() {
        PlannerConfig::load(path)
    } else {
        tracing::warn!("{} not found - using default configuration", path.display());
        Ok(PlannerConfig::default())
    }
}

fn build_advisor(config: &PlannerConfig) -> Arc<dyn Advisor> {
    if !config.ai.enabled {
        return Arc::new(DisabledAdvisor);
    }
    match LlmClient::from_config(&config.ai) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!("{} - running without an advisor", e);
            Arc::new(DisabledAdvisor)
        }
    }
}

async fn run_plan(config: PlannerConfig, store: Arc<dyn MemoryStore>) -> Result<()> {
    let advisor = build_advisor(&config);
    let session = PlanningSession::new(config, store).with_advisor(advisor);
    let report = session.plan().await;
    session.persist(&report)?;

    println!("\n=== {} ===", report.mode);
    for warning in &report.warnings {
        println!("! {}", warning);
    }
    println!();
    for (i, plan) in report.plans.iter().enumerate() {
        let marker = if i == report.selected { "*" } else { " " };
        println!("{} [{}] {}", marker, i, plan.render());
    }
    if let Some(advisory) = &report.advisory {
        println!("--- Advisor strategy ---\n{}", advisory.text);
    }
    Ok(())
}

async fn selected_plan(config: &PlannerConfig, store: Arc<dyn MemoryStore>) -> Option<StrategyPlan> {
    match load_record::<StrategyPlan>(store.as_ref(), keys::SELECTED_PLAN) {
        Ok(Some(plan)) => return Some(plan),
        Ok(None) => {}
        Err(e) => tracing::warn!("Stored plan unreadable: {}", e),
    }
    tracing::info!("No stored plan - planning now");
    let session = PlanningSession::new(config.clone(), store);
    let report = session.plan().await;
    if let Err(e) = session.persist(&report) {
        tracing::warn!("Failed to persist plans: {}", e);
    }
    report.selected_plan().cloned()
}

async fn run_battle(
    config: PlannerConfig,
    store: Arc<dyn MemoryStore>,
    rounds: Option<u32>,
    result: &str,
) -> Result<()> {
    let plan = selected_plan(&config, store.clone()).await;
    let mut decision_loop = DecisionLoop::new(build_advisor(&config), store)
        .with_timeout(config.battle.decision_timeout());
    decision_loop.replace_plan(plan)?;

    decision_loop.start_battle()?;
    for _ in 0..rounds.unwrap_or(config.battle.max_rounds) {
        let action = decision_loop.decide().await?;
        let round = decision_loop.state().map(|s| s.round()).unwrap_or(0);
        match action.key_hint() {
            Some(key) => println!("Round {:>2}: {} [press {}]", round, action, key),
            None => println!("Round {:>2}: {}", round, action),
        }
    }

    if let Some(key) = decision_loop.end_battle(result) {
        println!("Saved {}", key);
    }
    let tally = decision_loop.tally();
    println!(
        "Battles: {}  Victories: {}  Win rate: {:.1}%",
        tally.battles,
        tally.victories,
        tally.win_rate() * 100.0
    );
    Ok(())
}

fn show(store: &dyn MemoryStore, name: Option<&str>) -> Result<()> {
    let Some(name) = name else {
        for entry in store.list()? {
            println!("{}", entry);
        }
        return Ok(());
    };
    match store.load(name)? {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("No entry named '{}'", name),
    }
    Ok(())
}
