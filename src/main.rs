//! # rollup
//!
//! Command-line front end for the `task_rollup` engine. It reads a JSON snapshot
//! of projects, tasks and time-log entries, and turns it into:
//!
//! - an indented task tree with rolled-up estimated and actual hours, variance,
//!   budget state and due-date delay (`rollup report`)
//! - the same tree as CSV rows in pre-order (`rollup export`)
//! - guarded parent changes that refuse cycles and over-deep trees (`rollup reparent`)
//! - a structural audit of stored depths and parent chains (`rollup check`)
//!
//! ```bash
//! rollup --db team.json report --today 2024-05-01
//! rollup --db team.json export -o variance.csv --project 3
//! rollup --db team.json reparent "Email validation" --parent 12
//! ```
//!
//! `ROLLUP_MAX_TASK_DEPTH` and `ROLLUP_ORPHAN_POLICY` set engine defaults;
//! `--max-depth` and `--orphans` override them. `RUST_LOG` controls logging.

use clap::Parser;

mod cli;
mod cmd;

use cli::Cli;
use cmd::*;
use task_rollup::config::EngineConfig;
use task_rollup::db::Snapshot;
use task_rollup::error::Result;
use task_rollup::logging::init_logging;

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let load = || -> Result<(EngineConfig, Snapshot)> {
        let config = EngineConfig::from_env()?
            .with_max_task_depth(cli.max_depth)
            .with_orphan_policy(cli.orphans);
        Ok((config, Snapshot::load(&cli.db)?))
    };

    match &cli.command {
        Commands::Report { projects, today } => {
            let (config, snapshot) = load()?;
            cmd_report(&snapshot, &config, projects.clone(), today.clone())
        }
        Commands::Export { output, projects } => {
            let (config, snapshot) = load()?;
            cmd_export(&snapshot, &config, output.clone(), projects.clone())
        }
        Commands::Reparent { task, parent, clear } => {
            let (config, mut snapshot) = load()?;
            cmd_reparent(&mut snapshot, &cli.db, &config, task.clone(), parent.clone(), *clear)
        }
        Commands::Check => {
            let (config, snapshot) = load()?;
            cmd_check(&snapshot, &config);
            Ok(())
        }
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            Ok(())
        }
    }
}
