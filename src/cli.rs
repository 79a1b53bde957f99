use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use task_rollup::fields::OrphanPolicy;

/// Task tree and time-variance reporting over a JSON snapshot.
/// Storage defaults to ./rollup.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "rollup", version, about = "Hierarchical task time rollup and variance reports")]
pub struct Cli {
    /// Path to the JSON snapshot file.
    #[arg(long, global = true, default_value = "rollup.json")]
    pub db: PathBuf,

    /// Maximum task nesting depth (overrides ROLLUP_MAX_TASK_DEPTH).
    #[arg(long, global = true)]
    pub max_depth: Option<u32>,

    /// What to do with tasks whose parent is missing (overrides ROLLUP_ORPHAN_POLICY).
    #[arg(long, global = true, value_enum)]
    pub orphans: Option<OrphanPolicy>,

    #[command(subcommand)]
    pub command: Commands,
}
