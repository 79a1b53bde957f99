//! Engine configuration.
//!
//! Defaults, then `ROLLUP_*` environment overrides, then whatever the caller
//! (usually CLI flags) applies on top.

use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::fields::OrphanPolicy;

/// Deepest level a task may sit at. Roots are depth 0.
pub const MAX_TASK_DEPTH: u32 = 3;

pub const ENV_MAX_TASK_DEPTH: &str = "ROLLUP_MAX_TASK_DEPTH";
pub const ENV_ORPHAN_POLICY: &str = "ROLLUP_ORPHAN_POLICY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_task_depth: u32,
    pub orphan_policy: OrphanPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { max_task_depth: MAX_TASK_DEPTH, orphan_policy: OrphanPolicy::default() }
    }
}

impl EngineConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset variables keep the default;
    /// set but unparseable ones are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = EngineConfig::default();
        if let Some(raw) = lookup(ENV_MAX_TASK_DEPTH) {
            cfg.max_task_depth = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_MAX_TASK_DEPTH} must be a non-negative integer, got '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup(ENV_ORPHAN_POLICY) {
            cfg.orphan_policy = OrphanPolicy::from_str(raw.trim(), true).map_err(|_| {
                Error::Config(format!("{ENV_ORPHAN_POLICY} must be 'promote' or 'exclude', got '{raw}'"))
            })?;
        }
        tracing::debug!(
            max_task_depth = cfg.max_task_depth,
            orphan_policy = ?cfg.orphan_policy,
            "engine configuration resolved"
        );
        Ok(cfg)
    }

    pub fn with_max_task_depth(mut self, depth: Option<u32>) -> Self {
        if let Some(d) = depth {
            self.max_task_depth = d;
        }
        self
    }

    pub fn with_orphan_policy(mut self, policy: Option<OrphanPolicy>) -> Self {
        if let Some(p) = policy {
            self.orphan_policy = p;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.max_task_depth, MAX_TASK_DEPTH);
        assert_eq!(cfg.orphan_policy, OrphanPolicy::Promote);
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = EngineConfig::from_lookup(lookup(&[
            (ENV_MAX_TASK_DEPTH, "5"),
            (ENV_ORPHAN_POLICY, "Exclude"),
        ]))
        .unwrap();
        assert_eq!(cfg.max_task_depth, 5);
        assert_eq!(cfg.orphan_policy, OrphanPolicy::Exclude);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            EngineConfig::from_lookup(lookup(&[(ENV_MAX_TASK_DEPTH, "-1")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_lookup(lookup(&[(ENV_ORPHAN_POLICY, "drop")])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn flag_overrides_win() {
        let cfg = EngineConfig::default()
            .with_max_task_depth(Some(1))
            .with_orphan_policy(None);
        assert_eq!(cfg.max_task_depth, 1);
        assert_eq!(cfg.orphan_policy, OrphanPolicy::Promote);
    }
}
