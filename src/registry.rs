//! Environment registry
//!
//! Advertises environments under `Name-vN` ids together with the step limit
//! a harness should enforce, and builds them already wrapped in a
//! [`TimeLimit`].
//!
//! ```rust
//! use fufi_rl::{env::{Environment, ResetOptions}, registry::Registry};
//!
//! let registry = Registry::with_defaults();
//! let mut env = registry.make("FUFI-v0").unwrap();
//! assert_eq!(env.max_episode_steps(), 1500);
//! env.reset(ResetOptions::seeded(0)).unwrap();
//! ```

use std::collections::BTreeMap;

use anyhow::Result;

use crate::{
    env::{
        fufi::{FufiConfig, FufiEnv},
        time_limit::TimeLimit,
    },
    error::FufiError,
};

/// Id of the default FUFI environment
pub const FUFI_V0: &str = "FUFI-v0";

/// A registered environment
#[derive(Debug, Clone, PartialEq)]
pub struct EnvSpec {
    /// `Name-vN` identifier
    pub id: String,
    /// Episode length enforced by the time-limit wrapper
    pub max_episode_steps: usize,
    /// Constants the environment is built with
    pub config: FufiConfig,
}

impl EnvSpec {
    /// Spec whose step limit comes from `config.max_episode_steps`
    pub fn new(id: impl Into<String>, config: FufiConfig) -> Self {
        Self { id: id.into(), max_episode_steps: config.max_episode_steps, config }
    }

    /// Override the step limit
    pub fn max_episode_steps(mut self, steps: usize) -> Self {
        self.max_episode_steps = steps;
        self
    }

    /// Name part of the id
    pub fn name(&self) -> Result<&str, FufiError> {
        parse_id(&self.id).map(|(name, _)| name)
    }

    /// Version part of the id
    pub fn version(&self) -> Result<u32, FufiError> {
        parse_id(&self.id).map(|(_, version)| version)
    }
}

/// Split `Name-vN` into its name and version
fn parse_id(id: &str) -> Result<(&str, u32), FufiError> {
    let malformed =
        || FufiError::config(format!("malformed environment id '{id}', expected Name-vN"));
    let (name, version) = id.rsplit_once("-v").ok_or_else(malformed)?;
    if name.is_empty() || version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let version = version.parse().map_err(|_| malformed())?;
    Ok((name, version))
}

/// Catalog of environment specs keyed by id
#[derive(Debug, Clone, Default)]
pub struct Registry {
    specs: BTreeMap<String, EnvSpec>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `FUFI-v0` with the rig's default constants
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.specs.insert(FUFI_V0.to_string(), EnvSpec::new(FUFI_V0, FufiConfig::default()));
        registry
    }

    /// Add a spec, rejecting malformed or duplicate ids and invalid configs
    pub fn register(&mut self, spec: EnvSpec) -> Result<(), FufiError> {
        parse_id(&spec.id)?;
        if self.specs.contains_key(&spec.id) {
            return Err(FufiError::config(format!(
                "environment id '{}' is already registered",
                spec.id
            )));
        }
        if spec.max_episode_steps == 0 {
            return Err(FufiError::config("max_episode_steps must be positive"));
        }
        spec.config.validate()?;

        tracing::info!(
            id = %spec.id,
            max_episode_steps = spec.max_episode_steps,
            "registered environment"
        );
        self.specs.insert(spec.id.clone(), spec);
        Ok(())
    }

    /// Look up a spec
    pub fn spec(&self, id: &str) -> Option<&EnvSpec> {
        self.specs.get(id)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// Build the environment registered under `id`
    pub fn make(&self, id: &str) -> Result<TimeLimit<FufiEnv>> {
        let spec = self.spec(id).ok_or_else(|| FufiError::UnknownEnv(id.to_string()))?;
        let env = FufiEnv::new(spec.config.clone())?;
        Ok(TimeLimit::new(env, spec.max_episode_steps))
    }
}
