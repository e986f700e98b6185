//! Pool of independent environments stepped in parallel
//!
//! Each environment is owned by exactly one rayon worker during a call, so
//! the single-threaded contract of the core still holds per episode.
//!
//! # Example
//!
//! ```rust
//! use fufi_rl::env::{fufi::{FufiConfig, FufiEnv}, pool::EnvPool};
//!
//! // Create pool with 4 parallel environments
//! let mut pool = EnvPool::new(|| FufiEnv::new(FufiConfig::default()), 4).unwrap();
//!
//! // Reset all environments, env i is seeded with 7 + i
//! let observations = pool.reset(Some(7)).unwrap();
//! assert_eq!(observations.len(), 4);
//!
//! // Step all environments with the zero-force action
//! let results = pool.step(&[100, 100, 100, 100]).unwrap();
//! assert_eq!(results.len(), 4);
//! ```

use anyhow::{bail, Result};
use rayon::prelude::*;

use crate::env::{Environment, ResetOptions, SpaceInfo, StepResult};

/// A pool of environments for parallel execution
pub struct EnvPool<E: Environment> {
    /// Vector of environment instances
    envs: Vec<E>,
}

/// Result of stepping an environment pool
///
/// Contains observations, rewards, and done flags for all environments.
#[derive(Debug, Clone)]
pub struct PoolStepResult<O> {
    /// Observations for each environment
    pub observations: Vec<O>,

    /// Rewards for each environment
    pub rewards: Vec<f32>,

    /// Termination flags for each environment
    pub terminated: Vec<bool>,

    /// Truncation flags for each environment
    pub truncated: Vec<bool>,
}

impl<E> EnvPool<E>
where
    E: Environment + Send,
    E::Observation: Send,
    E::Action: Copy + Send + Sync,
{
    /// Create a pool of `num_envs` environments built by `env_fn`
    pub fn new<F>(env_fn: F, num_envs: usize) -> Result<Self>
    where
        F: Fn() -> Result<E>,
    {
        if num_envs == 0 {
            bail!("an environment pool needs at least one environment");
        }
        let envs = (0..num_envs).map(|_| env_fn()).collect::<Result<Vec<_>>>()?;
        Ok(Self { envs })
    }

    /// Reset all environments in parallel
    ///
    /// With a seed, environment `i` is reseeded with `seed + i`.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<Vec<E::Observation>> {
        self.envs
            .par_iter_mut()
            .enumerate()
            .map(|(i, env)| {
                let seed = seed.map(|s| s.wrapping_add(i as u64));
                env.reset(ResetOptions { seed, bounds: None })
            })
            .collect()
    }

    /// Step all environments in parallel, one action per environment
    pub fn step(&mut self, actions: &[E::Action]) -> Result<Vec<StepResult<E::Observation>>> {
        if actions.len() != self.envs.len() {
            bail!(
                "number of actions ({}) must match number of environments ({})",
                actions.len(),
                self.envs.len()
            );
        }

        self.envs
            .par_iter_mut()
            .zip(actions.par_iter())
            .map(|(env, &action)| env.step(action))
            .collect()
    }

    /// Step all environments and unpack the results into parallel vectors
    pub fn step_structured(
        &mut self,
        actions: &[E::Action],
    ) -> Result<PoolStepResult<E::Observation>> {
        let results = self.step(actions)?;
        let n = results.len();

        let mut observations = Vec::with_capacity(n);
        let mut rewards = Vec::with_capacity(n);
        let mut terminated = Vec::with_capacity(n);
        let mut truncated = Vec::with_capacity(n);

        for result in results {
            observations.push(result.observation);
            rewards.push(result.reward);
            terminated.push(result.terminated);
            truncated.push(result.truncated);
        }

        Ok(PoolStepResult { observations, rewards, terminated, truncated })
    }

    /// Reset a single environment
    pub fn reset_env(&mut self, env_id: usize, options: ResetOptions) -> Result<E::Observation> {
        match self.envs.get_mut(env_id) {
            Some(env) => env.reset(options),
            None => bail!("no environment with index {env_id} in a pool of {}", self.envs.len()),
        }
    }

    /// Get the number of environments in the pool
    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// Borrow one environment
    pub fn get(&self, env_id: usize) -> Option<&E> {
        self.envs.get(env_id)
    }

    /// Get observation space information from first environment
    pub fn observation_space(&self) -> SpaceInfo {
        self.envs[0].observation_space()
    }

    /// Get action space information from first environment
    pub fn action_space(&self) -> SpaceInfo {
        self.envs[0].action_space()
    }
}
