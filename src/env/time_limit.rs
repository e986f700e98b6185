//! Episode length limit
//!
//! The FUFI core never truncates an episode on its own. [`TimeLimit`] counts
//! steps since the last reset and raises `truncated` once the count reaches
//! the configured maximum.

use anyhow::Result;

use crate::{
    env::{Environment, ResetOptions, SpaceInfo, StepResult},
    error::FufiError,
};

/// Default episode length of the FUFI rig
pub const DEFAULT_MAX_EPISODE_STEPS: usize = 1500;

/// Wrapper that truncates episodes after a fixed number of steps
#[derive(Debug)]
pub struct TimeLimit<E> {
    env: E,
    max_episode_steps: usize,
    elapsed_steps: Option<usize>,
}

impl<E> TimeLimit<E> {
    /// Wrap `env`, truncating after `max_episode_steps` steps
    pub fn new(env: E, max_episode_steps: usize) -> Self {
        Self { env, max_episode_steps, elapsed_steps: None }
    }

    /// Steps taken since the last reset, `None` before the first one
    pub fn elapsed_steps(&self) -> Option<usize> {
        self.elapsed_steps
    }

    /// Configured episode length
    pub fn max_episode_steps(&self) -> usize {
        self.max_episode_steps
    }

    /// Wrapped environment
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Wrapped environment, mutably
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Unwrap
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: Environment> Environment for TimeLimit<E> {
    type Observation = E::Observation;
    type Action = E::Action;

    fn reset(&mut self, options: ResetOptions) -> Result<Self::Observation> {
        let observation = self.env.reset(options)?;
        self.elapsed_steps = Some(0);
        Ok(observation)
    }

    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>> {
        let elapsed = self.elapsed_steps.ok_or(FufiError::ResetRequired)?;
        let mut result = self.env.step(action)?;

        let elapsed = elapsed + 1;
        self.elapsed_steps = Some(elapsed);
        if elapsed >= self.max_episode_steps {
            result.truncated = true;
        }
        result.info.elapsed_steps = Some(elapsed);
        Ok(result)
    }

    fn observation_space(&self) -> SpaceInfo {
        self.env.observation_space()
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }
}
