//! Environment traits and implementations
//!
//! This module defines the environment interface shared by the FUFI core and
//! the wrappers that drive it (time limits, parallel pools).

use anyhow::Result;

use crate::error::FufiError;

/// Core trait for episodic environments
pub trait Environment {
    /// Observation type
    type Observation;

    /// Action type
    type Action;

    /// Start a new episode and return the initial observation
    fn reset(&mut self, options: ResetOptions) -> Result<Self::Observation>;

    /// Advance the environment by one step
    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>>;

    /// Get the observation space description
    fn observation_space(&self) -> SpaceInfo;

    /// Get the action space description
    fn action_space(&self) -> SpaceInfo;
}

/// Optional arguments to [`Environment::reset`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResetOptions {
    /// Reseed the environment's generator before sampling the start state
    pub seed: Option<u64>,

    /// Override the start-state sampling interval
    pub bounds: Option<ResetBounds>,
}

impl ResetOptions {
    /// Options carrying only a seed
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), bounds: None }
    }

    /// Set the sampling bounds
    pub fn with_bounds(mut self, low: f64, high: f64) -> Self {
        self.bounds = Some(ResetBounds { low, high });
        self
    }
}

/// Closed interval every start-state component is sampled from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetBounds {
    /// Lower bound
    pub low: f64,

    /// Upper bound
    pub high: f64,
}

impl Default for ResetBounds {
    fn default() -> Self {
        Self { low: -0.03, high: 0.03 }
    }
}

impl ResetBounds {
    /// Both bounds finite and `low <= high`
    pub fn validate(&self) -> Result<(), FufiError> {
        let Self { low, high } = *self;
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(FufiError::config(format!(
                "reset bounds must be finite with low <= high, got ({low}, {high})"
            )));
        }
        Ok(())
    }
}

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult<O> {
    /// Next observation
    pub observation: O,

    /// Reward received
    pub reward: f32,

    /// Whether the episode terminated
    pub terminated: bool,

    /// Whether the episode was truncated
    pub truncated: bool,

    /// Additional info
    pub info: StepInfo,
}

/// Space information for observations and actions
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous box with per-component bounds
    Box {
        /// Lower bounds
        low: Vec<f32>,
        /// Upper bounds
        high: Vec<f32>,
    },
}

/// Additional step information
///
/// The core reports nothing here; wrappers fill the fields they own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Steps taken since reset, set by [`time_limit::TimeLimit`]
    pub elapsed_steps: Option<usize>,
}

impl StepInfo {
    /// True when no field has been populated
    pub fn is_empty(&self) -> bool {
        self.elapsed_steps.is_none()
    }
}

pub mod fufi;
pub mod pool;
pub mod time_limit;
