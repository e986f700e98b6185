//! Discrete action index to force mapping
//!
//! The motor pushes with one of `n = 2 * max_force / sensibility + 1` evenly
//! spaced forces. Index `0` is full force to the left, index `n - 1` full
//! force to the right and index `max_force / sensibility` no force at all.

use crate::{env::fufi::FufiConfig, error::FufiError};

/// Maps action indices onto signed forces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionCodec {
    max_force: f64,
    sensibility: f64,
    n: usize,
}

impl ActionCodec {
    /// Build a codec, failing when the action space is not symmetric
    pub fn new(max_force: f64, sensibility: f64) -> Result<Self, FufiError> {
        let config = FufiConfig { max_force, sensibility, ..FufiConfig::default() };
        Self::from_config(&config)
    }

    /// Build a codec from the force settings of a configuration
    pub fn from_config(config: &FufiConfig) -> Result<Self, FufiError> {
        let n = config.action_space_len()?;
        Ok(Self { max_force: config.max_force, sensibility: config.sensibility, n })
    }

    /// Number of discrete actions
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false, the space holds at least the zero-force action
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Index of the zero-force action
    pub fn neutral(&self) -> usize {
        self.n / 2
    }

    /// Force for an action index
    ///
    /// ```text
    /// force = -max_force + index * sensibility
    /// ```
    pub fn force(&self, action: i64) -> Result<f64, FufiError> {
        if action < 0 || action as u64 >= self.n as u64 {
            return Err(FufiError::InvalidAction { action, n: self.n });
        }
        Ok(-self.max_force + action as f64 * self.sensibility)
    }

    /// Nearest action index for a force, saturating at the motor limits
    pub fn index_for_force(&self, force: f64) -> usize {
        if force.is_nan() {
            return self.neutral();
        }
        let clamped = force.clamp(-self.max_force, self.max_force);
        let index = ((clamped + self.max_force) / self.sensibility).round() as usize;
        index.min(self.n - 1)
    }
}
