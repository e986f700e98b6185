//! # fufi-rl
//!
//! Cart-pole physics core for the FUFI balancing rig.
//!
//! The crate simulates a pole hinged on a cart that moves along a bounded
//! track, pushed by a force picked from an evenly spaced discrete set. It
//! owns the equations of motion, the action-to-force mapping, episode
//! termination and start-state randomization. Choosing actions is left to
//! the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use fufi_rl::prelude::*;
//!
//! let mut env = Registry::with_defaults().make("FUFI-v0").unwrap();
//! let mut obs = env.reset(ResetOptions::seeded(0)).unwrap();
//!
//! let neutral = env.inner().codec().neutral() as i64;
//! loop {
//!     let result = env.step(neutral).unwrap();
//!     obs = result.observation;
//!     if result.terminated || result.truncated {
//!         break;
//!     }
//! }
//! assert_eq!(obs.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment traits and implementations
pub mod env;

/// Error types
pub mod error;

/// Environment catalog
pub mod registry;

/// Software rendering of the scene
pub mod render;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::{
        env::{
            fufi::{FufiConfig, FufiEnv, Integrator, SystemState},
            time_limit::TimeLimit,
            Environment, ResetOptions, StepResult,
        },
        error::FufiError,
        registry::Registry,
    };
}

/// Current version of fufi-rl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
