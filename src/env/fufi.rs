//! FUFI cart-pole environment
//!
//! A pole is attached by an un-actuated hinge to a cart moving along a 4.8 m
//! track. The cart is pushed with a force chosen from an evenly spaced set
//! between `-max_force` and `+max_force`.
//!
//! # Layout
//!
//! - [`config`]: physical constants and modes
//! - [`action`]: discrete action index to force
//! - [`dynamics`]: equations of motion and integrators
//! - [`lifecycle`]: termination, reward and late-step warnings
//! - [`source`]: simulated and hardware state sources
//! - [`environment`]: [`FufiEnv`], which composes all of the above
//!
//! # Observation
//!
//! `[a_t, theta, theta_dot]`. Cart position and velocity are tracked as
//! auxiliary state and exposed through [`FufiEnv::state`].

pub mod action;
pub mod config;
pub mod dynamics;
pub mod environment;
pub mod lifecycle;
pub mod source;

pub use action::ActionCodec;
pub use config::{ExperimentMode, FufiConfig, Integrator, RenderMode};
pub use dynamics::SystemState;
pub use environment::FufiEnv;
pub use lifecycle::{EpisodeLifecycle, EpisodePhase};
pub use source::{HardwareReading, HardwareSource, SimulatedSource, StateSource};
