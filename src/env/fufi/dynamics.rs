//! Cart-pole equations of motion
//!
//! One call to [`step`] advances the system by `tau` seconds:
//!
//! ```text
//! temp      = (force + pole_mass_length * theta_dot² * sin(theta)) / total_mass
//! theta_acc = (g * sin(theta) / 2 - cos(theta) * temp) /
//!             (half_length * (4/3 - mass_pole * cos²(theta) / total_mass))
//! x_acc     = temp - pole_mass_length * theta_acc * cos(theta) / total_mass
//! a_t       = x_acc * cos(theta) + half_length * theta_acc - g * sin(theta)
//! ```
//!
//! `a_t` is reported in the observation but never feeds the next step.

use crate::env::fufi::{FufiConfig, Integrator};

/// Full state of the cart-pole system
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemState {
    /// Horizontal acceleration term of the pole, derived each step
    pub pole_acceleration: f64,
    /// Pole angle from vertical (rad)
    pub theta: f64,
    /// Pole angular velocity (rad/s)
    pub theta_dot: f64,
    /// Cart position from track center (m)
    pub x: f64,
    /// Cart velocity (m/s)
    pub x_dot: f64,
}

impl SystemState {
    /// State at rest with the given pole angle and cart position
    pub fn at_rest(theta: f64, x: f64) -> Self {
        Self { theta, x, ..Self::default() }
    }

    /// Observation form `[a_t, theta, theta_dot]`
    pub fn observation(&self) -> Vec<f32> {
        vec![self.pole_acceleration as f32, self.theta as f32, self.theta_dot as f32]
    }

    /// Cart coordinates `(x, x_dot)`
    pub fn cart(&self) -> (f64, f64) {
        (self.x, self.x_dot)
    }

    /// True once the cart or the pole leaves the allowed region
    pub fn is_out_of_bounds(&self, theta_threshold: f64, x_threshold: f64) -> bool {
        self.x < -x_threshold
            || self.x > x_threshold
            || self.theta < -theta_threshold
            || self.theta > theta_threshold
    }
}

/// Accelerations produced by one evaluation of the equations of motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accelerations {
    /// Pole angular acceleration
    pub theta_acc: f64,
    /// Cart acceleration
    pub x_acc: f64,
    /// Derived pole acceleration reported as `a_t`
    pub pole_acceleration: f64,
}

/// Evaluate the equations of motion at `state` under `force`
pub fn accelerations(state: &SystemState, force: f64, config: &FufiConfig) -> Accelerations {
    let total_mass = config.total_mass();
    let pole_mass_length = config.pole_mass_length();
    let length = config.pole_half_length;

    let cos_theta = state.theta.cos();
    let sin_theta = state.theta.sin();

    let temp = (force + pole_mass_length * state.theta_dot * state.theta_dot * sin_theta)
        / total_mass;
    let theta_acc = (config.gravity * sin_theta / 2.0 - cos_theta * temp)
        / (length * (4.0 / 3.0 - config.mass_pole * cos_theta * cos_theta / total_mass));
    let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;
    let pole_acceleration = x_acc * cos_theta + length * theta_acc - config.gravity * sin_theta;

    Accelerations { theta_acc, x_acc, pole_acceleration }
}

/// Advance `state` by one timestep under `force`
///
/// Pure and deterministic; non-finite inputs propagate into the result.
pub fn step(state: &SystemState, force: f64, config: &FufiConfig) -> SystemState {
    let acc = accelerations(state, force, config);
    let tau = config.tau;
    let SystemState { mut x, mut x_dot, mut theta, mut theta_dot, .. } = *state;

    match config.integrator {
        Integrator::Euler => {
            x += tau * x_dot;
            x_dot += tau * acc.x_acc;
            theta += tau * theta_dot;
            theta_dot += tau * acc.theta_acc;
        }
        Integrator::SemiImplicitEuler => {
            x_dot += tau * acc.x_acc;
            x += tau * x_dot;
            theta_dot += tau * acc.theta_acc;
            theta += tau * theta_dot;
        }
    }

    SystemState { pole_acceleration: acc.pole_acceleration, theta, theta_dot, x, x_dot }
}
