//! FUFI configuration and physical constants
//!
//! This module defines the constants of the rig and the modes the core runs
//! in, and provides validation, JSON persistence and builder methods.

use std::{fmt, path::Path, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FufiError;

/// Integration scheme used by the dynamics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Integrator {
    /// Positions advance with the old velocity, then velocities
    #[default]
    Euler,
    /// Velocities advance first, positions use the new velocity
    SemiImplicitEuler,
}

impl FromStr for Integrator {
    type Err = FufiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "euler" => Ok(Self::Euler),
            "semi-implicit-euler" => Ok(Self::SemiImplicitEuler),
            other => Err(FufiError::config(format!(
                "unknown integrator '{other}', expected 'euler' or 'semi-implicit-euler'"
            ))),
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euler => f.write_str("euler"),
            Self::SemiImplicitEuler => f.write_str("semi-implicit-euler"),
        }
    }
}

/// Where the state of the system comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentMode {
    /// States computed from the equations of motion
    #[default]
    Simulated,
    /// States measured on the physical rig
    Hardware,
}

impl FromStr for ExperimentMode {
    type Err = FufiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "simulated" => Ok(Self::Simulated),
            "r" | "hardware" => Ok(Self::Hardware),
            other => Err(FufiError::config(format!(
                "invalid mode '{other}': use 's' for simulation or 'r' for the real rig"
            ))),
        }
    }
}

/// How frames are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// A frame is drawn after every reset and step and kept for a viewer
    Human,
    /// Frames are drawn only on explicit `render` calls
    RgbArray,
}

impl FromStr for RenderMode {
    type Err = FufiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "human" => Ok(Self::Human),
            "rgb_array" => Ok(Self::RgbArray),
            other => Err(FufiError::config(format!(
                "unknown render mode '{other}', expected 'human' or 'rgb_array'"
            ))),
        }
    }
}

/// FUFI configuration
///
/// Defaults describe the rig: a 1 kg cart, a 0.1 kg pole of half-length
/// 0.5 m and a motor that pushes with up to 10 N in 0.1 N increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FufiConfig {
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,

    /// Cart mass (kg)
    pub mass_cart: f64,

    /// Pole mass (kg)
    pub mass_pole: f64,

    /// Half the pole's length (m)
    pub pole_half_length: f64,

    /// Largest force the motor can produce (N)
    pub max_force: f64,

    /// Smallest force increment the motor can produce (N)
    pub sensibility: f64,

    /// Seconds between state updates
    pub tau: f64,

    /// Integration scheme
    pub integrator: Integrator,

    /// Pole angle beyond which the episode terminates (rad)
    pub theta_threshold: f64,

    /// Cart position beyond which the episode terminates (m)
    pub x_threshold: f64,

    /// Simulated or real rig
    pub mode: ExperimentMode,

    /// Measurement file written by the rig's microcontroller
    pub sensor_file: Option<PathBuf>,

    /// Frame production, `None` disables rendering
    pub render_mode: Option<RenderMode>,

    /// Episode length enforced by the time-limit wrapper
    pub max_episode_steps: usize,
}

impl Default for FufiConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            mass_cart: 1.0,
            mass_pole: 0.1,
            pole_half_length: 0.5,
            max_force: 10.0,
            sensibility: 0.1,
            tau: 0.02,
            integrator: Integrator::Euler,
            theta_threshold: 2.0 * 2.0 * std::f64::consts::PI / 360.0,
            x_threshold: 2.4,
            mode: ExperimentMode::Simulated,
            sensor_file: None,
            render_mode: None,
            max_episode_steps: 1500,
        }
    }
}

impl FufiConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Cart plus pole mass
    pub fn total_mass(&self) -> f64 {
        self.mass_pole + self.mass_cart
    }

    /// Pole mass times half-length
    pub fn pole_mass_length(&self) -> f64 {
        self.mass_pole * self.pole_half_length
    }

    /// Number of discrete actions, `2 * max_force / sensibility + 1`
    ///
    /// Fails when the quotient is not a whole number, since the action space
    /// would then not be symmetric around zero force.
    pub fn action_space_len(&self) -> Result<usize, FufiError> {
        if !(self.max_force > 0.0 && self.sensibility > 0.0) {
            return Err(FufiError::config("max_force and sensibility must be positive"));
        }
        let len = 2.0 * self.max_force / self.sensibility + 1.0;
        if !len.is_finite() || (len - len.round()).abs() > 1e-9 * len.max(1.0) {
            return Err(FufiError::config(format!(
                "action space length {len} is not an integer; choose max_force / sensibility \
                 as a whole number"
            )));
        }
        Ok(len.round() as usize)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), FufiError> {
        if !self.gravity.is_finite() {
            return Err(FufiError::config("gravity must be finite"));
        }
        let positive = [
            ("mass_cart", self.mass_cart),
            ("mass_pole", self.mass_pole),
            ("pole_half_length", self.pole_half_length),
            ("tau", self.tau),
            ("theta_threshold", self.theta_threshold),
            ("x_threshold", self.x_threshold),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(FufiError::config(format!("{name} must be positive and finite")));
            }
        }
        if self.max_episode_steps == 0 {
            return Err(FufiError::config("max_episode_steps must be positive"));
        }
        self.action_space_len()?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FufiError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, FufiError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), FufiError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Set gravity
    pub fn gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set cart and pole masses
    pub fn masses(mut self, cart: f64, pole: f64) -> Self {
        self.mass_cart = cart;
        self.mass_pole = pole;
        self
    }

    /// Set the pole half-length
    pub fn pole_half_length(mut self, half_length: f64) -> Self {
        self.pole_half_length = half_length;
        self
    }

    /// Set the force range and increment
    pub fn force(mut self, max_force: f64, sensibility: f64) -> Self {
        self.max_force = max_force;
        self.sensibility = sensibility;
        self
    }

    /// Set the integration timestep
    pub fn tau(mut self, tau: f64) -> Self {
        self.tau = tau;
        self
    }

    /// Set the integration scheme
    pub fn integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Set termination thresholds
    pub fn thresholds(mut self, theta: f64, x: f64) -> Self {
        self.theta_threshold = theta;
        self.x_threshold = x;
        self
    }

    /// Set the experiment mode
    pub fn mode(mut self, mode: ExperimentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the rig's measurement file
    pub fn sensor_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sensor_file = Some(path.into());
        self
    }

    /// Set the render mode
    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = Some(mode);
        self
    }

    /// Set the episode length for the time-limit wrapper
    pub fn max_episode_steps(mut self, steps: usize) -> Self {
        self.max_episode_steps = steps;
        self
    }
}
