//! Sources of system state
//!
//! [`FufiEnv`](super::FufiEnv) never branches on the experiment mode; it asks
//! a [`StateSource`] for the start state and for the state after a force is
//! applied. The simulated source integrates the equations of motion. The
//! hardware source marks the seam where readings from the physical rig will
//! plug in.

use std::path::{Path, PathBuf};

use rand::{rngs::StdRng, Rng};

use crate::{
    env::{
        fufi::{dynamics, FufiConfig, SystemState},
        ResetBounds,
    },
    error::FufiError,
};

/// Provider of the cart-pole state for one environment
pub trait StateSource: std::fmt::Debug + Send {
    /// Produce the start state of a new episode
    fn reset(&mut self, rng: &mut StdRng, bounds: ResetBounds) -> Result<SystemState, FufiError>;

    /// Apply `force` for one timestep and return the resulting state
    fn advance(&mut self, force: f64, config: &FufiConfig) -> Result<SystemState, FufiError>;

    /// Current state, `None` before the first reset
    fn state(&self) -> Option<SystemState>;

    /// Place the system in an explicit state
    fn set_state(&mut self, state: SystemState) -> Result<(), FufiError>;
}

/// State computed from the equations of motion
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    state: Option<SystemState>,
}

impl SimulatedSource {
    /// Source with no state until the first reset
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateSource for SimulatedSource {
    fn reset(&mut self, rng: &mut StdRng, bounds: ResetBounds) -> Result<SystemState, FufiError> {
        bounds.validate()?;
        let ResetBounds { low, high } = bounds;
        let mut sample = || rng.gen_range(low..=high);
        let state = SystemState {
            pole_acceleration: sample(),
            theta: sample(),
            theta_dot: sample(),
            x: sample(),
            x_dot: sample(),
        };
        self.state = Some(state);
        Ok(state)
    }

    fn advance(&mut self, force: f64, config: &FufiConfig) -> Result<SystemState, FufiError> {
        let current = self.state.as_ref().ok_or(FufiError::ResetRequired)?;
        let next = dynamics::step(current, force, config);
        self.state = Some(next);
        Ok(next)
    }

    fn state(&self) -> Option<SystemState> {
        self.state
    }

    fn set_state(&mut self, state: SystemState) -> Result<(), FufiError> {
        self.state = Some(state);
        Ok(())
    }
}

/// One measurement from the physical rig
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardwareReading {
    /// `(a_t, theta, theta_dot)`
    pub pole: (f64, f64, f64),
    /// `(x, x_dot)`
    pub cart: (f64, f64),
}

impl From<HardwareReading> for SystemState {
    fn from(reading: HardwareReading) -> Self {
        let (pole_acceleration, theta, theta_dot) = reading.pole;
        let (x, x_dot) = reading.cart;
        Self { pole_acceleration, theta, theta_dot, x, x_dot }
    }
}

/// State measured on the physical rig
///
/// Not wired up yet: every operation fails with
/// [`FufiError::NotImplemented`].
#[derive(Debug, Clone, Default)]
pub struct HardwareSource {
    sensor_file: Option<PathBuf>,
}

impl HardwareSource {
    /// Source reading from the rig's measurement file
    pub fn new(sensor_file: Option<PathBuf>) -> Self {
        Self { sensor_file }
    }

    /// Measurement file this source would read
    pub fn sensor_file(&self) -> Option<&Path> {
        self.sensor_file.as_deref()
    }

    /// Take one reading from the rig
    pub fn read(&self) -> Result<HardwareReading, FufiError> {
        Err(FufiError::NotImplemented("hardware state source"))
    }
}

impl StateSource for HardwareSource {
    fn reset(&mut self, _rng: &mut StdRng, _bounds: ResetBounds) -> Result<SystemState, FufiError> {
        self.read().map(SystemState::from)
    }

    fn advance(&mut self, _force: f64, _config: &FufiConfig) -> Result<SystemState, FufiError> {
        self.read().map(SystemState::from)
    }

    fn state(&self) -> Option<SystemState> {
        None
    }

    fn set_state(&mut self, _state: SystemState) -> Result<(), FufiError> {
        Err(FufiError::NotImplemented("setting the state of the physical rig"))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_simulated_reset_within_bounds() {
        let mut source = SimulatedSource::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let s = source.reset(&mut rng, ResetBounds::default()).unwrap();
            for v in [s.pole_acceleration, s.theta, s.theta_dot, s.x, s.x_dot] {
                assert!((-0.03..=0.03).contains(&v), "{v} outside default bounds");
            }
        }
    }

    #[test]
    fn test_simulated_reset_degenerate_interval() {
        let mut source = SimulatedSource::new();
        let mut rng = StdRng::seed_from_u64(0);
        let s = source.reset(&mut rng, ResetBounds { low: 0.25, high: 0.25 }).unwrap();
        let expected =
            SystemState { pole_acceleration: 0.25, theta: 0.25, theta_dot: 0.25, x: 0.25, x_dot: 0.25 };
        assert_eq!(s, expected);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut source = SimulatedSource::new();
        let mut rng = StdRng::seed_from_u64(0);
        let err = source.reset(&mut rng, ResetBounds { low: 0.1, high: -0.1 });
        assert!(matches!(err, Err(FufiError::Config(_))));
        let err = source.reset(&mut rng, ResetBounds { low: f64::NAN, high: 0.1 });
        assert!(matches!(err, Err(FufiError::Config(_))));
        assert!(source.state().is_none());
    }

    #[test]
    fn test_advance_requires_state() {
        let mut source = SimulatedSource::new();
        let err = source.advance(0.0, &FufiConfig::default());
        assert!(matches!(err, Err(FufiError::ResetRequired)));
    }

    #[test]
    fn test_hardware_is_a_seam() {
        let mut source = HardwareSource::new(Some(PathBuf::from("fufi_measures.txt")));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(source.sensor_file(), Some(Path::new("fufi_measures.txt")));
        assert!(matches!(source.read(), Err(FufiError::NotImplemented(_))));
        assert!(matches!(
            source.reset(&mut rng, ResetBounds::default()),
            Err(FufiError::NotImplemented(_))
        ));
        assert!(matches!(
            source.advance(1.0, &FufiConfig::default()),
            Err(FufiError::NotImplemented(_))
        ));
        assert!(source.state().is_none());
    }

    #[test]
    fn test_reading_converts_to_state() {
        let reading = HardwareReading { pole: (0.1, 0.02, -0.3), cart: (1.2, 0.4) };
        let state = SystemState::from(reading);
        assert_eq!(state.pole_acceleration, 0.1);
        assert_eq!(state.theta, 0.02);
        assert_eq!(state.theta_dot, -0.3);
        assert_eq!(state.cart(), (1.2, 0.4));
    }
}
