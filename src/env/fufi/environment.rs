//! The FUFI environment
//!
//! [`FufiEnv`] owns the state source, the action codec, the episode
//! lifecycle and a seedable generator. Each call to `step` maps the action
//! to a force, advances the state, then evaluates termination and reward.

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    env::{
        fufi::{
            ActionCodec, EpisodeLifecycle, EpisodePhase, ExperimentMode, FufiConfig,
            HardwareSource, RenderMode, SimulatedSource, StateSource, SystemState,
        },
        Environment, ResetOptions, SpaceInfo, SpaceType, StepInfo, StepResult,
    },
    render::{CartPoleRenderer, Frame, RenderView},
};

/// Cart-pole environment for the FUFI rig
///
/// # Example
///
/// ```rust
/// use fufi_rl::env::{fufi::{FufiConfig, FufiEnv}, Environment, ResetOptions};
///
/// let mut env = FufiEnv::new(FufiConfig::default()).unwrap();
/// let obs = env.reset(ResetOptions::seeded(42)).unwrap();
/// assert_eq!(obs.len(), 3);
///
/// let neutral = env.codec().neutral() as i64;
/// let result = env.step(neutral).unwrap();
/// assert_eq!(result.reward, 1.0);
/// ```
#[derive(Debug)]
pub struct FufiEnv {
    config: FufiConfig,
    codec: ActionCodec,
    source: Box<dyn StateSource>,
    lifecycle: EpisodeLifecycle,
    rng: StdRng,
    renderer: CartPoleRenderer,
    last_frame: Option<Frame>,
    misuse_warnings: u32,
}

impl FufiEnv {
    /// Create an environment whose state source follows `config.mode`
    pub fn new(config: FufiConfig) -> Result<Self> {
        let source: Box<dyn StateSource> = match config.mode {
            ExperimentMode::Simulated => Box::new(SimulatedSource::new()),
            ExperimentMode::Hardware => Box::new(HardwareSource::new(config.sensor_file.clone())),
        };
        Self::with_source(config, source)
    }

    /// Create an environment around an explicit state source
    pub fn with_source(config: FufiConfig, source: Box<dyn StateSource>) -> Result<Self> {
        config.validate()?;
        let codec = ActionCodec::from_config(&config)?;
        Ok(Self {
            config,
            codec,
            source,
            lifecycle: EpisodeLifecycle::new(),
            rng: StdRng::from_entropy(),
            renderer: CartPoleRenderer::new(),
            last_frame: None,
            misuse_warnings: 0,
        })
    }

    /// Configuration the environment was built with
    pub fn config(&self) -> &FufiConfig {
        &self.config
    }

    /// Action index to force mapping
    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    /// Full state, `None` before the first reset
    pub fn state(&self) -> Option<SystemState> {
        self.source.state()
    }

    /// Cart position (m)
    pub fn cart_position(&self) -> Option<f64> {
        self.state().map(|s| s.x)
    }

    /// Pole angle (rad)
    pub fn pole_angle(&self) -> Option<f64> {
        self.state().map(|s| s.theta)
    }

    /// Place the system in an explicit state
    ///
    /// The episode lifecycle is left untouched.
    pub fn set_state(&mut self, state: SystemState) -> Result<()> {
        self.source.set_state(state)?;
        Ok(())
    }

    /// Steps taken after termination, `None` while the episode is live
    pub fn steps_beyond_terminated(&self) -> Option<u32> {
        self.lifecycle.steps_beyond_terminated()
    }

    /// Current episode phase
    pub fn phase(&self) -> EpisodePhase {
        self.lifecycle.phase()
    }

    /// Number of step-after-termination warnings emitted so far
    pub fn misuse_warnings(&self) -> u32 {
        self.misuse_warnings
    }

    /// Snapshot for the renderer
    pub fn render_view(&self) -> Option<RenderView> {
        self.state().map(|s| RenderView {
            cart_position: s.x,
            pole_angle: s.theta,
            x_threshold: self.config.x_threshold,
            pole_half_length: self.config.pole_half_length,
        })
    }

    /// Draw the current scene
    ///
    /// Returns `None` when no render mode is configured or no episode has
    /// started.
    pub fn render(&self) -> Option<Frame> {
        if self.config.render_mode.is_none() {
            tracing::warn!(
                "render() called without a render mode; set one in the config, e.g. \
                 FufiConfig::default().render_mode(RenderMode::RgbArray)"
            );
            return None;
        }
        self.render_view().map(|view| self.renderer.draw(&view))
    }

    /// Frame produced by the last reset or step in human mode
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Release rendering resources
    pub fn close(&mut self) {
        self.last_frame = None;
    }

    fn refresh_frame(&mut self) {
        if self.config.render_mode == Some(RenderMode::Human) {
            self.last_frame = self.render();
        }
    }
}

impl Environment for FufiEnv {
    type Observation = Vec<f32>;
    type Action = i64;

    fn reset(&mut self, options: ResetOptions) -> Result<Self::Observation> {
        let bounds = options.bounds.unwrap_or_default();
        bounds.validate()?;

        // The generator is only replaced once the source accepts the reset
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => self.rng.clone(),
        };
        let state = self.source.reset(&mut rng, bounds)?;
        self.rng = rng;
        self.lifecycle.reset();

        tracing::debug!(seed = ?options.seed, low = bounds.low, high = bounds.high, "reset");
        self.refresh_frame();

        Ok(state.observation())
    }

    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>> {
        let force = self.codec.force(action)?;
        let state = self.source.advance(force, &self.config)?;

        let terminated = state.is_out_of_bounds(self.config.theta_threshold, self.config.x_threshold);
        let outcome = self.lifecycle.record(terminated);
        if outcome.misuse_warning {
            self.misuse_warnings += 1;
        }

        tracing::trace!(action, force, x = state.x, theta = state.theta, terminated, "step");
        self.refresh_frame();

        Ok(StepResult {
            observation: state.observation(),
            reward: outcome.reward,
            terminated,
            truncated: false,
            info: StepInfo::default(),
        })
    }

    fn observation_space(&self) -> SpaceInfo {
        let high = vec![f32::MAX, (self.config.theta_threshold * 2.0) as f32, f32::MAX];
        let low = high.iter().map(|h| -h).collect();
        SpaceInfo { shape: vec![3], dtype: SpaceType::Box { low, high } }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![], dtype: SpaceType::Discrete(self.codec.len()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{env::fufi::Integrator, error::FufiError};

    fn env() -> FufiEnv {
        FufiEnv::new(FufiConfig::default()).unwrap()
    }

    fn kind(err: &anyhow::Error) -> &FufiError {
        err.downcast_ref::<FufiError>().expect("error should be a FufiError")
    }

    #[test]
    fn test_fufi_reset() {
        let mut env = env();
        let obs = env.reset(ResetOptions::seeded(3)).unwrap();

        assert_eq!(obs.len(), 3, "Observation is [a_t, theta, theta_dot]");
        assert_eq!(env.phase(), EpisodePhase::Active);
        assert_eq!(env.steps_beyond_terminated(), None);

        let state = env.state().unwrap();
        for v in [state.pole_acceleration, state.theta, state.theta_dot, state.x, state.x_dot] {
            assert!((-0.03..=0.03).contains(&v), "start component {v} outside [-0.03, 0.03]");
        }
        assert_eq!(obs, state.observation());
    }

    #[test]
    fn test_seeded_reset_is_reproducible() {
        let mut a = env();
        let mut b = env();
        assert_eq!(
            a.reset(ResetOptions::seeded(11)).unwrap(),
            b.reset(ResetOptions::seeded(11)).unwrap()
        );
        assert_eq!(a.state(), b.state());

        let first = a.state();
        a.reset(ResetOptions::default()).unwrap();
        assert_ne!(a.state(), first, "unseeded reset continues the stream");
    }

    #[test]
    fn test_custom_bounds() {
        let mut env = env();
        env.reset(ResetOptions::seeded(5).with_bounds(0.1, 0.2)).unwrap();
        let s = env.state().unwrap();
        for v in [s.pole_acceleration, s.theta, s.theta_dot, s.x, s.x_dot] {
            assert!((0.1..=0.2).contains(&v));
        }

        let err = env.reset(ResetOptions::default().with_bounds(0.2, 0.1)).unwrap_err();
        assert!(matches!(kind(&err), FufiError::Config(_)));
    }

    #[test]
    fn test_failed_reset_keeps_generator() {
        let mut a = env();
        let mut b = env();
        a.reset(ResetOptions::seeded(1)).unwrap();
        b.reset(ResetOptions::seeded(1)).unwrap();
        let before = a.state();

        assert!(a.reset(ResetOptions::seeded(99).with_bounds(1.0, 0.0)).is_err());
        assert_eq!(a.state(), before, "a rejected reset leaves the state alone");

        let obs_a = a.reset(ResetOptions::default()).unwrap();
        let obs_b = b.reset(ResetOptions::default()).unwrap();
        assert_eq!(obs_a, obs_b);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_step_before_reset() {
        let mut env = env();
        let err = env.step(100).unwrap_err();
        assert!(matches!(kind(&err), FufiError::ResetRequired));
    }

    #[test]
    fn test_invalid_action() {
        let mut env = env();
        env.reset(ResetOptions::seeded(0)).unwrap();
        let before = env.state();

        for action in [-1, 201, i64::MAX] {
            let err = env.step(action).unwrap_err();
            assert!(matches!(kind(&err), FufiError::InvalidAction { .. }));
        }
        assert_eq!(env.state(), before, "rejected actions leave the state alone");
    }

    #[test]
    fn test_euler_zero_force_scenario() {
        let mut env = env();
        env.reset(ResetOptions::seeded(0)).unwrap();
        env.set_state(SystemState::at_rest(0.05, 0.0)).unwrap();

        let result = env.step(env.codec().neutral() as i64).unwrap();

        let state = env.state().unwrap();
        assert_eq!(state.theta, 0.05);
        assert_eq!(state.x, 0.0);
        assert!((state.theta_dot - 0.02 * 0.394_153_893_916_434_9).abs() < 1e-6);
        assert!(!result.terminated);
        assert_eq!(result.reward, 1.0);
    }

    #[test]
    fn test_termination_on_position() {
        let mut env = env();
        env.reset(ResetOptions::seeded(0)).unwrap();
        env.set_state(SystemState::at_rest(0.0, 2.5)).unwrap();

        let result = env.step(100).unwrap();
        assert!(result.terminated, "x = 2.5 is beyond the 2.4 m threshold");
        assert!(!result.truncated);
        assert_eq!(result.reward, 1.0);
        assert_eq!(env.steps_beyond_terminated(), Some(0));
        assert_eq!(env.misuse_warnings(), 0);
    }

    #[test]
    fn test_termination_on_angle() {
        let mut env = env();
        env.reset(ResetOptions::seeded(0)).unwrap();
        env.set_state(SystemState::at_rest(-0.1, 0.0)).unwrap();

        let result = env.step(100).unwrap();
        assert!(result.terminated, "-0.1 rad is beyond the 2° threshold");
    }

    #[test]
    fn test_steps_after_termination() {
        let mut env = env();
        env.reset(ResetOptions::seeded(0)).unwrap();
        env.set_state(SystemState::at_rest(0.0, 2.5)).unwrap();
        env.step(100).unwrap();

        let second = env.step(100).unwrap();
        assert_eq!(second.reward, 0.0);
        assert!(second.terminated);
        assert_eq!(env.steps_beyond_terminated(), Some(1));
        assert_eq!(env.phase(), EpisodePhase::TerminatedContinuing);
        assert_eq!(env.misuse_warnings(), 1);

        let third = env.step(100).unwrap();
        assert_eq!(third.reward, 0.0);
        assert_eq!(env.steps_beyond_terminated(), Some(2));
        assert_eq!(env.misuse_warnings(), 1, "only the first late step warns");

        env.reset(ResetOptions::default()).unwrap();
        assert_eq!(env.steps_beyond_terminated(), None);
    }

    #[test]
    fn test_never_truncates() {
        let mut env = env();
        env.reset(ResetOptions::seeded(9)).unwrap();
        for _ in 0..2000 {
            let state = env.state().unwrap();
            // Bang-bang control on the pole angle
            let action = if state.theta + 0.1 * state.theta_dot > 0.0 { 200 } else { 0 };
            let result = env.step(action).unwrap();
            assert!(!result.truncated);
            assert!(result.info.is_empty());
            if result.terminated {
                break;
            }
        }
    }

    #[test]
    fn test_semi_implicit_mode() {
        let config = FufiConfig::default().integrator(Integrator::SemiImplicitEuler);
        let mut env = FufiEnv::new(config).unwrap();
        env.reset(ResetOptions::seeded(0)).unwrap();
        env.set_state(SystemState::at_rest(0.01, 0.0)).unwrap();
        env.step(100).unwrap();
        assert!(env.pole_angle().unwrap() > 0.01);
    }

    #[test]
    fn test_hardware_mode_not_implemented() {
        let config = FufiConfig::default().mode(ExperimentMode::Hardware);
        let mut env = FufiEnv::new(config).unwrap();

        let err = env.reset(ResetOptions::default()).unwrap_err();
        assert!(matches!(kind(&err), FufiError::NotImplemented(_)));
        let err = env.step(100).unwrap_err();
        assert!(matches!(kind(&err), FufiError::NotImplemented(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = FufiEnv::new(FufiConfig::default().force(10.0, 0.3)).unwrap_err();
        assert!(matches!(kind(&err), FufiError::Config(_)));

        // A NaN threshold would make termination unreachable
        let err = FufiEnv::new(FufiConfig::default().thresholds(f64::NAN, 2.4)).unwrap_err();
        assert!(matches!(kind(&err), FufiError::Config(_)));
        let err = FufiEnv::new(FufiConfig::default().tau(f64::NAN)).unwrap_err();
        assert!(matches!(kind(&err), FufiError::Config(_)));
    }

    #[test]
    fn test_spaces() {
        let env = env();
        assert_eq!(env.action_space().dtype, SpaceType::Discrete(201));

        let obs_space = env.observation_space();
        assert_eq!(obs_space.shape, vec![3]);
        match obs_space.dtype {
            SpaceType::Box { low, high } => {
                assert_eq!(high[0], f32::MAX);
                assert!((high[1] - 0.069_813_17).abs() < 1e-6);
                assert_eq!(low[1], -high[1]);
            }
            other => panic!("expected a box space, got {other:?}"),
        }
    }

    #[test]
    fn test_render_modes() {
        let mut env = env();
        env.reset(ResetOptions::seeded(0)).unwrap();
        assert!(env.render().is_none(), "no render mode configured");

        let config = FufiConfig::default().render_mode(RenderMode::RgbArray);
        let mut env = FufiEnv::new(config).unwrap();
        assert!(env.render().is_none(), "nothing to draw before reset");
        env.reset(ResetOptions::seeded(0)).unwrap();
        assert_eq!(env.render().unwrap().shape(), (400, 600, 3));
        assert!(env.last_frame().is_none());

        let mut env = FufiEnv::new(FufiConfig::default().render_mode(RenderMode::Human)).unwrap();
        env.reset(ResetOptions::seeded(0)).unwrap();
        assert!(env.last_frame().is_some());
        env.close();
        assert!(env.last_frame().is_none());
        env.step(100).unwrap();
        assert!(env.last_frame().is_some());
    }
}
