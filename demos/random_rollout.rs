//! Roll out random actions on a pool of FUFI environments
//!
//! Every environment is built from the registry, so episodes end either when
//! the pole falls (terminated) or after the advertised step limit
//! (truncated).
//!
//! # Usage
//!
//! ```bash
//! cargo run --example random_rollout -- [config.json]
//! ```

use anyhow::Result;
use fufi_rl::{
    env::pool::EnvPool,
    registry::{EnvSpec, Registry, FUFI_V0},
    prelude::FufiConfig,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const NUM_ENVS: usize = 8;
const NUM_EPISODES: usize = 32;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut registry = Registry::with_defaults();
    let id = match std::env::args().nth(1) {
        Some(path) => {
            let config = FufiConfig::from_json_file(&path)?;
            tracing::info!("Loaded config from {}", path);
            registry.register(EnvSpec::new("FUFICustom-v0", config))?;
            "FUFICustom-v0"
        }
        None => FUFI_V0,
    };

    let mut pool = EnvPool::new(|| registry.make(id), NUM_ENVS)?;
    let n_actions = pool.get(0).map(|env| env.inner().codec().len()).unwrap_or(1) as i64;
    tracing::info!("Environment: {}", id);
    tracing::info!("  Num envs: {}", NUM_ENVS);
    tracing::info!("  Actions: {}", n_actions);

    let mut rng = StdRng::seed_from_u64(0);
    let mut lengths = vec![0usize; NUM_ENVS];
    let mut finished = Vec::new();
    let mut truncations = 0;

    pool.reset(Some(0))?;
    while finished.len() < NUM_EPISODES {
        let actions: Vec<i64> = (0..NUM_ENVS).map(|_| rng.gen_range(0..n_actions)).collect();
        let result = pool.step_structured(&actions)?;

        for i in 0..NUM_ENVS {
            lengths[i] += 1;
            if result.terminated[i] || result.truncated[i] {
                if result.truncated[i] && !result.terminated[i] {
                    truncations += 1;
                }
                finished.push(lengths[i]);
                lengths[i] = 0;
                pool.reset_env(i, Default::default())?;
            }
        }
    }

    let mean = finished.iter().sum::<usize>() as f64 / finished.len() as f64;
    tracing::info!("Episodes: {}", finished.len());
    tracing::info!("  Mean length: {:.1}", mean);
    tracing::info!("  Longest: {}", finished.iter().max().copied().unwrap_or(0));
    tracing::info!("  Truncated: {}", truncations);

    Ok(())
}
