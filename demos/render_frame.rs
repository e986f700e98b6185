//! Render a few frames of a FUFI episode to PNG images
//!
//! # Usage
//!
//! ```bash
//! cargo run --example render_frame -- [output_dir]
//! ```

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use fufi_rl::{
    env::{fufi::RenderMode, Environment, ResetOptions},
    prelude::{FufiConfig, FufiEnv},
};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "frames".to_string()));
    fs::create_dir_all(&out_dir)?;

    let config = FufiConfig::default().render_mode(RenderMode::Human);
    let mut env = FufiEnv::new(config)?;
    env.reset(ResetOptions::seeded(3))?;

    let push_right = env.codec().len() as i64 - 1;
    for step in 0..10 {
        let result = env.step(push_right)?;
        if let Some(frame) = env.last_frame() {
            let path = out_dir.join(format!("frame_{step:03}.png"));
            frame.save(&path).with_context(|| format!("Failed to save {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        if result.terminated {
            tracing::info!("Pole fell after {} steps", step + 1);
            break;
        }
    }

    env.close();
    Ok(())
}
