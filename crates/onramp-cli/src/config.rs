use anyhow::{Context, Result};
use onramp_core::Config as CoreConfig;
use std::env;
use std::path::PathBuf;

/// Default sink file, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "crypto_quotes.csv";

#[derive(Debug, Clone)]
pub struct Config {
  pub api_config: CoreConfig,
  /// `ONRAMP_OUTPUT`, used when `--output` is not given
  pub output_path: PathBuf,
  /// `ONRAMP_PLAN`, used when `--plan` is not given
  pub plan_path: Option<PathBuf>,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let api_config = CoreConfig::from_env().context("Invalid ONRAMP_* configuration")?;

    let output_path = env::var("ONRAMP_OUTPUT")
      .map(PathBuf::from)
      .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT));

    let plan_path =
      env::var("ONRAMP_PLAN").ok().filter(|p| !p.trim().is_empty()).map(PathBuf::from);

    Ok(Self { api_config, output_path, plan_path })
  }
}
