/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use onramp_client::OnRampClient;
use onramp_loaders::{
  CsvSink, MemorySink, NormalizationPipeline, RecordSink, SweepPlan, SweepStats,
  run_sweep_with_progress,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct SweepCommand {
  /// JSON sweep plan (amounts, assets, regions); built-in plan when omitted
  #[arg(short, long)]
  pub plan: Option<PathBuf>,

  /// CSV file to append rows to
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Override the plan's amounts, e.g. 30,100,1100
  #[arg(short, long, value_delimiter = ',')]
  pub amounts: Option<Vec<f64>>,

  /// Collect rows in memory and only report the count
  #[arg(short, long)]
  pub dry_run: bool,
}

/// Plan from `--plan`, then `ONRAMP_PLAN`, then the built-in grid
fn load_plan(cmd: &SweepCommand, config: &Config) -> Result<SweepPlan> {
  let plan = match cmd.plan.as_ref().or(config.plan_path.as_ref()) {
    Some(path) => SweepPlan::from_json_file(path)
      .with_context(|| format!("Failed to load sweep plan from {}", path.display()))?,
    None => SweepPlan::default(),
  };

  let plan = match &cmd.amounts {
    Some(amounts) => plan.with_amounts(amounts.clone()),
    None => plan,
  };
  plan.validate().context("Invalid sweep plan")?;
  Ok(plan)
}

/// Main execute function
pub async fn execute(cmd: SweepCommand, config: Config) -> Result<()> {
  let plan = load_plan(&cmd, &config)?;
  info!(
    "Sweeping {} amounts × {} assets × {} regions ({} requests)",
    plan.amounts.len(),
    plan.assets.len(),
    plan.regions.len(),
    plan.combinations()
  );

  let client = OnRampClient::new(config.api_config.clone()).context("Failed to create client")?;
  let mut pipeline = NormalizationPipeline::from_client(&client);

  let progress = ProgressBar::new(plan.combinations() as u64);
  progress.set_style(
    ProgressStyle::default_bar()
      .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
      .progress_chars("##-"),
  );

  let mut memory = MemorySink::new();
  let mut csv;
  let sink: &mut dyn RecordSink = if cmd.dry_run {
    info!("Dry run mode - rows are kept in memory only");
    &mut memory
  } else {
    let path = cmd.output.clone().unwrap_or_else(|| config.output_path.clone());
    info!("Appending rows to {}", path.display());
    csv = CsvSink::new(path);
    &mut csv
  };

  let stats = run_sweep_with_progress(&mut pipeline, &plan, sink, |request, _| {
    progress.set_message(format!(
      "{} {} {} {}",
      request.amount(),
      request.fiat(),
      request.crypto(),
      request.payment_method()
    ));
    progress.inc(1);
  })
  .await?;
  progress.finish_with_message("Sweep complete");

  print_stats(&stats, cmd.dry_run.then(|| memory.rows().len()));
  Ok(())
}

fn print_stats(stats: &SweepStats, dry_run_rows: Option<usize>) {
  println!("\nSweep summary");
  println!("  Requests:         {}", stats.combinations);
  match dry_run_rows {
    Some(rows) => println!("  Rows (dry run):   {}", rows),
    None => println!("  Rows written:     {}", stats.records_written),
  }
  println!("  Fetch failures:   {}", stats.fetch_failures);
  println!("  Unresolved rates: {}", stats.unresolved_rates);
  println!("  Sink failures:    {}", stats.sink_failures);
  println!("  Elapsed:          {:.1}s", stats.elapsed_ms as f64 / 1000.0);
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn config(plan_path: Option<PathBuf>) -> Config {
    Config {
      api_config: onramp_core::Config::default(),
      output_path: PathBuf::from("out.csv"),
      plan_path,
    }
  }

  fn command(plan: Option<PathBuf>, amounts: Option<Vec<f64>>) -> SweepCommand {
    SweepCommand { plan, output: None, amounts, dry_run: true }
  }

  #[test]
  fn test_builtin_plan_with_amount_override() {
    let plan = load_plan(&command(None, Some(vec![30.0, 100.0])), &config(None)).unwrap();
    assert_eq!(plan.amounts, vec![30.0, 100.0]);
    assert_eq!(plan.assets.len(), 3);
  }

  #[test]
  fn test_flag_beats_env_plan() {
    let dir = TempDir::new().unwrap();
    let flag = dir.path().join("flag.json");
    std::fs::write(
      &flag,
      r#"{"amounts": [500],
          "assets": [{"label": "ETH (Mainnet)",
                      "id": "/currencies/crypto/1/0x0000000000000000000000000000000000000000"}],
          "regions": [{"code": "de", "fiat": "EUR", "payment_methods": ["paypal"]}]}"#,
    )
    .unwrap();

    let env_plan = dir.path().join("missing.json");
    let plan = load_plan(&command(Some(flag), None), &config(Some(env_plan))).unwrap();
    assert_eq!(plan.combinations(), 1);
  }

  #[test]
  fn test_missing_plan_file_errors() {
    let dir = TempDir::new().unwrap();
    let err = load_plan(&command(None, None), &config(Some(dir.path().join("nope.json"))));
    assert!(err.is_err());
  }

  #[test]
  fn test_invalid_amount_override() {
    assert!(load_plan(&command(None, Some(vec![0.0])), &config(None)).is_err());
  }
}
