use anyhow::{Context, Result};
use clap::Args;
use onramp_loaders::{ProviderSummary, read_csv, summarize};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct ReportCommand {
  /// Quotes CSV written by `onramp sweep`
  #[arg(short, long)]
  pub input: PathBuf,
}

pub fn execute(cmd: ReportCommand) -> Result<()> {
  let records =
    read_csv(&cmd.input).with_context(|| format!("Failed to read {}", cmd.input.display()))?;
  info!("Loaded {} rows from {}", records.len(), cmd.input.display());

  let summary = summarize(&records);
  if summary.is_empty() {
    warn!("No rows fall into any price bin");
    return Ok(());
  }

  print!("{}", render(&summary));
  Ok(())
}

/// One block per (crypto, region), rows ordered by bin then average rank
fn render(summary: &[ProviderSummary]) -> String {
  let mut out = String::new();
  let mut current: Option<(&str, &str)> = None;

  for row in summary {
    let key = (row.crypto.as_str(), row.region.as_str());
    if current != Some(key) {
      out.push_str(&format!("\n{} in {}\n", row.crypto, row.region));
      out.push_str(&format!(
        "  {:<18} {:<20} {:>6} {:>9} {:>9} {:>9}\n",
        "Bin", "Provider", "Quotes", "Avg rank", "Fee %", "Spread %"
      ));
      current = Some(key);
    }
    out.push_str(&format!(
      "  {:<18} {:<20} {:>6} {:>9.2} {:>9.2} {:>9.2}\n",
      row.bin.label(),
      row.provider,
      row.count,
      row.avg_rank,
      row.avg_fee_percentage,
      row.avg_spread_percentage
    ));
  }
  out
}
