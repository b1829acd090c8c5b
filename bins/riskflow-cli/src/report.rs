//! Report output: scores CSV and a human-readable batch summary.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

use riskflow_core::types::RiskCategory;
use riskflow_core::WalletAddress;
use riskflow_engine::{BatchOutcome, WalletReport};

/// Rows sorted by normalized score, best first; ties break on address so
/// repeated runs emit identical files.
fn sorted_reports(outcome: &BatchOutcome) -> Vec<(&WalletAddress, &WalletReport)> {
    let mut rows: Vec<_> = outcome.reports.iter().collect();
    rows.sort_by(|(wa, a), (wb, b)| {
        b.result
            .normalized_score
            .cmp(&a.result.normalized_score)
            .then_with(|| wa.cmp(wb))
    });
    rows
}

/// Write `wallet,raw_score,normalized_score,category` rows.
pub fn write_scores_csv(path: &Path, outcome: &BatchOutcome) -> Result<()> {
    let mut out = String::from("wallet,raw_score,normalized_score,category\n");
    for (wallet, report) in sorted_reports(outcome) {
        out.push_str(&format!(
            "{},{:.2},{},{}\n",
            wallet,
            report.result.raw_score,
            report.result.normalized_score,
            report.result.category.label().replace(' ', "")
        ));
    }
    let mut file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(out.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Aggregate batch statistics for the terminal summary.
pub struct Summary {
    pub scored: usize,
    pub failed: usize,
    pub category_counts: BTreeMap<RiskCategory, usize>,
    pub mean_normalized: f64,
    pub generated_at: i64,
}

impl Summary {
    pub fn from_outcome(outcome: &BatchOutcome, now: i64) -> Self {
        let mut category_counts = BTreeMap::new();
        let mut total: u64 = 0;
        for report in outcome.reports.values() {
            *category_counts.entry(report.result.category).or_insert(0) += 1;
            total += u64::from(report.result.normalized_score);
        }
        let mean_normalized = if outcome.reports.is_empty() {
            0.0
        } else {
            total as f64 / outcome.reports.len() as f64
        };
        Summary {
            scored: outcome.reports.len(),
            failed: outcome.failures.len(),
            category_counts,
            mean_normalized,
            generated_at: now,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = Utc
            .timestamp_opt(self.generated_at, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| self.generated_at.to_string());
        writeln!(f, "=== Risk Scoring Summary ===")?;
        writeln!(f, "Generated: {when}")?;
        writeln!(f, "Wallets scored: {}", self.scored)?;
        writeln!(f, "Wallets failed: {}", self.failed)?;
        writeln!(f, "Mean score: {:.1}", self.mean_normalized)?;
        writeln!(f)?;
        for (category, count) in &self.category_counts {
            writeln!(f, "  {:<16} {}", category.label(), count)?;
        }
        Ok(())
    }
}

/// Per-wallet breakdown for the `explain` subcommand.
pub fn explain(wallet: &WalletAddress, report: &WalletReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Wallet: {wallet}\n"));
    out.push_str(&format!(
        "Score:  {} ({}) — raw {:.2}\n\n",
        report.result.normalized_score,
        report.result.category.label(),
        report.result.raw_score
    ));
    out.push_str("Indicators:\n");
    let f = &report.features;
    out.push_str(&format!(
        "  borrow/supply ratio:   {:>8.3}\n",
        f.borrow_supply_ratio
    ));
    out.push_str(&format!("  liquidations:          {:>8}\n", f.liquidation_count));
    out.push_str(&format!("  inactivity (days):     {:>8}\n", f.inactivity_days));
    out.push_str(&format!(
        "  repayments per month:  {:>8.2}\n",
        f.repayments_per_month
    ));
    out.push_str(&format!(
        "  volatile asset usage:  {:>7.1}%\n",
        f.volatile_asset_pct * 100.0
    ));
    out.push_str(&format!(
        "  dominant protocol:     {:>8}\n",
        f.dominant_protocol_version
    ));
    out.push_str(&format!(
        "  avg collateral factor: {:>8.2}\n",
        f.avg_collateral_factor
    ));
    out.push_str("\nComponents:\n");
    for (indicator, score) in report.components.iter() {
        out.push_str(&format!("  {:<22} {:>5}\n", indicator.to_string(), score));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskflow_core::types::{
        ComponentScores, FeatureVector, ProtocolVersion, ScoreResult,
    };
    use tempfile::tempdir;

    fn wallet(n: u8) -> WalletAddress {
        format!("0x{:040x}", n).parse().unwrap()
    }

    fn report(w: &WalletAddress, normalized: u16) -> WalletReport {
        WalletReport {
            features: FeatureVector {
                borrow_supply_ratio: 0.25,
                liquidation_count: 0,
                inactivity_days: 10,
                repayments_per_month: 2.5,
                volatile_asset_pct: 0.1,
                dominant_protocol_version: ProtocolVersion::V3,
                avg_collateral_factor: 0.85,
            },
            components: ComponentScores {
                borrow_supply_ratio: 100,
                liquidation_count: 50,
                inactivity_days: 50,
                repayments_per_month: 100,
                volatile_asset_pct: 100,
                protocol_version: 50,
                collateral_factor: 100,
            },
            result: ScoreResult {
                wallet: w.clone(),
                raw_score: 577.5,
                normalized_score: normalized,
                category: RiskCategory::from_normalized(normalized),
            },
        }
    }

    fn outcome(scores: &[(u8, u16)]) -> BatchOutcome {
        let mut reports = BTreeMap::new();
        for &(n, score) in scores {
            let w = wallet(n);
            reports.insert(w.clone(), report(&w, score));
        }
        BatchOutcome {
            reports,
            failures: BTreeMap::new(),
        }
    }

    #[test]
    fn csv_is_sorted_best_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        write_scores_csv(&path, &outcome(&[(1, 200), (2, 900), (3, 550)])).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "wallet,raw_score,normalized_score,category");
        assert!(lines[1].contains(",900,VeryLowRisk"));
        assert!(lines[2].contains(",550,ModerateRisk"));
        assert!(lines[3].contains(",200,HighRisk"));
    }

    #[test]
    fn csv_tie_breaks_on_address() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        write_scores_csv(&path, &outcome(&[(2, 500), (1, 500)])).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[1].starts_with(wallet(1).as_str()));
        assert!(lines[2].starts_with(wallet(2).as_str()));
    }

    #[test]
    fn summary_counts_categories() {
        let summary = Summary::from_outcome(&outcome(&[(1, 900), (2, 850), (3, 100)]), 0);
        assert_eq!(summary.scored, 3);
        assert_eq!(summary.category_counts[&RiskCategory::VeryLow], 2);
        assert_eq!(summary.category_counts[&RiskCategory::VeryHigh], 1);
        assert!((summary.mean_normalized - 616.666).abs() < 0.01);
    }

    #[test]
    fn summary_display_lists_labels() {
        let summary = Summary::from_outcome(&outcome(&[(1, 900)]), 1_700_000_000);
        let text = summary.to_string();
        assert!(text.contains("Wallets scored: 1"));
        assert!(text.contains("Very Low Risk"));
        assert!(text.contains("2023-11-14"));
    }

    #[test]
    fn explain_names_all_indicators() {
        let w = wallet(1);
        let text = explain(&w, &report(&w, 888));
        assert!(text.contains("888"));
        assert!(text.contains("borrow_supply_ratio"));
        assert!(text.contains("collateral_factor"));
        assert!(text.contains("Very Low Risk"));
    }
}
