//! Simulation report generation.

use super::config::RaceSetup;
use crate::summary::PositionStats;
use serde::Serialize;
use std::time::Duration;

const BAR_WIDTH: usize = 40;

/// Results of a simulation run for one driver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimReport {
    pub car_number: String,
    pub driver_code: String,
    pub initial_position: u32,
    pub num_simulations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(rename = "elapsedMs", serialize_with = "serialize_millis")]
    pub elapsed: Duration,

    // Raw finishing positions, one per race
    #[serde(skip)]
    pub positions: Vec<u32>,

    #[serde(flatten)]
    pub stats: PositionStats,
}

fn serialize_millis<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

impl SimReport {
    pub fn new(
        setup: RaceSetup,
        seed: Option<u64>,
        elapsed: Duration,
        positions: Vec<u32>,
        stats: PositionStats,
    ) -> Self {
        Self {
            car_number: setup.car_number,
            driver_code: setup.driver_code,
            initial_position: setup.initial_position,
            num_simulations: setup.num_simulations,
            seed,
            elapsed,
            positions,
            stats,
        }
    }

    /// Generate a text report with a histogram of finishing positions.
    pub fn to_text(&self) -> String {
        let stats = &self.stats;
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                FINISHING POSITIONS HISTOGRAM\n");
        report.push_str(&format!(
            "              #{} {} starting from P{}\n",
            self.car_number, self.driver_code, self.initial_position
        ));
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Average: {:.2}, Simulations: {}\n",
            stats.mean, self.num_simulations
        ));
        report.push_str(&format!(
            "Win Chance: {:.2}%, Top 3 Chance: {:.2}%\n\n",
            stats.win_chance_percent, stats.top3_chance_percent
        ));

        report.push_str("── STATISTICS ───────────────────────────────────────────────────\n");
        report.push_str(&format!("  Median:        {:.1}\n", stats.median));
        report.push_str(&format!("  Mode:          P{}\n", stats.mode));
        report.push_str(&format!("  Std Dev:       {:.2}\n", stats.std_dev));
        report.push_str(&format!("  Best:          P{}\n", stats.min));
        report.push_str(&format!("  Worst:         P{}\n\n", stats.max));

        report.push_str("── FREQUENCY ────────────────────────────────────────────────────\n");
        let peak = stats.peak_count().max(1) as f64;
        for (position, count) in stats.histogram_bins() {
            let pct = count as f64 / stats.count as f64 * 100.0;
            let bar_len = (count as f64 / peak * BAR_WIDTH as f64).round() as usize;
            let bar: String = "█".repeat(bar_len);
            report.push_str(&format!(
                "  P{:<2} {:>6} {:>5.1}% {}\n",
                position, count, pct, bar
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
