//! Descriptive statistics over a set of finishing positions.

use crate::constants::{FIELD_SIZE, PODIUM_POSITIONS};
use crate::errors::SimError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of a finishing position distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionStats {
    pub count: usize,
    #[serde(rename = "average")]
    pub mean: f64,
    pub median: f64,
    /// Most frequent position; the smallest one wins a tie
    pub mode: u32,
    /// Population standard deviation
    #[serde(rename = "stddev")]
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    #[serde(rename = "winChancePercent")]
    pub win_chance_percent: f64,
    #[serde(rename = "top3ChancePercent")]
    pub top3_chance_percent: f64,
    /// Frequency of each position, index 0 is P1
    #[serde(rename = "histogramCounts")]
    pub histogram: [u32; FIELD_SIZE],
}

impl PositionStats {
    /// (position, count) pairs for P1 through P20.
    pub fn histogram_bins(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.histogram
            .iter()
            .enumerate()
            .map(|(i, &count)| (i as u32 + 1, count))
    }

    /// Largest single bin, used to scale rendered bars.
    pub fn peak_count(&self) -> u32 {
        self.histogram.iter().copied().max().unwrap_or(0)
    }
}

/// Summarize finishing positions.
pub fn summarize(positions: &[u32]) -> Result<PositionStats, SimError> {
    if positions.is_empty() {
        return Err(SimError::EmptyInput);
    }

    let count = positions.len();
    let n = count as f64;

    let mean = positions.iter().map(|&p| p as f64).sum::<f64>() / n;
    let variance = positions
        .iter()
        .map(|&p| (p as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    let middle = count / 2;
    let median = if count % 2 == 0 {
        (sorted[middle - 1] as f64 + sorted[middle] as f64) / 2.0
    } else {
        sorted[middle] as f64
    };

    let mut frequencies: BTreeMap<u32, usize> = BTreeMap::new();
    for &p in positions {
        *frequencies.entry(p).or_insert(0) += 1;
    }
    // BTreeMap iterates ascending, so a strict comparison keeps the smallest mode
    let mut mode = sorted[0];
    let mut mode_count = 0;
    for (&position, &freq) in &frequencies {
        if freq > mode_count {
            mode = position;
            mode_count = freq;
        }
    }

    let wins = positions.iter().filter(|&&p| p == 1).count();
    let podiums = positions
        .iter()
        .filter(|&&p| p <= PODIUM_POSITIONS)
        .count();

    let mut histogram = [0u32; FIELD_SIZE];
    for &p in positions {
        if (1..=FIELD_SIZE as u32).contains(&p) {
            histogram[p as usize - 1] += 1;
        }
    }

    Ok(PositionStats {
        count,
        mean,
        median,
        mode,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        win_chance_percent: wins as f64 / n * 100.0,
        top3_chance_percent: podiums as f64 / n * 100.0,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_summarize_small_sample() {
        let stats = summarize(&[1, 1, 2, 3]).unwrap();

        assert_eq!(stats.count, 4);
        assert!(approx(stats.mean, 1.75));
        assert!(approx(stats.median, 1.5));
        assert_eq!(stats.mode, 1);
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 3);
        assert!(approx(stats.win_chance_percent, 50.0));
        assert!(approx(stats.top3_chance_percent, 100.0));
        // sqrt(((0.75)^2 * 2 + 0.25^2 + 1.25^2) / 4)
        assert!(approx(stats.std_dev, 0.6875_f64.sqrt()));
    }

    #[test]
    fn test_summarize_empty_fails() {
        assert_eq!(summarize(&[]), Err(SimError::EmptyInput));
    }

    #[test]
    fn test_mode_tie_prefers_smallest_position() {
        let stats = summarize(&[7, 3, 7, 3, 12]).unwrap();
        assert_eq!(stats.mode, 3);
    }

    #[test]
    fn test_odd_length_median() {
        let stats = summarize(&[9, 2, 5]).unwrap();
        assert!(approx(stats.median, 5.0));
    }

    #[test]
    fn test_single_value() {
        let stats = summarize(&[20]).unwrap();
        assert!(approx(stats.mean, 20.0));
        assert!(approx(stats.std_dev, 0.0));
        assert_eq!(stats.mode, 20);
        assert!(approx(stats.win_chance_percent, 0.0));
        assert!(approx(stats.top3_chance_percent, 0.0));
        assert_eq!(stats.histogram[19], 1);
    }

    #[test]
    fn test_histogram_counts_every_position() {
        let positions: Vec<u32> = (1..=20).chain([1, 1, 4]).collect();
        let stats = summarize(&positions).unwrap();

        assert_eq!(stats.histogram[0], 3);
        assert_eq!(stats.histogram[3], 2);
        assert_eq!(stats.histogram[19], 1);
        assert_eq!(
            stats.histogram.iter().sum::<u32>() as usize,
            positions.len()
        );
        assert_eq!(stats.peak_count(), 3);
    }

    #[test]
    fn test_histogram_bins_are_one_based() {
        let stats = summarize(&[2, 2]).unwrap();
        let bins: Vec<(u32, u32)> = stats.histogram_bins().collect();
        assert_eq!(bins.len(), FIELD_SIZE);
        assert_eq!(bins[0], (1, 0));
        assert_eq!(bins[1], (2, 2));
    }

    #[test]
    fn test_serialized_field_names() {
        let stats = summarize(&[1, 2]).unwrap();
        let value = serde_json::to_value(&stats).unwrap();
        for key in [
            "average",
            "median",
            "mode",
            "stddev",
            "min",
            "max",
            "winChancePercent",
            "top3ChancePercent",
            "histogramCounts",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["histogramCounts"].as_array().unwrap().len(), 20);
    }
}
