//! Benchmark report rendering
//!
//! Times are microseconds; variance is in µs².

use crate::runner::Statistics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub name: String,
    pub samples: u64,
    pub mean_us: f64,
    pub variance_us2: f64,
    pub std_dev_us: f64,
    pub min_us: f64,
    pub max_us: f64,
    /// Wall time spent measuring, warmup excluded
    pub total_ms: f64,
}

impl TaskResult {
    pub fn new(name: &str, stats: Statistics, total: Duration) -> Self {
        Self {
            name: name.to_string(),
            samples: stats.samples,
            mean_us: stats.mean,
            variance_us2: stats.variance,
            std_dev_us: stats.std_dev,
            min_us: stats.min,
            max_us: stats.max,
            total_ms: total.as_secs_f64() * 1e3,
        }
    }
}

/// All strategies of one run, in run order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    pub tasks: Vec<TaskResult>,
}

impl BenchReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

const HEADERS: [&str; 7] = [
    "Task Name",
    "Samples",
    "Average Time (µs)",
    "Variance (µs²)",
    "Std Dev (µs)",
    "Min (µs)",
    "Max (µs)",
];

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 7]> = self
            .tasks
            .iter()
            .map(|t| {
                [
                    t.name.clone(),
                    t.samples.to_string(),
                    format!("{:.3}", t.mean_us),
                    format!("{:.3}", t.variance_us2),
                    format!("{:.3}", t.std_dev_us),
                    format!("{:.3}", t.min_us),
                    format!("{:.3}", t.max_us),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        let line = |f: &mut fmt::Formatter<'_>, cells: &[&str]| -> fmt::Result {
            let mut out = Vec::with_capacity(cells.len());
            for (i, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
                // Name column left-aligned, numbers right-aligned
                if i == 0 {
                    out.push(format!(" {:<width$} ", cell, width = *width));
                } else {
                    out.push(format!(" {:>width$} ", cell, width = *width));
                }
            }
            writeln!(f, "|{}|", out.join("|"))
        };

        writeln!(f, "+{}+", rule)?;
        line(f, &HEADERS[..])?;
        writeln!(f, "+{}+", rule)?;
        for row in &rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            line(f, &cells[..])?;
        }
        write!(f, "+{}+", rule)
    }
}
