//! Analytics aggregator.
//!
//! Pure derivations over the backend's stats and category breakdown. Nothing
//! here caches; callers recompute after every fetch.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use georesolve_shared::{CategoryCount, Complaint, Stats, Status};

/// Radius of the resolution-rate ring, in SVG user units.
pub const GAUGE_RADIUS: f64 = 100.0;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

/// `resolved / total * 100` to one decimal place; 0 when there are no
/// complaints.
pub fn resolution_rate(stats: &Stats) -> f64 {
    percentage(stats.resolved, stats.total)
}

/// Complaints still needing attention.
pub fn active_complaints(stats: &Stats) -> u64 {
    stats.pending + stats.in_progress
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: u64,
    pub percentage: f64,
}

/// Per-category share of `total`. Each percentage is rounded on its own, so
/// the column need not add up to exactly 100.
pub fn category_shares(breakdown: &[CategoryCount], total: u64) -> Vec<CategoryShare> {
    breakdown
        .iter()
        .map(|row| CategoryShare {
            category: row.category.clone(),
            count: row.count,
            percentage: percentage(row.count, total),
        })
        .collect()
}

/// First row as served; the backend orders by count.
pub fn most_reported(breakdown: &[CategoryCount]) -> Option<&CategoryCount> {
    breakdown.first()
}

/// Count a fetched collection by status.
pub fn tally(complaints: &[Complaint]) -> Stats {
    complaints.iter().fold(Stats::default(), |mut stats, c| {
        stats.total += 1;
        match c.status {
            Status::Pending => stats.pending += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::Resolved => stats.resolved += 1,
        }
        stats
    })
}

/// Stroke geometry of the ring gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingGauge {
    pub percentage: f64,
    pub circumference: f64,
    pub dash_offset: f64,
}

impl RingGauge {
    pub fn new(percentage: f64) -> Self {
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        Self {
            percentage,
            circumference,
            dash_offset: circumference * (1.0 - percentage / 100.0),
        }
    }
}

/// Everything the analytics screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub stats: Stats,
    pub resolution_rate: f64,
    pub active: u64,
    pub most_reported: Option<CategoryCount>,
    pub shares: Vec<CategoryShare>,
    pub gauge: RingGauge,
}

impl AnalyticsReport {
    pub fn new(stats: Stats, breakdown: &[CategoryCount]) -> Self {
        let rate = resolution_rate(&stats);
        Self {
            stats,
            resolution_rate: rate,
            active: active_complaints(&stats),
            most_reported: most_reported(breakdown).cloned(),
            shares: category_shares(breakdown, stats.total),
            gauge: RingGauge::new(rate),
        }
    }
}

impl fmt::Display for AnalyticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolution rate: {:.1}%", self.resolution_rate)?;
        writeln!(
            f,
            "Total: {}  Pending: {}  In Progress: {}  Resolved: {}",
            self.stats.total, self.stats.pending, self.stats.in_progress, self.stats.resolved
        )?;
        writeln!(f, "Active complaints: {}", self.active)?;
        match &self.most_reported {
            Some(top) => writeln!(f, "Most reported: {} ({})", top.category, top.count)?,
            None => writeln!(f, "Most reported: none")?,
        }
        for share in &self.shares {
            let bar = "#".repeat((share.percentage / 5.0).round() as usize);
            writeln!(
                f,
                "  {:<18} {:>4}  {:>5.1}%  {}",
                share.category, share.count, share.percentage, bar
            )?;
        }
        Ok(())
    }
}
