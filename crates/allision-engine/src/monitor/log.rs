// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{
    error::EstimationError, monitor::aggregation_monitor::AggregationMonitor,
    protection::ProtectionAnomaly, stats::AggregationStatistics,
};
use allision_model::{
    estimate::{CollisionEstimate, CollisionReport},
    model::{Bridge, Dataset},
};
use std::time::Instant;

const TABLE_WIDTH: usize = 105;

/// Prints one table row per estimated bridge, and a warning per protection
/// factor outside `[0, 1]`.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    print_warnings: bool,
}

impl LogMonitor {
    pub fn new(print_warnings: bool) -> Self {
        Self {
            start_time: Instant::now(),
            print_warnings,
        }
    }

    #[inline(always)]
    fn print_header(&self) {
        println!(
            "{:<9} | {:<32} | {:>5} | {:>8} | {:>12} | {:>12} | {:>12}",
            "Elapsed", "Bridge", "Piers", "Dolphins", "Unprotected", "Protected", "Return (yr)"
        );
        println!("{}", "-".repeat(TABLE_WIDTH));
    }

    fn format_row(&self, bridge: &Bridge, estimate: &CollisionEstimate) -> String {
        let elapsed = format!("{:.2}s", self.start_time.elapsed().as_secs_f32());
        let return_period = match estimate.return_period().years() {
            Some(years) => format!("{:.1}", years),
            None => "undefined".to_string(),
        };
        format!(
            "{:<9} | {:<32.32} | {:>5} | {:>8} | {:>12.4e} | {:>12.4e} | {:>12}",
            elapsed,
            bridge.name,
            bridge.exposed_piers,
            bridge.protective_structures,
            estimate.unprotected(),
            estimate.protected(),
            return_period
        )
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(print_warnings: {})", self.print_warnings)
    }
}

impl AggregationMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_run(&mut self, dataset: &Dataset, _statistics: &AggregationStatistics) {
        self.start_time = Instant::now();
        println!("Estimating {}", dataset);
        self.print_header();
    }

    fn on_protection_factor_out_of_range(
        &mut self,
        bridge: &Bridge,
        anomaly: &ProtectionAnomaly,
        _statistics: &AggregationStatistics,
    ) {
        if self.print_warnings {
            eprintln!("warning: bridge '{}': {}", bridge.name, anomaly);
        }
    }

    fn on_bridge_estimated(
        &mut self,
        bridge: &Bridge,
        estimate: &CollisionEstimate,
        _statistics: &AggregationStatistics,
    ) {
        println!("{}", self.format_row(bridge, estimate));
    }

    fn on_abort(&mut self, error: &EstimationError, _statistics: &AggregationStatistics) {
        println!("{}", "-".repeat(TABLE_WIDTH));
        println!("Estimation aborted: {}", error);
    }

    fn on_exit_run(&mut self, _report: &CollisionReport, statistics: &AggregationStatistics) {
        println!("{}", "-".repeat(TABLE_WIDTH));
        println!(
            "Estimation finished: {} bridges, {} contributions, {} protection factors out of range.",
            statistics.bridges_estimated,
            statistics.contributions_evaluated,
            statistics.protection_factors_out_of_range
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allision_core::math::point::Point2;
    use allision_model::{index::BridgeIndex, model::BridgeGeometry};

    fn bridge(name: &str) -> Bridge {
        Bridge {
            name: name.to_string(),
            waterway_length: 1000.0,
            start: Point2::new(0.0, 0.0),
            end: Point2::new(1000.0, 0.0),
            exposed_piers: 0,
            protective_structures: 0,
            geometry: BridgeGeometry::Standard,
            lane_centerline: 0.5,
        }
    }

    #[test]
    fn test_row_for_unexposed_bridge() {
        let monitor = LogMonitor::default();
        let b = bridge("HIGH LEVEL BRIDGE");
        let est = CollisionEstimate::from_contributions(BridgeIndex::new(0), &b.name, Vec::new());
        let row = monitor.format_row(&b, &est);
        assert!(row.contains("HIGH LEVEL BRIDGE"));
        assert!(row.ends_with("undefined"));
    }

    #[test]
    fn test_long_names_are_truncated() {
        let monitor = LogMonitor::new(false);
        let long = "A".repeat(60);
        let b = bridge(&long);
        let est = CollisionEstimate::from_contributions(BridgeIndex::new(0), &b.name, Vec::new());
        let row = monitor.format_row(&b, &est);
        assert!(row.contains(&"A".repeat(32)));
        assert!(!row.contains(&"A".repeat(33)));
        assert_eq!(monitor.to_string(), "LogMonitor(print_warnings: false)");
    }
}
