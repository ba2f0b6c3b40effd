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

//! Aggregation monitoring interface
//!
//! Lifecycle
//! - enter → {out-of-range factor}* → bridge estimated → ... → exit
//! - abort replaces exit when a bridge fails.
//!
//! `AggregationStatistics` is provided to every callback and reflects the
//! bridges reported so far.

use crate::{error::EstimationError, protection::ProtectionAnomaly, stats::AggregationStatistics};
use allision_model::{
    estimate::{CollisionEstimate, CollisionReport},
    model::{Bridge, Dataset},
};

/// Trait for observing an aggregation run.
pub trait AggregationMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called once before the first bridge is estimated.
    fn on_enter_run(&mut self, dataset: &Dataset, statistics: &AggregationStatistics);
    /// Called for every protection factor of `bridge` outside `[0, 1]`, before
    /// the bridge itself is reported.
    fn on_protection_factor_out_of_range(
        &mut self,
        bridge: &Bridge,
        anomaly: &ProtectionAnomaly,
        statistics: &AggregationStatistics,
    );
    /// Called when the estimate of a bridge is complete.
    fn on_bridge_estimated(
        &mut self,
        bridge: &Bridge,
        estimate: &CollisionEstimate,
        statistics: &AggregationStatistics,
    );
    /// Called when the run stops on an error.
    fn on_abort(&mut self, _error: &EstimationError, _statistics: &AggregationStatistics) {}
    /// Called once after the last bridge is estimated.
    fn on_exit_run(&mut self, report: &CollisionReport, statistics: &AggregationStatistics);
}

impl<M> AggregationMonitor for &mut M
where
    M: AggregationMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_run(&mut self, dataset: &Dataset, statistics: &AggregationStatistics) {
        (**self).on_enter_run(dataset, statistics);
    }

    fn on_protection_factor_out_of_range(
        &mut self,
        bridge: &Bridge,
        anomaly: &ProtectionAnomaly,
        statistics: &AggregationStatistics,
    ) {
        (**self).on_protection_factor_out_of_range(bridge, anomaly, statistics);
    }

    fn on_bridge_estimated(
        &mut self,
        bridge: &Bridge,
        estimate: &CollisionEstimate,
        statistics: &AggregationStatistics,
    ) {
        (**self).on_bridge_estimated(bridge, estimate, statistics);
    }

    fn on_abort(&mut self, error: &EstimationError, statistics: &AggregationStatistics) {
        (**self).on_abort(error, statistics);
    }

    fn on_exit_run(&mut self, report: &CollisionReport, statistics: &AggregationStatistics) {
        (**self).on_exit_run(report, statistics);
    }
}

impl std::fmt::Debug for dyn AggregationMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AggregationMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn AggregationMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AggregationMonitor({})", self.name())
    }
}
