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

//! Monitoring combinator for aggregation runs
//!
//! Provides `CompositeAggregationMonitor`, a fan-out monitor that forwards
//! every event to its children in insertion order.

use crate::{
    error::EstimationError, monitor::aggregation_monitor::AggregationMonitor,
    protection::ProtectionAnomaly, stats::AggregationStatistics,
};
use allision_model::{
    estimate::{CollisionEstimate, CollisionReport},
    model::{Bridge, Dataset},
};

/// An aggregation monitor that forwards events to all of its children.
pub struct CompositeAggregationMonitor<'a> {
    monitors: Vec<Box<dyn AggregationMonitor + 'a>>,
}

impl<'a> Default for CompositeAggregationMonitor<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeAggregationMonitor<'a> {
    /// Creates a new empty `CompositeAggregationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeAggregationMonitor` with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: AggregationMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn AggregationMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn AggregationMonitor + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn AggregationMonitor + 'a>> for CompositeAggregationMonitor<'a> {
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn AggregationMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a> AggregationMonitor for CompositeAggregationMonitor<'a> {
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeAggregationMonitor"
    }

    #[inline(always)]
    fn on_enter_run(&mut self, dataset: &Dataset, statistics: &AggregationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_run(dataset, statistics);
        }
    }

    #[inline(always)]
    fn on_protection_factor_out_of_range(
        &mut self,
        bridge: &Bridge,
        anomaly: &ProtectionAnomaly,
        statistics: &AggregationStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_protection_factor_out_of_range(bridge, anomaly, statistics);
        }
    }

    #[inline(always)]
    fn on_bridge_estimated(
        &mut self,
        bridge: &Bridge,
        estimate: &CollisionEstimate,
        statistics: &AggregationStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_bridge_estimated(bridge, estimate, statistics);
        }
    }

    #[inline(always)]
    fn on_abort(&mut self, error: &EstimationError, statistics: &AggregationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_abort(error, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_run(&mut self, report: &CollisionReport, statistics: &AggregationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_run(report, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;
    use allision_model::index::BridgeIndex;
    use std::{cell::RefCell, rc::Rc};

    struct Recorder {
        tag: &'static str,
        events: Rc<RefCell<Vec<String>>>,
    }

    impl AggregationMonitor for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }
        fn on_enter_run(&mut self, _dataset: &Dataset, _statistics: &AggregationStatistics) {
            self.events.borrow_mut().push(format!("{}:enter", self.tag));
        }
        fn on_protection_factor_out_of_range(
            &mut self,
            _bridge: &Bridge,
            _anomaly: &ProtectionAnomaly,
            _statistics: &AggregationStatistics,
        ) {
        }
        fn on_bridge_estimated(
            &mut self,
            _bridge: &Bridge,
            estimate: &CollisionEstimate,
            _statistics: &AggregationStatistics,
        ) {
            self.events
                .borrow_mut()
                .push(format!("{}:{}", self.tag, estimate.name()));
        }
        fn on_exit_run(&mut self, _report: &CollisionReport, _statistics: &AggregationStatistics) {
            self.events.borrow_mut().push(format!("{}:exit", self.tag));
        }
    }

    #[test]
    fn test_events_fan_out_in_insertion_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeAggregationMonitor::with_capacity(3);
        composite.add_monitor(Recorder {
            tag: "a",
            events: Rc::clone(&events),
        });
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor_boxed(Box::new(Recorder {
            tag: "b",
            events: Rc::clone(&events),
        }));
        assert_eq!(composite.len(), 3);

        let stats = AggregationStatistics::default();
        let report = CollisionReport::new(vec![CollisionEstimate::from_contributions(
            BridgeIndex::new(0),
            "KILL VAN KULL",
            Vec::new(),
        )]);
        let bridge = allision_model::model::Bridge {
            name: "KILL VAN KULL".to_string(),
            waterway_length: 1.0,
            start: allision_core::math::point::Point2::new(0.0, 0.0),
            end: allision_core::math::point::Point2::new(1.0, 0.0),
            exposed_piers: 0,
            protective_structures: 0,
            geometry: Default::default(),
            lane_centerline: 0.5,
        };
        if let Some(estimate) = report.get(BridgeIndex::new(0)) {
            composite.on_bridge_estimated(&bridge, estimate, &stats);
        }
        composite.on_exit_run(&report, &stats);

        assert_eq!(
            *events.borrow(),
            vec!["a:KILL VAN KULL", "b:KILL VAN KULL", "a:exit", "b:exit"]
        );
    }
}
