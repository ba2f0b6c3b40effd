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

//! Aggregation of per-pier, per-class collision probabilities.
//!
//! For every bridge, for every vessel length class, for every exposed pier:
//!
//! ```raw
//! unprotected = mean annual traffic * aberrancy rate * geometric probability
//! protected   = unprotected * protection factor      (bridges with dolphins)
//!             = unprotected                          (bridges without)
//! ```
//!
//! Contributions are summed per bridge in class-major, pier-minor order; the
//! return period is the reciprocal of the protected total, or
//! `ReturnPeriod::Undefined` when that total is exactly zero.
//!
//! Bridges are independent. In `ExecutionMode::Parallel` they are estimated on
//! the rayon thread pool and merged back in registry order, so the report is
//! bit-identical to a sequential run. Monitors are always notified from the
//! calling thread, in registry order.

use crate::{
    constants::{APPROACH_ANGLE_STD_DEV_DEG, BASE_ABERRANCY_RATE},
    error::EstimationError,
    geometric::VesselTrack,
    monitor::aggregation_monitor::AggregationMonitor,
    projection::normalized_pier_position,
    protection::{ApproachAngleModel, ProtectionAnomaly, ProtectionPolicy},
    stats::AggregationStatistics,
};
use allision_model::{
    estimate::{CollisionEstimate, CollisionReport, Contribution},
    index::{BridgeIndex, LengthClassIndex, PierIndex},
    model::Dataset,
};
use rayon::prelude::*;
use std::time::Instant;

/// How the bridge loop is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// One rayon task per bridge.
    Parallel,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "Sequential"),
            ExecutionMode::Parallel => write!(f, "Parallel"),
        }
    }
}

/// A builder for `Aggregator`.
///
/// # Defaults
///
/// | Option | Default |
/// | :--- | :--- |
/// | `aberrancy_rate` | `BASE_ABERRANCY_RATE` (0.6e-4) |
/// | `approach_angle_std_dev_deg` | `APPROACH_ANGLE_STD_DEV_DEG` (30) |
/// | `protection_policy` | `ProtectionPolicy::Reference` |
/// | `execution_mode` | `ExecutionMode::Sequential` |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorBuilder {
    aberrancy_rate: f64,
    approach_angle_std_dev_deg: f64,
    protection_policy: ProtectionPolicy,
    execution_mode: ExecutionMode,
}

impl Default for AggregatorBuilder {
    fn default() -> Self {
        Self {
            aberrancy_rate: BASE_ABERRANCY_RATE,
            approach_angle_std_dev_deg: APPROACH_ANGLE_STD_DEV_DEG,
            protection_policy: ProtectionPolicy::default(),
            execution_mode: ExecutionMode::default(),
        }
    }
}

impl AggregatorBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the probability per transit that a vessel goes aberrant.
    #[inline]
    pub fn aberrancy_rate(mut self, rate: f64) -> Self {
        self.aberrancy_rate = rate;
        self
    }

    /// Sets the standard deviation of the approach angle, in degrees.
    #[inline]
    pub fn approach_angle_std_dev_deg(mut self, degrees: f64) -> Self {
        self.approach_angle_std_dev_deg = degrees;
        self
    }

    #[inline]
    pub fn protection_policy(mut self, policy: ProtectionPolicy) -> Self {
        self.protection_policy = policy;
        self
    }

    #[inline]
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    /// Builds the `Aggregator`.
    ///
    /// # Panics
    ///
    /// Panics if the aberrancy rate is negative or not finite, or the
    /// approach-angle standard deviation is not strictly positive and finite.
    pub fn build(self) -> Aggregator {
        assert!(
            self.aberrancy_rate.is_finite() && self.aberrancy_rate >= 0.0,
            "called `AggregatorBuilder::build` with an invalid aberrancy rate: {}",
            self.aberrancy_rate
        );
        Aggregator {
            aberrancy_rate: self.aberrancy_rate,
            angle_model: ApproachAngleModel::from_degrees(self.approach_angle_std_dev_deg),
            protection_policy: self.protection_policy,
            execution_mode: self.execution_mode,
        }
    }
}

/// The result of a successful aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOutcome {
    report: CollisionReport,
    statistics: AggregationStatistics,
}

impl AggregationOutcome {
    #[inline]
    pub fn report(&self) -> &CollisionReport {
        &self.report
    }

    #[inline]
    pub fn statistics(&self) -> &AggregationStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_report(self) -> CollisionReport {
        self.report
    }
}

/// The estimate of one bridge plus what the run needs to report about it.
#[derive(Debug, Clone)]
struct BridgeRun {
    estimate: CollisionEstimate,
    anomalies: Vec<ProtectionAnomaly>,
    piers_projected: usize,
    protection_factors: usize,
}

/// Combines pier projection, geometric probability and protection factors
/// into per-bridge collision estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregator {
    aberrancy_rate: f64,
    angle_model: ApproachAngleModel,
    protection_policy: ProtectionPolicy,
    execution_mode: ExecutionMode,
}

impl Default for Aggregator {
    fn default() -> Self {
        AggregatorBuilder::default().build()
    }
}

impl Aggregator {
    #[inline]
    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::new()
    }

    #[inline]
    pub fn aberrancy_rate(&self) -> f64 {
        self.aberrancy_rate
    }

    #[inline]
    pub fn angle_model(&self) -> &ApproachAngleModel {
        &self.angle_model
    }

    #[inline]
    pub fn protection_policy(&self) -> ProtectionPolicy {
        self.protection_policy
    }

    #[inline]
    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    /// Estimates every bridge of `dataset`.
    ///
    /// # Errors
    ///
    /// Stops at the first bridge, in registry order, whose geometry cannot be
    /// evaluated and returns its `EstimationError`. Monitors receive
    /// `on_abort` instead of `on_exit_run` in that case.
    pub fn estimate<M>(
        &self,
        dataset: &Dataset,
        monitor: &mut M,
    ) -> Result<AggregationOutcome, EstimationError>
    where
        M: AggregationMonitor + ?Sized,
    {
        let start = Instant::now();
        let mut statistics = AggregationStatistics::default();
        statistics.set_length_classes(dataset.num_length_classes());
        monitor.on_enter_run(dataset, &statistics);

        let num_bridges = dataset.num_bridges();
        let mut estimates = Vec::with_capacity(num_bridges);

        match self.execution_mode {
            ExecutionMode::Sequential => {
                for bridge_index in BridgeIndex::range(num_bridges) {
                    let run = self.run_bridge(dataset, bridge_index);
                    self.absorb(dataset, run, &mut estimates, &mut statistics, start, monitor)?;
                }
            }
            ExecutionMode::Parallel => {
                let runs: Vec<Result<BridgeRun, EstimationError>> = (0..num_bridges)
                    .into_par_iter()
                    .map(|b| self.run_bridge(dataset, BridgeIndex::new(b)))
                    .collect();
                for run in runs {
                    self.absorb(dataset, run, &mut estimates, &mut statistics, start, monitor)?;
                }
            }
        }

        statistics.set_total_time(start.elapsed());
        let report = CollisionReport::new(estimates);
        monitor.on_exit_run(&report, &statistics);

        Ok(AggregationOutcome { report, statistics })
    }

    /// Estimates a single bridge.
    ///
    /// # Panics
    ///
    /// Panics if `bridge_index` is out of bounds.
    pub fn estimate_bridge(
        &self,
        dataset: &Dataset,
        bridge_index: BridgeIndex,
    ) -> Result<CollisionEstimate, EstimationError> {
        self.run_bridge(dataset, bridge_index).map(|run| run.estimate)
    }

    /// Folds one bridge run into the statistics and notifies the monitor.
    fn absorb<M>(
        &self,
        dataset: &Dataset,
        run: Result<BridgeRun, EstimationError>,
        estimates: &mut Vec<CollisionEstimate>,
        statistics: &mut AggregationStatistics,
        start: Instant,
        monitor: &mut M,
    ) -> Result<(), EstimationError>
    where
        M: AggregationMonitor + ?Sized,
    {
        let run = match run {
            Ok(run) => run,
            Err(error) => {
                statistics.set_total_time(start.elapsed());
                monitor.on_abort(&error, statistics);
                return Err(error);
            }
        };

        let bridge = dataset.bridge(run.estimate.bridge());
        statistics.on_piers_projected(run.piers_projected);
        statistics.on_contributions_evaluated(run.estimate.contributions().len());
        statistics.on_protection_factors_evaluated(run.protection_factors);
        for anomaly in &run.anomalies {
            statistics.on_protection_factor_out_of_range();
            monitor.on_protection_factor_out_of_range(bridge, anomaly, statistics);
        }
        if run.estimate.return_period().is_undefined() {
            statistics.on_undefined_return_period();
        }
        statistics.on_bridge_estimated();
        monitor.on_bridge_estimated(bridge, &run.estimate, statistics);

        estimates.push(run.estimate);
        Ok(())
    }

    fn run_bridge(
        &self,
        dataset: &Dataset,
        bridge_index: BridgeIndex,
    ) -> Result<BridgeRun, EstimationError> {
        let bridge = dataset.bridge(bridge_index);
        let piers = dataset.exposed_piers(bridge_index);
        let structures = dataset.protective_structures(bridge_index);
        let num_classes = dataset.num_length_classes();

        // Positions depend on the pier only; project once per pier.
        let positions = piers
            .iter()
            .enumerate()
            .map(|(p, pier)| {
                normalized_pier_position(bridge.start, bridge.end, pier.center).map_err(|fault| {
                    EstimationError::DegenerateGeometry {
                        bridge: bridge.name.clone(),
                        pier: PierIndex::new(p),
                        fault,
                    }
                })
            })
            .collect::<Result<Vec<f64>, EstimationError>>()?;

        let mut contributions = Vec::with_capacity(num_classes * piers.len());
        let mut anomalies = Vec::new();
        let mut protection_factors = 0;

        for class_index in LengthClassIndex::range(num_classes) {
            let stat = dataset.vessel_class_stat(bridge_index, class_index);
            let track = VesselTrack::new(
                bridge.waterway_length,
                bridge.lane_centerline,
                dataset.vessel_length(class_index),
            );

            for (p, (pier, &position)) in piers.iter().zip(positions.iter()).enumerate() {
                let pier_index = PierIndex::new(p);
                let geometric_probability = track.geometric_probability(
                    position,
                    pier.width,
                    stat.mean_width,
                    bridge.geometry,
                );
                let unprotected =
                    stat.mean_annual_traffic * self.aberrancy_rate * geometric_probability;

                let (protection_factor, protected) = if bridge.has_protection() {
                    let factor = self
                        .angle_model
                        .protection_factor(pier_index, structures, stat.mean_width)
                        .map_err(|fault| EstimationError::InvalidGeometry {
                            bridge: bridge.name.clone(),
                            pier: pier_index,
                            length_class: class_index,
                            fault,
                        })?;
                    protection_factors += 1;
                    anomalies.extend(ProtectionAnomaly::detect(
                        pier_index,
                        class_index,
                        factor,
                        self.protection_policy,
                    ));
                    let applied = self.protection_policy.apply(factor);
                    (applied, unprotected * applied)
                } else {
                    (1.0, unprotected)
                };

                contributions.push(Contribution {
                    pier: pier_index,
                    length_class: class_index,
                    normalized_position: position,
                    geometric_probability,
                    protection_factor,
                    unprotected,
                    protected,
                });
            }
        }

        Ok(BridgeRun {
            estimate: CollisionEstimate::from_contributions(
                bridge_index,
                bridge.name.clone(),
                contributions,
            ),
            anomalies,
            piers_projected: piers.len(),
            protection_factors,
        })
    }
}

impl std::fmt::Display for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Aggregator(aberrancy_rate: {:e}, {}, policy: {}, mode: {})",
            self.aberrancy_rate, self.angle_model, self.protection_policy, self.execution_mode
        )
    }
}
