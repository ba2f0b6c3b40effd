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

use std::time::Duration;

/// Statistics collected during an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregationStatistics {
    /// Bridges whose estimate is complete.
    pub bridges_estimated: u64,
    /// Exposed piers projected onto their chord.
    pub piers_projected: u64,
    /// Vessel length classes per bridge.
    pub length_classes: u64,
    /// (pier, class) contributions evaluated.
    pub contributions_evaluated: u64,
    /// Protection factors evaluated (bridges with dolphins only).
    pub protection_factors_evaluated: u64,
    /// Protection factors that fell outside `[0, 1]`.
    pub protection_factors_out_of_range: u64,
    /// Bridges with a protected total of exactly zero.
    pub undefined_return_periods: u64,
    /// Total time spent in the run.
    pub time_total: Duration,
}

impl AggregationStatistics {
    #[inline]
    pub fn on_bridge_estimated(&mut self) {
        self.bridges_estimated = self.bridges_estimated.saturating_add(1);
    }

    #[inline]
    pub fn on_piers_projected(&mut self, count: usize) {
        self.piers_projected = self.piers_projected.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_contributions_evaluated(&mut self, count: usize) {
        self.contributions_evaluated = self.contributions_evaluated.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_protection_factors_evaluated(&mut self, count: usize) {
        self.protection_factors_evaluated = self
            .protection_factors_evaluated
            .saturating_add(count as u64);
    }

    #[inline]
    pub fn on_protection_factor_out_of_range(&mut self) {
        self.protection_factors_out_of_range =
            self.protection_factors_out_of_range.saturating_add(1);
    }

    #[inline]
    pub fn on_undefined_return_period(&mut self) {
        self.undefined_return_periods = self.undefined_return_periods.saturating_add(1);
    }

    #[inline]
    pub fn set_length_classes(&mut self, count: usize) {
        self.length_classes = count as u64;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for AggregationStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Allision Aggregation Statistics:")?;
        writeln!(f, "  Bridges estimated:       {}", self.bridges_estimated)?;
        writeln!(f, "  Piers projected:         {}", self.piers_projected)?;
        writeln!(f, "  Length classes:          {}", self.length_classes)?;
        writeln!(f, "  Contributions:           {}", self.contributions_evaluated)?;
        writeln!(f, "  Protection factors:      {}", self.protection_factors_evaluated)?;
        writeln!(f, "  Factors out of [0, 1]:   {}", self.protection_factors_out_of_range)?;
        writeln!(f, "  Undefined return periods:{}", self.undefined_return_periods)?;
        writeln!(f, "  Total time:              {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = AggregationStatistics::default();
        stats.set_length_classes(6);
        stats.on_bridge_estimated();
        stats.on_bridge_estimated();
        stats.on_piers_projected(4);
        stats.on_contributions_evaluated(24);
        stats.on_protection_factors_evaluated(24);
        stats.on_protection_factor_out_of_range();
        stats.on_undefined_return_period();

        assert_eq!(stats.bridges_estimated, 2);
        assert_eq!(stats.piers_projected, 4);
        assert_eq!(stats.length_classes, 6);
        assert_eq!(stats.contributions_evaluated, 24);
        assert_eq!(stats.protection_factors_evaluated, 24);
        assert_eq!(stats.protection_factors_out_of_range, 1);
        assert_eq!(stats.undefined_return_periods, 1);

        let text = stats.to_string();
        assert!(text.starts_with("Allision Aggregation Statistics:"));
        assert!(text.contains("Bridges estimated:       2"));
    }
}
