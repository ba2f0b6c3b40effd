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

//! Result types of a collision study.
//!
//! A `CollisionEstimate` holds the totals of one bridge together with the
//! per-(pier, class) contributions that make them up; a `CollisionReport`
//! collects the estimates of every bridge in registry order.

use crate::index::{BridgeIndex, LengthClassIndex, PierIndex};

/// The expected number of years between collisions at a bridge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturnPeriod {
    /// `1 / annual probability`.
    Years(f64),
    /// The annual probability is exactly zero, so no return period exists.
    Undefined,
}

impl ReturnPeriod {
    /// Derives the return period from an annual collision probability.
    ///
    /// A probability of exactly zero maps to `ReturnPeriod::Undefined` rather
    /// than to an infinite number of years.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use allision_model::estimate::ReturnPeriod;
    /// assert_eq!(ReturnPeriod::from_annual_probability(0.01), ReturnPeriod::Years(100.0));
    /// assert_eq!(ReturnPeriod::from_annual_probability(0.0), ReturnPeriod::Undefined);
    /// ```
    #[inline]
    pub fn from_annual_probability(probability: f64) -> Self {
        if probability == 0.0 {
            ReturnPeriod::Undefined
        } else {
            ReturnPeriod::Years(1.0 / probability)
        }
    }

    /// Returns the number of years, or `None` if undefined.
    #[inline]
    pub fn years(&self) -> Option<f64> {
        match self {
            ReturnPeriod::Years(y) => Some(*y),
            ReturnPeriod::Undefined => None,
        }
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, ReturnPeriod::Undefined)
    }
}

impl std::fmt::Display for ReturnPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReturnPeriod::Years(y) => write!(f, "{:.1} years", y),
            ReturnPeriod::Undefined => write!(f, "undefined"),
        }
    }
}

/// The contribution of one (pier, vessel class) pair to a bridge's totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub pier: PierIndex,
    pub length_class: LengthClassIndex,
    /// Position of the pier along the bank-to-bank chord.
    pub normalized_position: f64,
    /// Probability that an aberrant track of this class crosses the impact zone.
    pub geometric_probability: f64,
    /// Attenuation applied by protective structures; `1` when unprotected.
    pub protection_factor: f64,
    /// Annual probability without protection.
    pub unprotected: f64,
    /// Annual probability after protection.
    pub protected: f64,
}

/// The collision estimate of one bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEstimate {
    bridge: BridgeIndex,
    name: String,
    unprotected: f64,
    protected: f64,
    return_period: ReturnPeriod,
    contributions: Vec<Contribution>,
}

impl CollisionEstimate {
    /// Builds the estimate by summing the contributions in the order given.
    pub fn from_contributions<S>(
        bridge: BridgeIndex,
        name: S,
        contributions: Vec<Contribution>,
    ) -> Self
    where
        S: Into<String>,
    {
        let mut unprotected = 0.0;
        let mut protected = 0.0;
        for c in &contributions {
            unprotected += c.unprotected;
            protected += c.protected;
        }
        Self {
            bridge,
            name: name.into(),
            unprotected,
            protected,
            return_period: ReturnPeriod::from_annual_probability(protected),
            contributions,
        }
    }

    #[inline]
    pub fn bridge(&self) -> BridgeIndex {
        self.bridge
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Annual collision probability ignoring protective structures.
    #[inline]
    pub fn unprotected(&self) -> f64 {
        self.unprotected
    }

    /// Annual collision probability with protective structures applied.
    #[inline]
    pub fn protected(&self) -> f64 {
        self.protected
    }

    #[inline]
    pub fn return_period(&self) -> ReturnPeriod {
        self.return_period
    }

    /// The (pier, class) contributions, class-major and pier-minor.
    #[inline]
    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }
}

impl std::fmt::Display for CollisionEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: unprotected = {:.6e}, protected = {:.6e}, return period = {}",
            self.name, self.unprotected, self.protected, self.return_period
        )
    }
}

/// The estimates of every bridge of a dataset, in registry order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollisionReport {
    estimates: Vec<CollisionEstimate>,
}

impl CollisionReport {
    /// Creates a report from estimates already in registry order.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the estimates are not ordered by bridge index.
    pub fn new(estimates: Vec<CollisionEstimate>) -> Self {
        debug_assert!(
            estimates
                .iter()
                .enumerate()
                .all(|(i, e)| e.bridge().get() == i),
            "called `CollisionReport::new` with estimates out of registry order"
        );
        Self { estimates }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, CollisionEstimate> {
        self.estimates.iter()
    }

    #[inline]
    pub fn get(&self, bridge_index: BridgeIndex) -> Option<&CollisionEstimate> {
        self.estimates.get(bridge_index.get())
    }

    pub fn by_name(&self, name: &str) -> Option<&CollisionEstimate> {
        self.estimates.iter().find(|e| e.name() == name)
    }

    /// Sum of the protected probabilities over all bridges.
    pub fn total_protected(&self) -> f64 {
        self.estimates.iter().map(|e| e.protected()).sum()
    }
}

impl<'a> IntoIterator for &'a CollisionReport {
    type Item = &'a CollisionEstimate;
    type IntoIter = std::slice::Iter<'a, CollisionEstimate>;

    fn into_iter(self) -> Self::IntoIter {
        self.estimates.iter()
    }
}

impl std::fmt::Display for CollisionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for estimate in &self.estimates {
            writeln!(f, "{}", estimate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(pier: usize, class: usize, unprotected: f64, factor: f64) -> Contribution {
        Contribution {
            pier: PierIndex::new(pier),
            length_class: LengthClassIndex::new(class),
            normalized_position: 0.5,
            geometric_probability: 0.1,
            protection_factor: factor,
            unprotected,
            protected: unprotected * factor,
        }
    }

    #[test]
    fn test_return_period_sentinel() {
        assert!(ReturnPeriod::from_annual_probability(0.0).is_undefined());
        assert!(ReturnPeriod::from_annual_probability(-0.0).is_undefined());
        assert_eq!(ReturnPeriod::from_annual_probability(0.25).years(), Some(4.0));
        assert_eq!(ReturnPeriod::Undefined.years(), None);
        assert_eq!(ReturnPeriod::Undefined.to_string(), "undefined");
        assert_eq!(ReturnPeriod::Years(12.34).to_string(), "12.3 years");
    }

    #[test]
    fn test_estimate_sums_contributions() {
        let est = CollisionEstimate::from_contributions(
            BridgeIndex::new(0),
            "GOETHALS",
            vec![contribution(0, 0, 0.002, 1.0), contribution(1, 0, 0.006, 0.5)],
        );
        assert_eq!(est.unprotected(), 0.008);
        assert_eq!(est.protected(), 0.005);
        assert_eq!(est.return_period(), ReturnPeriod::Years(1.0 / 0.005));
        assert_eq!(est.contributions().len(), 2);
    }

    #[test]
    fn test_empty_estimate_is_undefined() {
        let est = CollisionEstimate::from_contributions(BridgeIndex::new(0), "A", Vec::new());
        assert_eq!(est.protected(), 0.0);
        assert!(est.return_period().is_undefined());
    }

    #[test]
    fn test_report_lookup() {
        let report = CollisionReport::new(vec![
            CollisionEstimate::from_contributions(
                BridgeIndex::new(0),
                "A",
                vec![contribution(0, 0, 0.001, 1.0)],
            ),
            CollisionEstimate::from_contributions(BridgeIndex::new(1), "B", Vec::new()),
        ]);
        assert_eq!(report.len(), 2);
        assert!(!report.is_empty());
        assert_eq!(report.get(BridgeIndex::new(1)).map(|e| e.name()), Some("B"));
        assert_eq!(report.by_name("A").map(|e| e.protected()), Some(0.001));
        assert!(report.by_name("C").is_none());
        assert_eq!(report.total_protected(), 0.001);
        let names: Vec<&str> = report.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
