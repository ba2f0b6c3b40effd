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

//! Protection factor of dolphins guarding a pier.
//!
//! A vessel's approach angle deviates from a head-on course following a
//! normal distribution centered at zero. A dolphin of effective diameter `D_E`
//! at distance `L` in front of the pier intercepts every course within the
//! half-angle `θ = asin(D_E / 2L)`, so it removes the share
//! `2 (CDF(θ) - CDF(0))` of the approaching vessels, scaled by its efficiency.
//! The protection factor is one minus the sum of those shares.

use crate::{
    constants::{APPROACH_ANGLE_STD_DEV_DEG, EFFECTIVE_DIAMETER_WIDTH_FACTOR},
    error::InvalidProtectionGeometry,
};
use allision_core::math::normal::Normal;
use allision_model::{
    index::{LengthClassIndex, PierIndex, StructureIndex},
    model::ProtectiveStructure,
};

/// How a protection factor outside `[0, 1]` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtectionPolicy {
    /// Apply the factor as computed, even outside `[0, 1]`.
    #[default]
    Reference,
    /// Clamp the factor into `[0, 1]` before applying it.
    Clamped,
}

impl ProtectionPolicy {
    /// Returns the factor to multiply the unprotected probability with.
    #[inline]
    pub fn apply(self, factor: f64) -> f64 {
        match self {
            ProtectionPolicy::Reference => factor,
            ProtectionPolicy::Clamped => factor.clamp(0.0, 1.0),
        }
    }
}

impl std::fmt::Display for ProtectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtectionPolicy::Reference => write!(f, "Reference"),
            ProtectionPolicy::Clamped => write!(f, "Clamped"),
        }
    }
}

/// A protection factor that fell outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtectionAnomaly {
    pub pier: PierIndex,
    pub length_class: LengthClassIndex,
    /// The factor as computed.
    pub factor: f64,
    /// The factor after the `ProtectionPolicy` was applied.
    pub applied: f64,
}

impl ProtectionAnomaly {
    /// Returns an anomaly if `factor` lies outside `[0, 1]`.
    #[inline]
    pub fn detect(
        pier: PierIndex,
        length_class: LengthClassIndex,
        factor: f64,
        policy: ProtectionPolicy,
    ) -> Option<Self> {
        if (0.0..=1.0).contains(&factor) {
            None
        } else {
            Some(Self {
                pier,
                length_class,
                factor,
                applied: policy.apply(factor),
            })
        }
    }
}

impl std::fmt::Display for ProtectionAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "protection factor {:.6} for {} / {} (applied {:.6})",
            self.factor, self.pier, self.length_class, self.applied
        )
    }
}

/// The approach-angle distribution `N(0, σ)`, with `σ` in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproachAngleModel {
    distribution: Normal,
}

impl Default for ApproachAngleModel {
    fn default() -> Self {
        Self::from_degrees(APPROACH_ANGLE_STD_DEV_DEG)
    }
}

impl ApproachAngleModel {
    /// Creates the model for a standard deviation given in degrees.
    ///
    /// # Panics
    ///
    /// Panics if `std_dev_deg` is not strictly positive and finite.
    #[inline]
    pub fn from_degrees(std_dev_deg: f64) -> Self {
        Self {
            distribution: Normal::new(0.0, std_dev_deg.to_radians()),
        }
    }

    /// Returns the standard deviation in radians.
    #[inline]
    pub fn std_dev_radians(&self) -> f64 {
        self.distribution.std_dev()
    }

    /// Returns the share of approaching vessels intercepted by one structure
    /// of effective diameter `effective_diameter` at `distance`.
    #[inline]
    fn intercepted_share(
        &self,
        structure: StructureIndex,
        effective_diameter: f64,
        distance: f64,
    ) -> Result<f64, InvalidProtectionGeometry> {
        if distance <= 0.0 {
            return Err(InvalidProtectionGeometry::NonPositiveDistance {
                structure,
                distance,
            });
        }
        let ratio = effective_diameter / (2.0 * distance);
        if ratio > 1.0 {
            return Err(InvalidProtectionGeometry::AngleOutOfDomain { structure, ratio });
        }
        let half_angle = ratio.asin();
        Ok(2.0 * (self.distribution.cdf(half_angle) - self.distribution.cdf(0.0)))
    }

    /// Returns the protection factor of `pier` for a vessel of `vessel_width`.
    ///
    /// `structures` are all protective structures of the bridge; only those
    /// referencing `pier` contribute. A pier without structures yields exactly
    /// `1`. The factor is not clamped; see `ProtectionPolicy`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProtectionGeometry` for a structure of `pier` whose
    /// distance is not positive or whose effective diameter exceeds twice its
    /// distance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use allision_engine::protection::ApproachAngleModel;
    /// # use allision_model::{index::PierIndex, model::ProtectiveStructure};
    /// let model = ApproachAngleModel::default();
    /// let dolphins = [ProtectiveStructure::new(PierIndex::new(0), 50.0, 10.0, 0.9)];
    /// assert_eq!(model.protection_factor(PierIndex::new(1), &dolphins, 30.0), Ok(1.0));
    /// let f = model.protection_factor(PierIndex::new(0), &dolphins, 30.0).unwrap();
    /// assert!(f > 0.0 && f < 1.0);
    /// ```
    pub fn protection_factor(
        &self,
        pier: PierIndex,
        structures: &[ProtectiveStructure],
        vessel_width: f64,
    ) -> Result<f64, InvalidProtectionGeometry> {
        let mut protection_fraction = 0.0;
        for (s, structure) in structures.iter().enumerate() {
            if structure.pier != pier {
                continue;
            }
            let effective_diameter =
                structure.diameter + EFFECTIVE_DIAMETER_WIDTH_FACTOR * vessel_width;
            let share = self.intercepted_share(
                StructureIndex::new(s),
                effective_diameter,
                structure.distance,
            )?;
            protection_fraction += share * structure.efficiency;
        }
        Ok(1.0 - protection_fraction)
    }
}

impl std::fmt::Display for ApproachAngleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ApproachAngleModel(std_dev: {:.1} deg)",
            self.std_dev_radians().to_degrees()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allision_core::math::normal::erf;

    fn pier(i: usize) -> PierIndex {
        PierIndex::new(i)
    }

    #[test]
    fn test_no_structures_gives_exactly_one() {
        let model = ApproachAngleModel::default();
        assert_eq!(model.protection_factor(pier(0), &[], 25.0), Ok(1.0));

        let elsewhere = [ProtectiveStructure::new(pier(3), 40.0, 10.0, 1.0)];
        assert_eq!(model.protection_factor(pier(0), &elsewhere, 25.0), Ok(1.0));
    }

    #[test]
    fn test_single_dolphin_reference_value() {
        let model = ApproachAngleModel::default();
        let dolphins = [ProtectiveStructure::new(pier(0), 50.0, 10.0, 0.9)];
        let factor = model.protection_factor(pier(0), &dolphins, 30.0).unwrap();

        // D_E = 10 + 22.5, θ = asin(0.325); 2 (CDF(θ) - 1/2) = erf(θ / (σ sqrt 2)).
        let theta = (32.5f64 / 100.0).asin();
        let sigma = 30f64.to_radians();
        let expected = 1.0 - 0.9 * erf(theta / (sigma * std::f64::consts::SQRT_2));
        assert!((factor - expected).abs() < 1e-14, "{factor} vs {expected}");
        assert!(factor > 0.0 && factor < 1.0);
    }

    #[test]
    fn test_contributions_are_additive() {
        let model = ApproachAngleModel::default();
        let one = [ProtectiveStructure::new(pier(2), 60.0, 8.0, 0.5)];
        let two = [one[0], one[0]];
        let f1 = model.protection_factor(pier(2), &one, 20.0).unwrap();
        let f2 = model.protection_factor(pier(2), &two, 20.0).unwrap();
        assert!(((1.0 - f2) - 2.0 * (1.0 - f1)).abs() < 1e-15);
    }

    #[test]
    fn test_factor_can_leave_unit_interval() {
        let model = ApproachAngleModel::default();
        // Close, fully efficient dolphins: each intercepts well over half.
        let dolphins = [
            ProtectiveStructure::new(pier(0), 12.0, 20.0, 1.0),
            ProtectiveStructure::new(pier(0), 12.0, 20.0, 1.0),
        ];
        let factor = model.protection_factor(pier(0), &dolphins, 0.0).unwrap();
        assert!(factor < 0.0);
        assert_eq!(ProtectionPolicy::Reference.apply(factor), factor);
        assert_eq!(ProtectionPolicy::Clamped.apply(factor), 0.0);
        assert_eq!(ProtectionPolicy::Clamped.apply(1.25), 1.0);
        assert_eq!(ProtectionPolicy::Clamped.apply(0.4), 0.4);

        let anomaly = ProtectionAnomaly::detect(
            pier(0),
            LengthClassIndex::new(2),
            factor,
            ProtectionPolicy::Clamped,
        )
        .expect("negative factor is an anomaly");
        assert_eq!(anomaly.applied, 0.0);
        assert!(
            ProtectionAnomaly::detect(pier(0), LengthClassIndex::new(0), 0.3, ProtectionPolicy::Reference)
                .is_none()
        );
    }

    #[test]
    fn test_invalid_geometry() {
        let model = ApproachAngleModel::default();
        let at_pier = [
            ProtectiveStructure::new(pier(1), 30.0, 5.0, 1.0),
            ProtectiveStructure::new(pier(0), 0.0, 5.0, 1.0),
        ];
        assert_eq!(
            model.protection_factor(pier(0), &at_pier, 10.0),
            Err(InvalidProtectionGeometry::NonPositiveDistance {
                structure: StructureIndex::new(1),
                distance: 0.0,
            })
        );

        let too_close = [ProtectiveStructure::new(pier(0), 10.0, 15.0, 1.0)];
        match model.protection_factor(pier(0), &too_close, 10.0) {
            Err(InvalidProtectionGeometry::AngleOutOfDomain { structure, ratio }) => {
                assert_eq!(structure, StructureIndex::new(0));
                assert_eq!(ratio, 1.125);
            }
            other => panic!("expected AngleOutOfDomain, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_standard_deviation() {
        let narrow = ApproachAngleModel::from_degrees(10.0);
        let wide = ApproachAngleModel::default();
        let dolphins = [ProtectiveStructure::new(pier(0), 80.0, 12.0, 1.0)];
        // A narrower angle distribution concentrates courses in the shadow.
        assert!(
            narrow.protection_factor(pier(0), &dolphins, 20.0).unwrap()
                < wide.protection_factor(pier(0), &dolphins, 20.0).unwrap()
        );
        assert_eq!(wide.to_string(), "ApproachAngleModel(std_dev: 30.0 deg)");
    }
}
