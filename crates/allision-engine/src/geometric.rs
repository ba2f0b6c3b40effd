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

//! Geometric probability of a vessel track crossing a pier's impact zone.
//!
//! Aberrant vessel tracks cross the waterway at a position that follows a
//! normal distribution centered on the shipping lane (`centerline * W`) with
//! a standard deviation equal to the vessel length. The impact zone of a pier
//! is as wide as the pier plus the vessel.

use allision_core::math::normal::Normal;
use allision_model::model::BridgeGeometry;

/// The cross-waterway track distribution of one vessel class at one bridge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselTrack {
    waterway_length: f64,
    distribution: Normal,
}

impl VesselTrack {
    /// Creates the track distribution `N(lane_centerline * waterway_length, vessel_length)`.
    ///
    /// # Panics
    ///
    /// Panics if `vessel_length` is not strictly positive and finite, or the
    /// lane center is not finite.
    #[inline]
    pub fn new(waterway_length: f64, lane_centerline: f64, vessel_length: f64) -> Self {
        Self {
            waterway_length,
            distribution: Normal::new(waterway_length * lane_centerline, vessel_length),
        }
    }

    #[inline]
    pub fn distribution(&self) -> &Normal {
        &self.distribution
    }

    /// Returns the probability that a track crosses the impact zone of a pier
    /// at normalized position `position`.
    ///
    /// With `BridgeGeometry::Standard` the zone extends half its width on
    /// either side of the pier. With `BridgeGeometry::Edge` the zone extends
    /// its full width, on one side only: towards larger positions for a pier
    /// in the lower half of the span (`position < 0.5`), towards smaller
    /// positions otherwise.
    ///
    /// The result is not clamped.
    pub fn geometric_probability(
        &self,
        position: f64,
        pier_width: f64,
        vessel_width: f64,
        geometry: BridgeGeometry,
    ) -> f64 {
        let at = self.waterway_length * position;
        let zone_width = pier_width + vessel_width;
        let d = &self.distribution;
        match geometry {
            BridgeGeometry::Standard => {
                let half_width = 0.5 * zone_width;
                d.cdf(at + half_width) - d.cdf(at - half_width)
            }
            BridgeGeometry::Edge => {
                if position < 0.5 {
                    d.cdf(at + zone_width) - d.cdf(at)
                } else {
                    d.cdf(at) - d.cdf(at - zone_width)
                }
            }
        }
    }
}

/// Returns the geometric probability for a single (pier, vessel class) pair.
///
/// See `VesselTrack::geometric_probability`.
///
/// # Examples
///
/// ```rust
/// # use allision_engine::geometric::geometric_probability;
/// # use allision_model::model::BridgeGeometry;
/// let p = geometric_probability(0.5, 1000.0, 20.0, 165.0, 30.0, 0.5, BridgeGeometry::Standard);
/// assert!(p > 0.11 && p < 0.13);
/// ```
#[inline]
pub fn geometric_probability(
    position: f64,
    waterway_length: f64,
    pier_width: f64,
    vessel_length: f64,
    vessel_width: f64,
    lane_centerline: f64,
    geometry: BridgeGeometry,
) -> f64 {
    VesselTrack::new(waterway_length, lane_centerline, vessel_length).geometric_probability(
        position,
        pier_width,
        vessel_width,
        geometry,
    )
}
