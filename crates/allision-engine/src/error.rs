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

//! Estimation faults.
//!
//! The leaf functions report what is wrong with the geometry they were handed
//! (`DegenerateChord`, `InvalidProtectionGeometry`); the aggregator wraps those
//! faults into an `EstimationError` naming the bridge, pier and vessel class
//! being evaluated.

use allision_core::math::point::Point2;
use allision_model::index::{LengthClassIndex, PierIndex, StructureIndex};

/// The bridge chord has zero length, so no pier can be projected onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegenerateChord {
    pub start: Point2,
    pub end: Point2,
}

impl std::fmt::Display for DegenerateChord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bridge chord from {} to {} has zero length",
            self.start, self.end
        )
    }
}

impl std::error::Error for DegenerateChord {}

/// A protective structure whose geometry leaves the domain of the
/// approach-angle model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidProtectionGeometry {
    /// The distance between structure and pier is zero or negative.
    NonPositiveDistance {
        structure: StructureIndex,
        distance: f64,
    },
    /// `effective diameter / (2 * distance)` exceeds one, so the protection
    /// half-angle is undefined.
    AngleOutOfDomain {
        structure: StructureIndex,
        ratio: f64,
    },
}

impl InvalidProtectionGeometry {
    /// Returns the structure at fault.
    #[inline]
    pub fn structure(&self) -> StructureIndex {
        match self {
            Self::NonPositiveDistance { structure, .. } => *structure,
            Self::AngleOutOfDomain { structure, .. } => *structure,
        }
    }
}

impl std::fmt::Display for InvalidProtectionGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveDistance {
                structure,
                distance,
            } => write!(
                f,
                "{} stands at non-positive distance {} from its pier",
                structure, distance
            ),
            Self::AngleOutOfDomain { structure, ratio } => write!(
                f,
                "{} has effective diameter / (2 * distance) = {} > 1",
                structure, ratio
            ),
        }
    }
}

impl std::error::Error for InvalidProtectionGeometry {}

/// The error type for a collision estimation run.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// The bridge's bank endpoints coincide.
    DegenerateGeometry {
        bridge: String,
        pier: PierIndex,
        fault: DegenerateChord,
    },
    /// A protective structure of the bridge cannot be evaluated.
    InvalidGeometry {
        bridge: String,
        pier: PierIndex,
        length_class: LengthClassIndex,
        fault: InvalidProtectionGeometry,
    },
}

impl EstimationError {
    /// Returns the name of the bridge whose computation was aborted.
    pub fn bridge(&self) -> &str {
        match self {
            Self::DegenerateGeometry { bridge, .. } => bridge,
            Self::InvalidGeometry { bridge, .. } => bridge,
        }
    }

    /// Returns the pier being evaluated when the fault occurred.
    pub fn pier(&self) -> PierIndex {
        match self {
            Self::DegenerateGeometry { pier, .. } => *pier,
            Self::InvalidGeometry { pier, .. } => *pier,
        }
    }
}

impl std::fmt::Display for EstimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateGeometry { bridge, pier, fault } => write!(
                f,
                "Degenerate geometry at bridge '{}', {}: {}",
                bridge, pier, fault
            ),
            Self::InvalidGeometry {
                bridge,
                pier,
                length_class,
                fault,
            } => write!(
                f,
                "Invalid protection geometry at bridge '{}', {}, {}: {}",
                bridge, pier, length_class, fault
            ),
        }
    }
}

impl std::error::Error for EstimationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DegenerateGeometry { fault, .. } => Some(fault),
            Self::InvalidGeometry { fault, .. } => Some(fault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = EstimationError::InvalidGeometry {
            bridge: "OUTERBRIDGE CROSSING".to_string(),
            pier: PierIndex::new(1),
            length_class: LengthClassIndex::new(4),
            fault: InvalidProtectionGeometry::AngleOutOfDomain {
                structure: StructureIndex::new(0),
                ratio: 1.5,
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid protection geometry at bridge 'OUTERBRIDGE CROSSING', PierIndex(1), \
             LengthClassIndex(4): StructureIndex(0) has effective diameter / (2 * distance) = 1.5 > 1"
        );
        assert_eq!(err.bridge(), "OUTERBRIDGE CROSSING");
        assert_eq!(err.pier(), PierIndex::new(1));
    }

    #[test]
    fn test_source_is_leaf_fault() {
        use std::error::Error;

        let err = EstimationError::DegenerateGeometry {
            bridge: "A".to_string(),
            pier: PierIndex::new(0),
            fault: DegenerateChord {
                start: Point2::new(1.0, 2.0),
                end: Point2::new(1.0, 2.0),
            },
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("bridge chord from (1, 2) to (1, 2) has zero length")
        );
    }
}
