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

//! Pier projection onto the bank-to-bank chord.
//!
//! A (possibly curved) bridge is represented by the straight chord joining its
//! two bank endpoints. The pier center is projected perpendicularly onto that
//! chord, and the foot of the perpendicular is expressed as a fraction of the
//! chord: `0` at `start`, `1` at `end`. The result is not clamped; piers
//! beyond the span produce values outside `[0, 1]`.

use crate::error::DegenerateChord;
use allision_core::math::point::Point2;

/// Returns the normalized position of `center` along the chord `start -> end`.
///
/// The x-coordinate of the foot of the perpendicular is obtained in closed
/// form, and the position follows from it by similar triangles. When the chord
/// is vertical (`Δx = 0`) the x-coordinate carries no information and the
/// y-coordinate, taken from the perpendicular through `center`, is used
/// instead. A horizontal chord (`Δy = 0`) always takes the x branch, so `Δy`
/// is never a divisor there.
///
/// # Errors
///
/// Returns `DegenerateChord` if `start == end`.
///
/// # Examples
///
/// ```rust
/// # use allision_core::math::point::Point2;
/// # use allision_engine::projection::normalized_pier_position;
/// let start = Point2::new(0.0, 0.0);
/// let end = Point2::new(1000.0, 0.0);
/// let p = normalized_pier_position(start, end, Point2::new(250.0, 40.0)).unwrap();
/// assert_eq!(p, 0.25);
/// ```
pub fn normalized_pier_position(
    start: Point2,
    end: Point2,
    center: Point2,
) -> Result<f64, DegenerateChord> {
    let delta = end - start;
    let length_squared = delta.norm_squared();
    if length_squared == 0.0 {
        return Err(DegenerateChord { start, end });
    }

    let projected_x = ((center.y - start.y) * delta.x * delta.y
        + center.x * (delta.x * delta.x)
        + start.x * (delta.y * delta.y))
        / length_squared;

    if delta.x == 0.0 {
        let projected_y = center.y - (projected_x - center.x) * (delta.x / delta.y);
        Ok((projected_y - start.y) / delta.y)
    } else {
        Ok((projected_x - start.x) / delta.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_midpoint_projects_to_one_half() {
        let chords = [
            (Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0)),
            (Point2::new(-3.0, 7.0), Point2::new(412.0, 95.0)),
            (Point2::new(10.0, 10.0), Point2::new(-500.0, 250.0)),
        ];
        for (start, end) in chords {
            let mid = start.midpoint(&end);
            assert_close(normalized_pier_position(start, end, mid).unwrap(), 0.5);
        }
    }

    #[test]
    fn test_endpoints_project_to_zero_and_one() {
        let start = Point2::new(12.0, -4.0);
        let end = Point2::new(640.0, 300.0);
        assert_close(normalized_pier_position(start, end, start).unwrap(), 0.0);
        assert_close(normalized_pier_position(start, end, end).unwrap(), 1.0);
    }

    #[test]
    fn test_offset_from_chord_does_not_move_foot() {
        // Chord along the diagonal; (0, 100) has its foot at (50, 50).
        let start = Point2::new(0.0, 0.0);
        let end = Point2::new(100.0, 100.0);
        assert_close(
            normalized_pier_position(start, end, Point2::new(0.0, 100.0)).unwrap(),
            0.5,
        );
    }

    #[test]
    fn test_vertical_chord_uses_y_branch() {
        let start = Point2::new(5.0, 0.0);
        let end = Point2::new(5.0, 400.0);
        let p = normalized_pier_position(start, end, Point2::new(30.0, 100.0)).unwrap();
        assert!(p.is_finite());
        assert_close(p, 0.25);
    }

    #[test]
    fn test_horizontal_chord_uses_x_branch() {
        let start = Point2::new(0.0, 3.0);
        let end = Point2::new(200.0, 3.0);
        let p = normalized_pier_position(start, end, Point2::new(150.0, -20.0)).unwrap();
        assert!(p.is_finite());
        assert_close(p, 0.75);
    }

    #[test]
    fn test_position_beyond_span_is_not_clamped() {
        let start = Point2::new(0.0, 0.0);
        let end = Point2::new(100.0, 0.0);
        assert_close(
            normalized_pier_position(start, end, Point2::new(-50.0, 0.0)).unwrap(),
            -0.5,
        );
        assert_close(
            normalized_pier_position(start, end, Point2::new(130.0, 9.0)).unwrap(),
            1.3,
        );
    }

    #[test]
    fn test_degenerate_chord() {
        let p = Point2::new(4.0, 4.0);
        assert_eq!(
            normalized_pier_position(p, p, Point2::new(0.0, 0.0)),
            Err(DegenerateChord { start: p, end: p })
        );
    }
}
