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

//! Allision Engine: AASHTO vessel-collision probability estimation
//!
//! Computes, for every bridge of a `allision_model::model::Dataset`, the annual
//! probability that an aberrant vessel strikes one of its piers, with and
//! without the attenuation of protective structures (AASHTO LRFD 3.14.5,
//! without the probability of collapse).
//!
//! Core flow
//! - Project each exposed pier onto the bank-to-bank chord (`projection`).
//! - Integrate the vessel track distribution over the pier's impact zone
//!   (`geometric`).
//! - Attenuate by the dolphins guarding the pier (`protection`).
//! - Accumulate per (pier, vessel class) and derive return periods
//!   (`aggregate`).
//!
//! Module map
//! - `aggregate`: `Aggregator`, its builder and execution modes.
//! - `constants`: design-code constants.
//! - `error`: leaf geometry faults and `EstimationError`.
//! - `geometric`: the vessel track distribution and geometric probability.
//! - `monitor`: run monitors (log, composite, no-op).
//! - `projection`: normalized pier position along the chord.
//! - `protection`: approach-angle model and clamping policy.
//! - `stats`: run counters and timing.

pub mod aggregate;
pub mod constants;
pub mod error;
pub mod geometric;
pub mod monitor;
pub mod projection;
pub mod protection;
pub mod stats;
