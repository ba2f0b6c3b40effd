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

//! # Allision Core
//!
//! Foundational numerics and indexing primitives for the Allision vessel
//! collision estimator. The higher-level model and engine crates build on the
//! building blocks collected here.
//!
//! ## Modules
//!
//! - `math`: planar points (`Point2`) and the normal distribution (`Normal`)
//!   together with double-precision `erf`/`erfc`.
//! - `utils`: phantom-tagged, strongly typed indices (`TypedIndex<T>`) that keep
//!   bridge, pier, structure and vessel-class index spaces apart.
//!
//! ## Purpose
//!
//! Collision estimation walks several nested index spaces at once (bridges,
//! their piers, the dolphins guarding those piers and the vessel length
//! classes). Typed indices turn a swapped loop variable into a compile error,
//! and a self-contained normal CDF keeps every run reproducible bit-for-bit.

pub mod math;
pub mod utils;
