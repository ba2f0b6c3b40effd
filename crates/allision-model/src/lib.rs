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

//! # Allision Model
//!
//! **The domain model for AASHTO vessel-collision probability studies.**
//!
//! This crate defines the static dataset a collision study runs over (bridges,
//! their piers, the dolphins protecting those piers, and per-bridge vessel
//! traffic by length class) together with the result types the estimation
//! engine produces. It is the data interchange layer between the input tables
//! and the engine in `allision_engine`.
//!
//! ## Architecture
//!
//! * **`index`**: strongly typed indices (`BridgeIndex`, `PierIndex`,
//!   `StructureIndex`, `LengthClassIndex`).
//! * **`model`**: named-field records (`Bridge`, `Pier`, `ProtectiveStructure`,
//!   `VesselClassStat`), the immutable `Dataset` and its validating `DatasetBuilder`.
//! * **`error`**: `DatasetError`, raised when a table references a row that
//!   another table lacks, or a value is out of its domain.
//! * **`loading`**: `DatasetLoader`, which reads the reference CSV layout from a
//!   directory into a validated `Dataset`.
//! * **`estimate`**: `CollisionEstimate`, `ReturnPeriod` and `CollisionReport`.
//!
//! ## Design Philosophy
//!
//! 1.  **Named fields**: every column of the input tables is mapped onto a named
//!     field as soon as it is read. Positional access stays inside the loader.
//! 2.  **Fail-Fast**: `DatasetBuilder::build` rejects incomplete or malformed data
//!     and names the bridge and row at fault, so the engine never meets a hole.

pub mod error;
pub mod estimate;
pub mod index;
pub mod loading;
pub mod model;
