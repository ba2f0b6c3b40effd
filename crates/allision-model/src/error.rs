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

//! Dataset integrity errors.
//!
//! A collision study joins several tables on the bridge name (and on the pier
//! position within a bridge). When one table references a row that another
//! lacks, or a numeric field leaves its domain, `DatasetBuilder::build` stops
//! with a `DatasetError` that names the bridge and the row at fault.

use crate::index::{LengthClassIndex, PierIndex, StructureIndex};

/// The row that a bridge references but the dataset does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingData {
    /// The bridge declares more exposed piers than it has pier rows, or a
    /// protective structure references a pier without a row.
    Pier(PierIndex),
    /// The bridge declares more protective structures than it has rows.
    ProtectiveStructure(StructureIndex),
    /// No width or traffic statistic for this length class.
    VesselClass(LengthClassIndex),
    /// No shipping-lane centerline for the bridge.
    LaneCenterline,
}

impl std::fmt::Display for MissingData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pier(p) => write!(f, "no pier row for {}", p),
            Self::ProtectiveStructure(s) => write!(f, "no protective structure row for {}", s),
            Self::VesselClass(c) => write!(f, "no vessel width/traffic statistic for {}", c),
            Self::LaneCenterline => write!(f, "no shipping-lane centerline"),
        }
    }
}

/// The error type for dataset validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// A row referenced by the bridge is absent.
    MissingData {
        /// The name of the bridge that references the row.
        bridge: String,
        /// The missing row.
        missing: MissingData,
    },
    /// A numeric field is outside its domain (non-finite, negative, or zero
    /// where a strictly positive value is required).
    InvalidValue {
        /// The bridge owning the value, or `None` for dataset-wide values
        /// such as the nominal vessel lengths.
        bridge: Option<String>,
        /// A human-readable path to the offending field, e.g. `"pier 2 width"`.
        field: String,
        /// The rejected value.
        value: f64,
    },
    /// Two bridges share a name; tables are keyed by name, so joins would be ambiguous.
    DuplicateBridge(String),
    /// The dataset defines no vessel length classes.
    NoLengthClasses,
}

impl DatasetError {
    /// Returns the name of the bridge the error refers to, if any.
    pub fn bridge(&self) -> Option<&str> {
        match self {
            Self::MissingData { bridge, .. } => Some(bridge),
            Self::InvalidValue { bridge, .. } => bridge.as_deref(),
            Self::DuplicateBridge(name) => Some(name),
            Self::NoLengthClasses => None,
        }
    }
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingData { bridge, missing } => {
                write!(f, "Missing data for bridge '{}': {}", bridge, missing)
            }
            Self::InvalidValue {
                bridge: Some(bridge),
                field,
                value,
            } => write!(
                f,
                "Invalid value for bridge '{}': {} = {}",
                bridge, field, value
            ),
            Self::InvalidValue {
                bridge: None,
                field,
                value,
            } => write!(f, "Invalid value: {} = {}", field, value),
            Self::DuplicateBridge(name) => write!(f, "Bridge '{}' is defined twice", name),
            Self::NoLengthClasses => write!(f, "The dataset defines no vessel length classes"),
        }
    }
}

impl std::error::Error for DatasetError {}
