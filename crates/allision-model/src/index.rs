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

use allision_core::utils::index::{TypedIndex, TypedIndexTag};

/// A tag type for bridge indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BridgeIndexTag;

impl TypedIndexTag for BridgeIndexTag {
    const NAME: &'static str = "BridgeIndex";
}

/// A typed index into the bridge registry.
pub type BridgeIndex = TypedIndex<BridgeIndexTag>;

/// A tag type for pier indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PierIndexTag;

impl TypedIndexTag for PierIndexTag {
    const NAME: &'static str = "PierIndex";
}

/// A typed index for the piers of one bridge.
pub type PierIndex = TypedIndex<PierIndexTag>;

/// A tag type for protective structure indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StructureIndexTag;

impl TypedIndexTag for StructureIndexTag {
    const NAME: &'static str = "StructureIndex";
}

/// A typed index for the protective structures (dolphins) of one bridge.
pub type StructureIndex = TypedIndex<StructureIndexTag>;

/// A tag type for vessel length class indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LengthClassIndexTag;

impl TypedIndexTag for LengthClassIndexTag {
    const NAME: &'static str = "LengthClassIndex";
}

/// A typed index for the nominal vessel length classes.
pub type LengthClassIndex = TypedIndex<LengthClassIndexTag>;
