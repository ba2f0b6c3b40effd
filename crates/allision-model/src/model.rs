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

use crate::{
    error::{DatasetError, MissingData},
    index::{BridgeIndex, LengthClassIndex, PierIndex, StructureIndex},
};
use allision_core::math::point::Point2;
use rustc_hash::FxHashSet;

/// Nominal lengths of the vessel length classes of the reference dataset.
pub const NOMINAL_VESSEL_LENGTHS: [f64; 6] = [165.0, 197.5, 232.5, 262.5, 287.5, 300.0];

#[inline(always)]
fn flatten_index(
    num_length_classes: usize,
    bridge_index: BridgeIndex,
    class_index: LengthClassIndex,
) -> usize {
    bridge_index.get() * num_length_classes + class_index.get()
}

/// How the impact zone of a pier extends around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BridgeGeometry {
    /// The impact zone extends symmetrically on both sides of the pier.
    #[default]
    Standard,
    /// Piers stand at the waterway edge under a low span, so only the side of
    /// the pier facing the channel center is exposed.
    Edge,
}

impl std::fmt::Display for BridgeGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeGeometry::Standard => write!(f, "Standard"),
            BridgeGeometry::Edge => write!(f, "Edge"),
        }
    }
}

/// A bridge crossing a navigable waterway.
#[derive(Debug, Clone, PartialEq)]
pub struct Bridge {
    /// Unique name, used to join the input tables.
    pub name: String,
    /// Length of the chord joining the two bank endpoints, in the same unit as
    /// pier widths, vessel widths and vessel lengths.
    pub waterway_length: f64,
    /// Bank endpoint where the normalized position is `0`.
    pub start: Point2,
    /// Bank endpoint where the normalized position is `1`.
    pub end: Point2,
    /// Number of piers exposed to vessel collision. These are the first
    /// `exposed_piers` pier rows of the bridge.
    pub exposed_piers: usize,
    /// Number of protective structures. These are the first
    /// `protective_structures` structure rows of the bridge.
    pub protective_structures: usize,
    /// Impact-zone geometry.
    pub geometry: BridgeGeometry,
    /// Normalized span position in `[0, 1]` on which vessel tracks are centered.
    pub lane_centerline: f64,
}

impl Bridge {
    /// Returns `true` if the bridge has at least one protective structure.
    #[inline]
    pub fn has_protection(&self) -> bool {
        self.protective_structures > 0
    }
}

/// A bridge pier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pier {
    /// Center of the pier footprint.
    pub center: Point2,
    /// Width of the pier presented to an approaching vessel.
    pub width: f64,
}

impl Pier {
    #[inline]
    pub fn new(center: Point2, width: f64) -> Self {
        Self { center, width }
    }
}

/// A protective structure ("dolphin") guarding one pier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtectiveStructure {
    /// The pier this structure protects.
    pub pier: PierIndex,
    /// Distance from the pier.
    pub distance: f64,
    /// Base diameter of the structure.
    pub diameter: f64,
    /// Fraction of the vessels on an intercepted course that the structure
    /// actually stops.
    pub efficiency: f64,
}

impl ProtectiveStructure {
    #[inline]
    pub fn new(pier: PierIndex, distance: f64, diameter: f64, efficiency: f64) -> Self {
        Self {
            pier,
            distance,
            diameter,
            efficiency,
        }
    }
}

/// Traffic statistics of one vessel length class at one bridge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselClassStat {
    /// Average beam of the vessels in the class.
    pub mean_width: f64,
    /// Mean number of transits per year, averaged over the observed years.
    pub mean_annual_traffic: f64,
}

impl VesselClassStat {
    #[inline]
    pub fn new(mean_width: f64, mean_annual_traffic: f64) -> Self {
        Self {
            mean_width,
            mean_annual_traffic,
        }
    }
}

/// The immutable dataset of a collision study.
///
/// - `bridges[bridge]`: the bridge registry, in input order.
/// - `piers[bridge]`: every pier row of the bridge; the first
///   `bridges[bridge].exposed_piers` are exposed.
/// - `structures[bridge]`: every protective structure row of the bridge; the
///   first `bridges[bridge].protective_structures` are in service.
/// - `class_stats[bridge * num_length_classes + class]`: width and traffic.
/// - `vessel_lengths[class]`: the nominal length of each class.
///
/// Construction:
/// - Use `DatasetBuilder` and call `DatasetBuilder::build` to obtain a validated `Dataset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    vessel_lengths: Vec<f64>,
    bridges: Vec<Bridge>,
    piers: Vec<Vec<Pier>>,
    structures: Vec<Vec<ProtectiveStructure>>,
    class_stats: Vec<VesselClassStat>,
}

impl Dataset {
    /// Returns the number of bridges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use allision_model::{index::LengthClassIndex, model::{DatasetBuilder, VesselClassStat}};
    /// # use allision_core::math::point::Point2;
    /// let mut builder = DatasetBuilder::new(vec![200.0]);
    /// let b = builder.add_bridge("A", 500.0, Point2::new(0.0, 0.0), Point2::new(500.0, 0.0));
    /// builder.set_lane_centerline(b, 0.5);
    /// builder.set_vessel_class_stat(b, LengthClassIndex::new(0), VesselClassStat::new(20.0, 10.0));
    /// let dataset = builder.build().unwrap();
    /// assert_eq!(dataset.num_bridges(), 1);
    /// ```
    #[inline]
    pub fn num_bridges(&self) -> usize {
        self.bridges.len()
    }

    /// Returns the number of vessel length classes.
    #[inline]
    pub fn num_length_classes(&self) -> usize {
        self.vessel_lengths.len()
    }

    /// Returns the nominal vessel lengths, one per class.
    #[inline]
    pub fn vessel_lengths(&self) -> &[f64] {
        &self.vessel_lengths
    }

    /// Returns the nominal length of a vessel class.
    ///
    /// # Panics
    ///
    /// Panics if `class_index` is out of bounds.
    #[inline]
    pub fn vessel_length(&self, class_index: LengthClassIndex) -> f64 {
        let index = class_index.get();
        debug_assert!(
            index < self.num_length_classes(),
            "called `Dataset::vessel_length` with class index out of bounds: the len is {} but the index is {}",
            self.num_length_classes(),
            index
        );
        self.vessel_lengths[index]
    }

    /// Returns the bridge registry in input order.
    #[inline]
    pub fn bridges(&self) -> &[Bridge] {
        &self.bridges
    }

    /// Returns a bridge.
    ///
    /// # Panics
    ///
    /// Panics if `bridge_index` is out of bounds.
    #[inline]
    pub fn bridge(&self, bridge_index: BridgeIndex) -> &Bridge {
        let index = bridge_index.get();
        debug_assert!(
            index < self.num_bridges(),
            "called `Dataset::bridge` with bridge index out of bounds: the len is {} but the index is {}",
            self.num_bridges(),
            index
        );
        &self.bridges[index]
    }

    /// Looks up a bridge by name.
    pub fn find_bridge(&self, name: &str) -> Option<BridgeIndex> {
        self.bridges
            .iter()
            .position(|b| b.name == name)
            .map(BridgeIndex::new)
    }

    /// Returns every pier row of a bridge, exposed or not.
    #[inline]
    pub fn piers(&self, bridge_index: BridgeIndex) -> &[Pier] {
        &self.piers[bridge_index.get()]
    }

    /// Returns the exposed piers of a bridge.
    #[inline]
    pub fn exposed_piers(&self, bridge_index: BridgeIndex) -> &[Pier] {
        let b = bridge_index.get();
        &self.piers[b][..self.bridges[b].exposed_piers]
    }

    /// Returns one pier of a bridge.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn pier(&self, bridge_index: BridgeIndex, pier_index: PierIndex) -> &Pier {
        let piers = self.piers(bridge_index);
        debug_assert!(
            pier_index.get() < piers.len(),
            "called `Dataset::pier` with pier index out of bounds: the len is {} but the index is {}",
            piers.len(),
            pier_index.get()
        );
        &piers[pier_index.get()]
    }

    /// Returns the protective structures in service at a bridge.
    #[inline]
    pub fn protective_structures(&self, bridge_index: BridgeIndex) -> &[ProtectiveStructure] {
        let b = bridge_index.get();
        &self.structures[b][..self.bridges[b].protective_structures]
    }

    /// Returns one protective structure of a bridge.
    #[inline]
    pub fn protective_structure(
        &self,
        bridge_index: BridgeIndex,
        structure_index: StructureIndex,
    ) -> &ProtectiveStructure {
        &self.structures[bridge_index.get()][structure_index.get()]
    }

    /// Returns the traffic statistics of a vessel class at a bridge.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn vessel_class_stat(
        &self,
        bridge_index: BridgeIndex,
        class_index: LengthClassIndex,
    ) -> &VesselClassStat {
        debug_assert!(
            class_index.get() < self.num_length_classes(),
            "called `Dataset::vessel_class_stat` with class index out of bounds: the len is {} but the index is {}",
            self.num_length_classes(),
            class_index.get()
        );
        &self.class_stats[flatten_index(self.num_length_classes(), bridge_index, class_index)]
    }

    /// Returns the total number of exposed piers over all bridges.
    pub fn num_exposed_piers(&self) -> usize {
        self.bridges.iter().map(|b| b.exposed_piers).sum()
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dataset(num_bridges: {}, num_exposed_piers: {}, num_length_classes: {})",
            self.num_bridges(),
            self.num_exposed_piers(),
            self.num_length_classes()
        )
    }
}

#[derive(Debug, Clone)]
struct BridgeDraft {
    name: String,
    waterway_length: f64,
    start: Point2,
    end: Point2,
    geometry: BridgeGeometry,
    exposed_piers: Option<usize>,
    protective_structures: Option<usize>,
    lane_centerline: Option<f64>,
    piers: Vec<Pier>,
    structures: Vec<ProtectiveStructure>,
    class_stats: Vec<Option<VesselClassStat>>,
}

/// A builder for `Dataset` that validates every join before handing the data
/// to the engine.
///
/// # Defaults
///
/// | Field | Default | Semantics |
/// | :--- | :--- | :--- |
/// | `geometry` | `Standard` | Symmetric impact zone. |
/// | `exposed_piers` | all pier rows | Every pier added is exposed. |
/// | `protective_structures` | all structure rows | Every structure added is in service. |
/// | `lane_centerline` | unset | **Required.** `build` fails with `MissingData::LaneCenterline`. |
/// | `class_stats` | unset | **Required** per class. `build` fails with `MissingData::VesselClass`. |
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    vessel_lengths: Vec<f64>,
    bridges: Vec<BridgeDraft>,
}

impl DatasetBuilder {
    /// Creates a builder for the given nominal vessel lengths (one per class).
    pub fn new<V>(vessel_lengths: V) -> Self
    where
        V: Into<Vec<f64>>,
    {
        Self {
            vessel_lengths: vessel_lengths.into(),
            bridges: Vec::new(),
        }
    }

    /// Creates a builder for `NOMINAL_VESSEL_LENGTHS`.
    pub fn with_nominal_vessel_lengths() -> Self {
        Self::new(NOMINAL_VESSEL_LENGTHS.to_vec())
    }

    /// Returns the number of bridges added so far.
    #[inline]
    pub fn num_bridges(&self) -> usize {
        self.bridges.len()
    }

    /// Returns the number of vessel length classes.
    #[inline]
    pub fn num_length_classes(&self) -> usize {
        self.vessel_lengths.len()
    }

    #[inline]
    fn draft_mut(&mut self, bridge_index: BridgeIndex, caller: &str) -> &mut BridgeDraft {
        let index = bridge_index.get();
        debug_assert!(
            index < self.bridges.len(),
            "called `DatasetBuilder::{}` with bridge index out of bounds: the len is {} but the index is {}",
            caller,
            self.bridges.len(),
            index
        );
        &mut self.bridges[index]
    }

    /// Adds a bridge with its bank endpoints and returns its index.
    pub fn add_bridge<S>(
        &mut self,
        name: S,
        waterway_length: f64,
        start: Point2,
        end: Point2,
    ) -> BridgeIndex
    where
        S: Into<String>,
    {
        let index = BridgeIndex::new(self.bridges.len());
        self.bridges.push(BridgeDraft {
            name: name.into(),
            waterway_length,
            start,
            end,
            geometry: BridgeGeometry::Standard,
            exposed_piers: None,
            protective_structures: None,
            lane_centerline: None,
            piers: Vec::new(),
            structures: Vec::new(),
            class_stats: vec![None; self.vessel_lengths.len()],
        });
        index
    }

    /// Sets the impact-zone geometry of a bridge.
    #[inline]
    pub fn set_bridge_geometry(
        &mut self,
        bridge_index: BridgeIndex,
        geometry: BridgeGeometry,
    ) -> &mut Self {
        self.draft_mut(bridge_index, "set_bridge_geometry").geometry = geometry;
        self
    }

    /// Declares how many of the bridge's pier rows are exposed.
    #[inline]
    pub fn set_exposed_pier_count(&mut self, bridge_index: BridgeIndex, count: usize) -> &mut Self {
        self.draft_mut(bridge_index, "set_exposed_pier_count")
            .exposed_piers = Some(count);
        self
    }

    /// Declares how many of the bridge's structure rows are in service.
    #[inline]
    pub fn set_protective_structure_count(
        &mut self,
        bridge_index: BridgeIndex,
        count: usize,
    ) -> &mut Self {
        self.draft_mut(bridge_index, "set_protective_structure_count")
            .protective_structures = Some(count);
        self
    }

    /// Sets the shipping-lane centerline of a bridge.
    #[inline]
    pub fn set_lane_centerline(&mut self, bridge_index: BridgeIndex, centerline: f64) -> &mut Self {
        self.draft_mut(bridge_index, "set_lane_centerline")
            .lane_centerline = Some(centerline);
        self
    }

    /// Appends a pier row to a bridge and returns its index.
    #[inline]
    pub fn add_pier(&mut self, bridge_index: BridgeIndex, pier: Pier) -> PierIndex {
        let draft = self.draft_mut(bridge_index, "add_pier");
        draft.piers.push(pier);
        PierIndex::new(draft.piers.len() - 1)
    }

    /// Appends a protective structure row to a bridge and returns its index.
    #[inline]
    pub fn add_protective_structure(
        &mut self,
        bridge_index: BridgeIndex,
        structure: ProtectiveStructure,
    ) -> StructureIndex {
        let draft = self.draft_mut(bridge_index, "add_protective_structure");
        draft.structures.push(structure);
        StructureIndex::new(draft.structures.len() - 1)
    }

    /// Sets the width and traffic statistic of a vessel class at a bridge.
    ///
    /// # Panics
    ///
    /// Panics if `class_index` is not in `0..num_length_classes()`.
    #[inline]
    pub fn set_vessel_class_stat(
        &mut self,
        bridge_index: BridgeIndex,
        class_index: LengthClassIndex,
        stat: VesselClassStat,
    ) -> &mut Self {
        let num_classes = self.vessel_lengths.len();
        let draft = self.draft_mut(bridge_index, "set_vessel_class_stat");
        assert!(
            class_index.get() < num_classes,
            "called `DatasetBuilder::set_vessel_class_stat` with class index out of bounds: the len is {} but the index is {}",
            num_classes,
            class_index.get()
        );
        draft.class_stats[class_index.get()] = Some(stat);
        self
    }

    /// Validates the collected rows and builds the `Dataset`.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::MissingData` when a declared count exceeds the rows
    /// provided, a structure references a pier without a row, a class statistic
    /// or a centerline is absent; `DatasetError::InvalidValue` when a value leaves
    /// its domain; `DatasetError::DuplicateBridge` when two bridges share a name.
    pub fn build(self) -> Result<Dataset, DatasetError> {
        if self.vessel_lengths.is_empty() {
            return Err(DatasetError::NoLengthClasses);
        }
        for (c, &length) in self.vessel_lengths.iter().enumerate() {
            if !(length.is_finite() && length > 0.0) {
                return Err(DatasetError::InvalidValue {
                    bridge: None,
                    field: format!("vessel length class {}", c),
                    value: length,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for draft in &self.bridges {
            if !seen.insert(draft.name.as_str()) {
                return Err(DatasetError::DuplicateBridge(draft.name.clone()));
            }
        }

        let num_bridges = self.bridges.len();
        let num_classes = self.vessel_lengths.len();
        let mut bridges = Vec::with_capacity(num_bridges);
        let mut piers = Vec::with_capacity(num_bridges);
        let mut structures = Vec::with_capacity(num_bridges);
        let mut class_stats = Vec::with_capacity(num_bridges * num_classes);

        for draft in self.bridges {
            let bridge = validate_bridge(&draft)?;
            for (c, stat) in draft.class_stats.iter().enumerate() {
                let stat = stat.ok_or_else(|| DatasetError::MissingData {
                    bridge: draft.name.clone(),
                    missing: MissingData::VesselClass(LengthClassIndex::new(c)),
                })?;
                check_non_negative(&draft.name, || format!("class {} mean width", c), stat.mean_width)?;
                check_non_negative(
                    &draft.name,
                    || format!("class {} mean annual traffic", c),
                    stat.mean_annual_traffic,
                )?;
                class_stats.push(stat);
            }
            bridges.push(bridge);
            piers.push(draft.piers);
            structures.push(draft.structures);
        }

        Ok(Dataset {
            vessel_lengths: self.vessel_lengths,
            bridges,
            piers,
            structures,
            class_stats,
        })
    }
}

fn invalid(bridge: &str, field: String, value: f64) -> DatasetError {
    DatasetError::InvalidValue {
        bridge: Some(bridge.to_string()),
        field,
        value,
    }
}

fn check_finite<F>(bridge: &str, field: F, value: f64) -> Result<(), DatasetError>
where
    F: FnOnce() -> String,
{
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(bridge, field(), value))
    }
}

fn check_non_negative<F>(bridge: &str, field: F, value: f64) -> Result<(), DatasetError>
where
    F: FnOnce() -> String,
{
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(bridge, field(), value))
    }
}

fn check_unit<F>(bridge: &str, field: F, value: f64) -> Result<(), DatasetError>
where
    F: FnOnce() -> String,
{
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(bridge, field(), value))
    }
}

fn validate_bridge(draft: &BridgeDraft) -> Result<Bridge, DatasetError> {
    let name = draft.name.as_str();

    if !(draft.waterway_length.is_finite() && draft.waterway_length > 0.0) {
        return Err(invalid(name, "waterway length".to_string(), draft.waterway_length));
    }
    check_finite(name, || "start.x".to_string(), draft.start.x)?;
    check_finite(name, || "start.y".to_string(), draft.start.y)?;
    check_finite(name, || "end.x".to_string(), draft.end.x)?;
    check_finite(name, || "end.y".to_string(), draft.end.y)?;

    let exposed_piers = draft.exposed_piers.unwrap_or(draft.piers.len());
    if exposed_piers > draft.piers.len() {
        return Err(DatasetError::MissingData {
            bridge: draft.name.clone(),
            missing: MissingData::Pier(PierIndex::new(draft.piers.len())),
        });
    }
    for (p, pier) in draft.piers.iter().enumerate() {
        check_finite(name, || format!("pier {} center.x", p), pier.center.x)?;
        check_finite(name, || format!("pier {} center.y", p), pier.center.y)?;
        check_non_negative(name, || format!("pier {} width", p), pier.width)?;
    }

    let protective_structures = draft
        .protective_structures
        .unwrap_or(draft.structures.len());
    if protective_structures > draft.structures.len() {
        return Err(DatasetError::MissingData {
            bridge: draft.name.clone(),
            missing: MissingData::ProtectiveStructure(StructureIndex::new(draft.structures.len())),
        });
    }
    for (s, structure) in draft.structures[..protective_structures].iter().enumerate() {
        if structure.pier.get() >= draft.piers.len() {
            return Err(DatasetError::MissingData {
                bridge: draft.name.clone(),
                missing: MissingData::Pier(structure.pier),
            });
        }
        check_finite(name, || format!("structure {} distance", s), structure.distance)?;
        check_non_negative(name, || format!("structure {} diameter", s), structure.diameter)?;
        check_unit(name, || format!("structure {} efficiency", s), structure.efficiency)?;
    }

    let lane_centerline = draft.lane_centerline.ok_or_else(|| DatasetError::MissingData {
        bridge: draft.name.clone(),
        missing: MissingData::LaneCenterline,
    })?;
    check_unit(name, || "lane centerline".to_string(), lane_centerline)?;

    Ok(Bridge {
        name: draft.name.clone(),
        waterway_length: draft.waterway_length,
        start: draft.start,
        end: draft.end,
        exposed_piers,
        protective_structures,
        geometry: draft.geometry,
        lane_centerline,
    })
}

impl std::fmt::Display for DatasetBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DatasetBuilder(num_bridges: {}, num_length_classes: {})",
            self.num_bridges(),
            self.num_length_classes()
        )
    }
}
