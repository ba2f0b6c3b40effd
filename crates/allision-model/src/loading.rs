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

//! Dataset loader for the reference table layout of a collision study.
//!
//! A study directory holds five comma-separated tables and one traffic table
//! per bridge:
//!
//! ```raw
//! bridge_parameters.csv   name, waterway_length, exposed_piers, protective_structures,
//!                         start_x, start_y, end_x, end_y
//! bridge_piers.csv        name, pier, x, y, <unused>, width
//! bridge_protections.csv  name, <unused>, pier, efficiency, <unused>, <unused>,
//!                         distance, diameter
//! Average_Widths.csv      bridge, w_1 ... w_k
//! ship_travel_lines.csv   bridge, centerline
//! traffic/<name> Counts.csv
//!                         year, n_1 ... n_k        (one row per observed year)
//! ```
//!
//! Every table starts with a header row, which is skipped. Pier rows are taken
//! in file order per bridge; the pier column of `bridge_piers.csv` is not used
//! for ordering. The pier column of `bridge_protections.csv` is the zero-based
//! position of the protected pier within its bridge. Mean annual traffic is
//! the average over the year rows of the traffic table.
//!
//! Fields may be quoted (`"a, b"`), a doubled quote inside a quoted field is a
//! literal quote, and blank lines are ignored. Errors point at the file, line
//! and column of the offending field. Once every row is mapped onto named
//! fields the result goes through `DatasetBuilder::build`, so joins that do
//! not line up are reported as `DatasetError`s.

use crate::{
    error::DatasetError,
    index::{BridgeIndex, LengthClassIndex, PierIndex},
    model::{
        BridgeGeometry, Dataset, DatasetBuilder, NOMINAL_VESSEL_LENGTHS, Pier,
        ProtectiveStructure, VesselClassStat,
    },
};
use allision_core::math::point::Point2;
use rustc_hash::FxHashMap;
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};

/// The name of the one bridge in the reference dataset whose piers stand at
/// the waterway edge.
pub const DEFAULT_EDGE_GEOMETRY_BRIDGE: &str = "BAYONNE BRIDGE (NY-NJ)";

/// The error type for the dataset loading process.
#[derive(Debug)]
pub enum LoaderError {
    /// An I/O error occurred while opening or reading a table.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A field could not be parsed into the expected type.
    Parse(ParseFieldError),
    /// A row has fewer columns than the layout requires.
    MissingColumn {
        file: String,
        line: usize,
        /// One-based column that was expected.
        column: usize,
        /// Number of columns actually present.
        found: usize,
    },
    /// A row has more columns than the layout allows.
    ExtraColumns {
        file: String,
        line: usize,
        /// Number of columns the layout defines.
        expected: usize,
        found: usize,
    },
    /// A table keyed by bridge has a second row for the same bridge.
    DuplicateRow {
        file: String,
        line: usize,
        name: String,
    },
    /// A table that must have data rows has none.
    EmptyTable { file: String },
    /// A quoted field is not closed before the end of the line.
    UnterminatedQuote { file: String, line: usize },
    /// A row refers to a bridge that `bridge_parameters.csv` does not define.
    UnknownBridge {
        file: String,
        line: usize,
        name: String,
    },
    /// The tables were read but do not form a valid dataset.
    Dataset(DatasetError),
}

/// Details about a failed field parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFieldError {
    pub file: String,
    pub line: usize,
    /// One-based column of the field.
    pub column: usize,
    /// The text that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "f64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: could not parse '{}' as type {}",
            self.file, self.line, self.column, self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseFieldError {}

impl Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::MissingColumn {
                file,
                line,
                column,
                found,
            } => write!(
                f,
                "{}:{}: expected at least {} columns, found {}",
                file, line, column, found
            ),
            Self::ExtraColumns {
                file,
                line,
                expected,
                found,
            } => write!(
                f,
                "{}:{}: expected {} columns, found {}",
                file, line, expected, found
            ),
            Self::DuplicateRow { file, line, name } => {
                write!(f, "{}:{}: second row for bridge '{}'", file, line, name)
            }
            Self::EmptyTable { file } => write!(f, "{}: table has no data rows", file),
            Self::UnterminatedQuote { file, line } => {
                write!(f, "{}:{}: unterminated quoted field", file, line)
            }
            Self::UnknownBridge { file, line, name } => {
                write!(f, "{}:{}: unknown bridge '{}'", file, line, name)
            }
            Self::Dataset(e) => write!(f, "Dataset error: {}", e),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Dataset(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseFieldError> for LoaderError {
    fn from(e: ParseFieldError) -> Self {
        Self::Parse(e)
    }
}

impl From<DatasetError> for LoaderError {
    fn from(e: DatasetError) -> Self {
        Self::Dataset(e)
    }
}

/// A configurable loader for collision-study directories.
///
/// # Configuration
/// * `bridge_parameters_file`, `piers_file`, `protections_file`, `widths_file`,
///   `centerlines_file`: table file names relative to the study directory.
/// * `traffic_dir`, `traffic_file_suffix`: the traffic table of bridge `name` is
///   `<traffic_dir>/<name><traffic_file_suffix>`.
/// * `vessel_lengths`: nominal length per class; the width and traffic tables
///   must provide one column per class. Defaults to `NOMINAL_VESSEL_LENGTHS`.
/// * `edge_geometry_bridges`: names of the bridges evaluated with
///   `BridgeGeometry::Edge`. Defaults to `DEFAULT_EDGE_GEOMETRY_BRIDGE`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetLoader {
    bridge_parameters_file: String,
    piers_file: String,
    protections_file: String,
    widths_file: String,
    centerlines_file: String,
    traffic_dir: String,
    traffic_file_suffix: String,
    vessel_lengths: Vec<f64>,
    edge_geometry_bridges: Vec<String>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            bridge_parameters_file: "bridge_parameters.csv".to_string(),
            piers_file: "bridge_piers.csv".to_string(),
            protections_file: "bridge_protections.csv".to_string(),
            widths_file: "Average_Widths.csv".to_string(),
            centerlines_file: "ship_travel_lines.csv".to_string(),
            traffic_dir: "traffic".to_string(),
            traffic_file_suffix: " Counts.csv".to_string(),
            vessel_lengths: NOMINAL_VESSEL_LENGTHS.to_vec(),
            edge_geometry_bridges: vec![DEFAULT_EDGE_GEOMETRY_BRIDGE.to_string()],
        }
    }
}

impl DatasetLoader {
    /// Creates a new `DatasetLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bridge_parameters_file<S: Into<String>>(mut self, name: S) -> Self {
        self.bridge_parameters_file = name.into();
        self
    }

    #[inline]
    pub fn piers_file<S: Into<String>>(mut self, name: S) -> Self {
        self.piers_file = name.into();
        self
    }

    #[inline]
    pub fn protections_file<S: Into<String>>(mut self, name: S) -> Self {
        self.protections_file = name.into();
        self
    }

    #[inline]
    pub fn widths_file<S: Into<String>>(mut self, name: S) -> Self {
        self.widths_file = name.into();
        self
    }

    #[inline]
    pub fn centerlines_file<S: Into<String>>(mut self, name: S) -> Self {
        self.centerlines_file = name.into();
        self
    }

    #[inline]
    pub fn traffic_dir<S: Into<String>>(mut self, dir: S) -> Self {
        self.traffic_dir = dir.into();
        self
    }

    #[inline]
    pub fn traffic_file_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.traffic_file_suffix = suffix.into();
        self
    }

    /// Sets the nominal vessel lengths, one per class.
    #[inline]
    pub fn vessel_lengths<V: Into<Vec<f64>>>(mut self, lengths: V) -> Self {
        self.vessel_lengths = lengths.into();
        self
    }

    /// Replaces the set of bridges evaluated with `BridgeGeometry::Edge`.
    #[inline]
    pub fn edge_geometry_bridges<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_geometry_bridges = names.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the number of vessel length classes the loader expects.
    #[inline]
    pub fn num_length_classes(&self) -> usize {
        self.vessel_lengths.len()
    }

    /// Loads and validates the dataset stored in `dir`.
    pub fn from_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Dataset, LoaderError> {
        let dir = dir.as_ref();
        let num_classes = self.num_length_classes();
        let mut builder = DatasetBuilder::new(self.vessel_lengths.clone());
        let mut lookup: FxHashMap<String, BridgeIndex> = FxHashMap::default();

        // Bridge registry.
        let table = Table::open(dir.join(&self.bridge_parameters_file), &self.bridge_parameters_file)?;
        for record in &table.records {
            let name = record.field(&table.file, 0)?.to_string();
            let waterway_length: f64 = record.parse(&table.file, 1)?;
            let exposed_piers: usize = record.parse(&table.file, 2)?;
            let protective_structures: usize = record.parse(&table.file, 3)?;
            let start = Point2::new(record.parse(&table.file, 4)?, record.parse(&table.file, 5)?);
            let end = Point2::new(record.parse(&table.file, 6)?, record.parse(&table.file, 7)?);

            let b = builder.add_bridge(name.clone(), waterway_length, start, end);
            builder
                .set_exposed_pier_count(b, exposed_piers)
                .set_protective_structure_count(b, protective_structures);
            if self.edge_geometry_bridges.iter().any(|e| *e == name) {
                builder.set_bridge_geometry(b, BridgeGeometry::Edge);
            }
            lookup.entry(name).or_insert(b);
        }

        // Piers.
        let table = Table::open(dir.join(&self.piers_file), &self.piers_file)?;
        for record in &table.records {
            let b = record.bridge(&table.file, &lookup)?;
            let center = Point2::new(record.parse(&table.file, 2)?, record.parse(&table.file, 3)?);
            let width: f64 = record.parse(&table.file, 5)?;
            builder.add_pier(b, Pier::new(center, width));
        }

        // Protective structures.
        let table = Table::open(dir.join(&self.protections_file), &self.protections_file)?;
        for record in &table.records {
            let b = record.bridge(&table.file, &lookup)?;
            let pier: usize = record.parse(&table.file, 2)?;
            let efficiency: f64 = record.parse(&table.file, 3)?;
            let distance: f64 = record.parse(&table.file, 6)?;
            let diameter: f64 = record.parse(&table.file, 7)?;
            builder.add_protective_structure(
                b,
                ProtectiveStructure::new(PierIndex::new(pier), distance, diameter, efficiency),
            );
        }

        // Shipping-lane centerlines, one row per bridge.
        let mut seen = vec![false; builder.num_bridges()];
        let table = Table::open(dir.join(&self.centerlines_file), &self.centerlines_file)?;
        for record in &table.records {
            let b = record.bridge(&table.file, &lookup)?;
            if std::mem::replace(&mut seen[b.get()], true) {
                return Err(record.duplicate(&table.file));
            }
            let centerline: f64 = record.parse(&table.file, 1)?;
            builder.set_lane_centerline(b, centerline);
        }

        // Mean vessel widths per class, one row per bridge.
        let mut widths: Vec<Option<Vec<f64>>> = vec![None; builder.num_bridges()];
        let table = Table::open(dir.join(&self.widths_file), &self.widths_file)?;
        for record in &table.records {
            let b = record.bridge(&table.file, &lookup)?;
            if widths[b.get()].is_some() {
                return Err(record.duplicate(&table.file));
            }
            widths[b.get()] = Some(record.parse_run(&table.file, 1, num_classes)?);
        }

        // Mean annual traffic per class. Bridges without a width row are left
        // for `build` to report.
        let traffic_dir = dir.join(&self.traffic_dir);
        for (name, &b) in ordered(&lookup) {
            let Some(class_widths) = &widths[b.get()] else {
                continue;
            };
            let file_name = format!("{}{}", name, self.traffic_file_suffix);
            let table = Table::open(traffic_dir.join(&file_name), &file_name)?;
            let traffic = table.column_means(1, num_classes)?;
            for (c, (&width, &count)) in class_widths.iter().zip(traffic.iter()).enumerate() {
                builder.set_vessel_class_stat(
                    b,
                    LengthClassIndex::new(c),
                    VesselClassStat::new(width, count),
                );
            }
        }

        Ok(builder.build()?)
    }
}

/// The lookup entries sorted by bridge index, so traffic tables are opened in
/// registry order and the first failure is deterministic.
fn ordered(lookup: &FxHashMap<String, BridgeIndex>) -> Vec<(&str, &BridgeIndex)> {
    let mut entries: Vec<(&str, &BridgeIndex)> =
        lookup.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_by_key(|(_, b)| b.get());
    entries
}

/// One data row of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Record {
    /// One-based line number in the source file.
    line: usize,
    fields: Vec<String>,
}

impl Record {
    /// Returns the field in zero-based `column`, trimmed.
    fn field(&self, file: &str, column: usize) -> Result<&str, LoaderError> {
        self.fields
            .get(column)
            .map(|s| s.trim())
            .ok_or_else(|| LoaderError::MissingColumn {
                file: file.to_string(),
                line: self.line,
                column: column + 1,
                found: self.fields.len(),
            })
    }

    fn parse<T>(&self, file: &str, column: usize) -> Result<T, LoaderError>
    where
        T: FromStr,
    {
        let token = self.field(file, column)?;
        token.parse::<T>().map_err(|_| {
            LoaderError::Parse(ParseFieldError {
                file: file.to_string(),
                line: self.line,
                column: column + 1,
                token: token.to_owned(),
                type_name: std::any::type_name::<T>(),
            })
        })
    }

    /// Parses the `count` numeric fields starting at `first`, which must end
    /// the row.
    fn parse_run(&self, file: &str, first: usize, count: usize) -> Result<Vec<f64>, LoaderError> {
        let values = (first..first + count)
            .map(|column| self.parse(file, column))
            .collect::<Result<Vec<f64>, LoaderError>>()?;
        if self.fields.len() > first + count {
            return Err(LoaderError::ExtraColumns {
                file: file.to_string(),
                line: self.line,
                expected: first + count,
                found: self.fields.len(),
            });
        }
        Ok(values)
    }

    fn duplicate(&self, file: &str) -> LoaderError {
        LoaderError::DuplicateRow {
            file: file.to_string(),
            line: self.line,
            name: self.fields.first().map_or("", |s| s.trim()).to_string(),
        }
    }

    fn bridge(
        &self,
        file: &str,
        lookup: &FxHashMap<String, BridgeIndex>,
    ) -> Result<BridgeIndex, LoaderError> {
        let name = self.field(file, 0)?;
        lookup
            .get(name)
            .copied()
            .ok_or_else(|| LoaderError::UnknownBridge {
                file: file.to_string(),
                line: self.line,
                name: name.to_string(),
            })
    }
}

/// A table with its header row removed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    file: String,
    records: Vec<Record>,
}

impl Table {
    fn open(path: PathBuf, file: &str) -> Result<Self, LoaderError> {
        let handle = match File::open(&path) {
            Ok(handle) => handle,
            Err(source) => return Err(LoaderError::Io { path, source }),
        };
        Self::read(file, BufReader::new(handle)).map_err(|e| match e {
            LoaderError::Io { source, .. } => LoaderError::Io { path, source },
            other => other,
        })
    }

    fn read<R: BufRead>(file: &str, rdr: R) -> Result<Self, LoaderError> {
        let mut reader = RecordReader::new(file, rdr);
        let mut records = Vec::new();
        // The first non-blank row is the header.
        if reader.next_record()?.is_some() {
            while let Some(record) = reader.next_record()? {
                records.push(record);
            }
        }
        Ok(Self {
            file: file.to_string(),
            records,
        })
    }

    /// Averages `count` numeric columns starting at `first` over all rows.
    fn column_means(&self, first: usize, count: usize) -> Result<Vec<f64>, LoaderError> {
        if self.records.is_empty() {
            return Err(LoaderError::EmptyTable {
                file: self.file.clone(),
            });
        }
        let mut sums = vec![0.0; count];
        for record in &self.records {
            for (sum, value) in sums
                .iter_mut()
                .zip(record.parse_run(&self.file, first, count)?)
            {
                *sum += value;
            }
        }
        let rows = self.records.len() as f64;
        Ok(sums.into_iter().map(|s| s / rows).collect())
    }
}

/// A helper to read comma-separated records, one per line, from a generic reader.
struct RecordReader<R> {
    file: String,
    rdr: R,
    buf: String,
    line: usize,
}

impl<R: BufRead> RecordReader<R> {
    #[inline]
    fn new(file: &str, rdr: R) -> Self {
        Self {
            file: file.to_string(),
            rdr,
            buf: String::new(),
            line: 0,
        }
    }

    /// Reads the next non-blank line and splits it into fields.
    fn next_record(&mut self) -> Result<Option<Record>, LoaderError> {
        loop {
            self.buf.clear();
            let n = self
                .rdr
                .read_line(&mut self.buf)
                .map_err(|source| LoaderError::Io {
                    path: PathBuf::from(&self.file),
                    source,
                })?;
            if n == 0 {
                return Ok(None);
            }
            self.line += 1;

            let mut text = self.buf.trim_end_matches(['\n', '\r']);
            if self.line == 1 {
                text = text.trim_start_matches('\u{feff}');
            }
            if text.trim().is_empty() {
                continue;
            }

            let fields = split_fields(text).ok_or_else(|| LoaderError::UnterminatedQuote {
                file: self.file.clone(),
                line: self.line,
            })?;
            return Ok(Some(Record {
                line: self.line,
                fields,
            }));
        }
    }
}

/// Splits one line into fields. Returns `None` if a quote is left open.
fn split_fields(text: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            (c, _) => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(field);
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MissingData;
    use std::fs;

    fn fields(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_plain_and_quoted_fields() {
        assert_eq!(split_fields("a,b,,c"), Some(fields(&["a", "b", "", "c"])));
        assert_eq!(
            split_fields("\"GOETHALS, NJ\",1.5"),
            Some(fields(&["GOETHALS, NJ", "1.5"]))
        );
        assert_eq!(
            split_fields("\"say \"\"hi\"\"\",2"),
            Some(fields(&["say \"hi\"", "2"]))
        );
        assert_eq!(split_fields("\"open,1"), None);
    }

    #[test]
    fn test_table_skips_header_and_blank_lines() {
        let input = "\u{feff}Name,x\r\n\nA,1\r\n   \nB,2\n";
        let table = Table::read("t.csv", input.as_bytes()).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].line, 3);
        assert_eq!(table.records[0].fields, fields(&["A", "1"]));
        assert_eq!(table.records[1].line, 5);
    }

    #[test]
    fn test_parse_error_structure() {
        let table = Table::read("t.csv", "h1,h2\nA,abc\n".as_bytes()).unwrap();
        let err = table.records[0].parse::<f64>("t.csv", 1).unwrap_err();
        match err {
            LoaderError::Parse(e) => {
                assert_eq!(e.file, "t.csv");
                assert_eq!(e.line, 2);
                assert_eq!(e.column, 2);
                assert_eq!(e.token, "abc");
                assert_eq!(e.type_name, "f64");
                assert_eq!(e.to_string(), "t.csv:2:2: could not parse 'abc' as type f64");
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_and_unterminated_quote() {
        let table = Table::read("t.csv", "h\nA,1\n".as_bytes()).unwrap();
        assert!(matches!(
            table.records[0].field("t.csv", 4),
            Err(LoaderError::MissingColumn {
                line: 2,
                column: 5,
                found: 2,
                ..
            })
        ));

        assert!(matches!(
            Table::read("t.csv", "h\n\"A,1\n".as_bytes()),
            Err(LoaderError::UnterminatedQuote { line: 2, .. })
        ));
    }

    #[test]
    fn test_column_means_average_years() {
        let input = "year,c1,c2\n2018,10,0\n2019,20,3\n2020,30,6\n";
        let table = Table::read("traffic.csv", input.as_bytes()).unwrap();
        assert_eq!(table.column_means(1, 2).unwrap(), vec![20.0, 3.0]);

        let empty = Table::read("traffic.csv", "year,c1\n".as_bytes()).unwrap();
        assert!(matches!(
            empty.column_means(1, 1),
            Err(LoaderError::EmptyTable { .. })
        ));
    }

    /// Writes a two-bridge study with two length classes into `dir`.
    fn write_study(dir: &Path) {
        fs::write(
            dir.join("bridge_parameters.csv"),
            "Name,Length,Piers,Protections,sx,sy,ex,ey\n\
             GOETHALS BRIDGE,1000,2,1,0,0,1000,0\n\
             BAYONNE BRIDGE (NY-NJ),500,2,0,0,0,0,500\n",
        )
        .unwrap();
        fs::write(
            dir.join("bridge_piers.csv"),
            "Name,Pier,x,y,z,Width\n\
             GOETHALS BRIDGE,0,250,10,0,20\n\
             GOETHALS BRIDGE,1,750,-10,0,20\n\
             BAYONNE BRIDGE (NY-NJ),0,0,5,0,15\n\
             BAYONNE BRIDGE (NY-NJ),1,0,495,0,15\n",
        )
        .unwrap();
        fs::write(
            dir.join("bridge_protections.csv"),
            "Name,Id,Pier,Efficiency,a,b,Distance,Diameter\n\
             GOETHALS BRIDGE,0,1,0.9,0,0,50,10\n",
        )
        .unwrap();
        fs::write(
            dir.join("Average_Widths.csv"),
            "Bridge,w1,w2\n\
             GOETHALS BRIDGE,25,32\n\
             BAYONNE BRIDGE (NY-NJ),24,30\n",
        )
        .unwrap();
        fs::write(
            dir.join("ship_travel_lines.csv"),
            "Bridge,Centerline\n\
             GOETHALS BRIDGE,0.45\n\
             BAYONNE BRIDGE (NY-NJ),0.5\n",
        )
        .unwrap();
        fs::create_dir(dir.join("traffic")).unwrap();
        fs::write(
            dir.join("traffic").join("GOETHALS BRIDGE Counts.csv"),
            "Year,c1,c2\n2018,100,4\n2019,200,6\n",
        )
        .unwrap();
        fs::write(
            dir.join("traffic").join("BAYONNE BRIDGE (NY-NJ) Counts.csv"),
            "Year,c1,c2\n2018,50,1\n",
        )
        .unwrap();
    }

    fn loader() -> DatasetLoader {
        DatasetLoader::new().vessel_lengths(vec![165.0, 300.0])
    }

    #[test]
    fn test_loads_and_maps_correctly() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        let ds = loader().from_dir(dir.path()).expect("study should load");

        assert_eq!(ds.num_bridges(), 2);
        assert_eq!(ds.num_length_classes(), 2);

        let g = BridgeIndex::new(0);
        let bridge = ds.bridge(g);
        assert_eq!(bridge.name, "GOETHALS BRIDGE");
        assert_eq!(bridge.waterway_length, 1000.0);
        assert_eq!(bridge.end, Point2::new(1000.0, 0.0));
        assert_eq!(bridge.geometry, BridgeGeometry::Standard);
        assert_eq!(bridge.lane_centerline, 0.45);
        assert_eq!(ds.exposed_piers(g)[1], Pier::new(Point2::new(750.0, -10.0), 20.0));
        assert_eq!(
            ds.protective_structures(g),
            &[ProtectiveStructure::new(PierIndex::new(1), 50.0, 10.0, 0.9)]
        );
        let stat = ds.vessel_class_stat(g, LengthClassIndex::new(0));
        assert_eq!(stat.mean_width, 25.0);
        assert_eq!(stat.mean_annual_traffic, 150.0);
        assert_eq!(
            ds.vessel_class_stat(g, LengthClassIndex::new(1))
                .mean_annual_traffic,
            5.0
        );

        let bayonne = ds.bridge(BridgeIndex::new(1));
        assert_eq!(bayonne.geometry, BridgeGeometry::Edge);
        assert!(!bayonne.has_protection());
    }

    #[test]
    fn test_edge_geometry_is_configurable() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        let ds = loader()
            .edge_geometry_bridges(["GOETHALS BRIDGE"])
            .from_dir(dir.path())
            .unwrap();
        assert_eq!(ds.bridge(BridgeIndex::new(0)).geometry, BridgeGeometry::Edge);
        assert_eq!(
            ds.bridge(BridgeIndex::new(1)).geometry,
            BridgeGeometry::Standard
        );
    }

    #[test]
    fn test_unknown_bridge_in_pier_table() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        fs::write(
            dir.path().join("bridge_piers.csv"),
            "Name,Pier,x,y,z,Width\nVERRAZZANO,0,1,1,0,10\n",
        )
        .unwrap();
        match loader().from_dir(dir.path()) {
            Err(LoaderError::UnknownBridge { file, line, name }) => {
                assert_eq!(file, "bridge_piers.csv");
                assert_eq!(line, 2);
                assert_eq!(name, "VERRAZZANO");
            }
            other => panic!("Expected UnknownBridge, got {:?}", other),
        }
    }

    #[test]
    fn test_declared_piers_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        fs::write(
            dir.path().join("bridge_piers.csv"),
            "Name,Pier,x,y,z,Width\n\
             GOETHALS BRIDGE,0,250,10,0,20\n\
             GOETHALS BRIDGE,1,750,-10,0,20\n\
             BAYONNE BRIDGE (NY-NJ),0,0,5,0,15\n",
        )
        .unwrap();
        match loader().from_dir(dir.path()) {
            Err(LoaderError::Dataset(DatasetError::MissingData { bridge, missing })) => {
                assert_eq!(bridge, "BAYONNE BRIDGE (NY-NJ)");
                assert_eq!(missing, MissingData::Pier(PierIndex::new(1)));
            }
            other => panic!("Expected MissingData, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_width_row_is_reported_by_class() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        fs::write(
            dir.path().join("Average_Widths.csv"),
            "Bridge,w1,w2\nGOETHALS BRIDGE,25,32\n",
        )
        .unwrap();
        match loader().from_dir(dir.path()) {
            Err(LoaderError::Dataset(DatasetError::MissingData { bridge, missing })) => {
                assert_eq!(bridge, "BAYONNE BRIDGE (NY-NJ)");
                assert_eq!(missing, MissingData::VesselClass(LengthClassIndex::new(0)));
            }
            other => panic!("Expected MissingData, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_traffic_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        fs::remove_file(dir.path().join("traffic").join("GOETHALS BRIDGE Counts.csv")).unwrap();
        match loader().from_dir(dir.path()) {
            Err(LoaderError::Io { path, .. }) => {
                assert!(path.ends_with("GOETHALS BRIDGE Counts.csv"));
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_second_centerline_row_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        fs::write(
            dir.path().join("ship_travel_lines.csv"),
            "Bridge,Centerline\n\
             GOETHALS BRIDGE,0.5\n\
             BAYONNE BRIDGE (NY-NJ),0.5\n\
             GOETHALS BRIDGE,0.9\n",
        )
        .unwrap();
        match loader().from_dir(dir.path()) {
            Err(LoaderError::DuplicateRow { file, line, name }) => {
                assert_eq!(file, "ship_travel_lines.csv");
                assert_eq!(line, 4);
                assert_eq!(name, "GOETHALS BRIDGE");
            }
            other => panic!("Expected DuplicateRow, got {:?}", other),
        }
    }

    #[test]
    fn test_second_width_row_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        fs::write(
            dir.path().join("Average_Widths.csv"),
            "Bridge,w1,w2\n\
             BAYONNE BRIDGE (NY-NJ),10,12\n\
             GOETHALS BRIDGE,25,32\n\
             BAYONNE BRIDGE (NY-NJ),99,99\n",
        )
        .unwrap();
        let err = loader().from_dir(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Average_Widths.csv:4: second row for bridge 'BAYONNE BRIDGE (NY-NJ)'"
        );
    }

    #[test]
    fn test_extra_class_columns_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        fs::write(
            dir.path().join("Average_Widths.csv"),
            "Bridge,w1,w2,w3\n\
             GOETHALS BRIDGE,25,32,40\n\
             BAYONNE BRIDGE (NY-NJ),24,30,40\n",
        )
        .unwrap();
        assert!(matches!(
            loader().from_dir(dir.path()),
            Err(LoaderError::ExtraColumns {
                line: 2,
                expected: 3,
                found: 4,
                ..
            })
        ));

        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        fs::write(
            dir.path().join("traffic").join("GOETHALS BRIDGE Counts.csv"),
            "Year,c1,c2\n2018,100,4\n2019,200,6,7\n",
        )
        .unwrap();
        match loader().from_dir(dir.path()) {
            Err(LoaderError::ExtraColumns { file, line, .. }) => {
                assert_eq!(file, "GOETHALS BRIDGE Counts.csv");
                assert_eq!(line, 3);
            }
            other => panic!("Expected ExtraColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_short_width_row() {
        let dir = tempfile::tempdir().unwrap();
        write_study(dir.path());
        let err = DatasetLoader::new().from_dir(dir.path()).unwrap_err();
        // Six classes by default, the fixture only carries two.
        assert!(matches!(
            err,
            LoaderError::MissingColumn {
                column: 4,
                found: 3,
                ..
            }
        ));
    }
}
