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

//! Export of collision reports.
//!
//! `CsvReportSink` writes the two result tables of a study, keyed by bridge
//! name in registry order, with a leading row-index column:
//!
//! ```raw
//! estimated_probability_of_collision_stats.csv   ,Name,Estimated Probability of Collision
//! estimated_return_period_stats.csv              ,Name,Estimated Return Period of Collision
//! ```
//!
//! An undefined return period is written as `-1`. On request a third table,
//! `estimated_collision_breakdown.csv`, lists every (bridge, pier, class)
//! contribution.

use allision_model::estimate::{CollisionReport, ReturnPeriod};
use std::{
    borrow::Cow,
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};
use thiserror::Error;

pub const PROBABILITY_FILE: &str = "estimated_probability_of_collision_stats.csv";
pub const RETURN_PERIOD_FILE: &str = "estimated_return_period_stats.csv";
pub const BREAKDOWN_FILE: &str = "estimated_collision_breakdown.csv";

/// Encoding of `ReturnPeriod::Undefined` in the return period table.
pub const UNDEFINED_RETURN_PERIOD: f64 = -1.0;

/// Errors that can occur while exporting a report.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A destination for finished collision reports.
pub trait ReportSink {
    /// Writes the report.
    fn write_report(&mut self, report: &CollisionReport) -> Result<(), ExportError>;
}

/// Writes reports as CSV tables into a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReportSink {
    output_dir: PathBuf,
    write_breakdown: bool,
}

impl CsvReportSink {
    /// Creates a sink writing into `output_dir`, which is created if needed.
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            write_breakdown: false,
        }
    }

    /// Also write the per-(pier, class) breakdown table.
    pub fn with_breakdown(mut self, yes: bool) -> Self {
        self.write_breakdown = yes;
        self
    }

    /// Returns the paths of the tables this sink writes.
    pub fn output_files(&self) -> Vec<PathBuf> {
        let mut files = vec![
            self.output_dir.join(PROBABILITY_FILE),
            self.output_dir.join(RETURN_PERIOD_FILE),
        ];
        if self.write_breakdown {
            files.push(self.output_dir.join(BREAKDOWN_FILE));
        }
        files
    }

    fn write_table<F>(&self, file_name: &str, body: F) -> Result<(), ExportError>
    where
        F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
    {
        let path = self.output_dir.join(file_name);
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        body(&mut out).map_err(io_err)?;
        out.flush().map_err(io_err)
    }
}

impl ReportSink for CsvReportSink {
    fn write_report(&mut self, report: &CollisionReport) -> Result<(), ExportError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        self.write_table(PROBABILITY_FILE, |out| write_probability_table(out, report))?;
        self.write_table(RETURN_PERIOD_FILE, |out| write_return_period_table(out, report))?;
        if self.write_breakdown {
            self.write_table(BREAKDOWN_FILE, |out| write_breakdown_table(out, report))?;
        }
        Ok(())
    }
}

/// Quotes a field if it contains a separator, a quote or a line break.
fn csv_field(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

fn return_period_value(period: ReturnPeriod) -> f64 {
    period.years().unwrap_or(UNDEFINED_RETURN_PERIOD)
}

pub fn write_probability_table<W: Write>(out: &mut W, report: &CollisionReport) -> std::io::Result<()> {
    writeln!(out, ",Name,Estimated Probability of Collision")?;
    for (i, estimate) in report.iter().enumerate() {
        writeln!(out, "{},{},{}", i, csv_field(estimate.name()), estimate.protected())?;
    }
    Ok(())
}

pub fn write_return_period_table<W: Write>(
    out: &mut W,
    report: &CollisionReport,
) -> std::io::Result<()> {
    writeln!(out, ",Name,Estimated Return Period of Collision")?;
    for (i, estimate) in report.iter().enumerate() {
        writeln!(
            out,
            "{},{},{}",
            i,
            csv_field(estimate.name()),
            return_period_value(estimate.return_period())
        )?;
    }
    Ok(())
}

pub fn write_breakdown_table<W: Write>(out: &mut W, report: &CollisionReport) -> std::io::Result<()> {
    writeln!(
        out,
        "Name,Pier,Length Class,Normalized Position,Geometric Probability,Protection Factor,Unprotected,Protected"
    )?;
    for estimate in report {
        let name = csv_field(estimate.name());
        for k in estimate.contributions() {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{}",
                name,
                k.pier.get(),
                k.length_class.get(),
                k.normalized_position,
                k.geometric_probability,
                k.protection_factor,
                k.unprotected,
                k.protected
            )?;
        }
    }
    Ok(())
}
