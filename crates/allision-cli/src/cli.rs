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

//! Command-line surface of the `allision` binary.

use crate::{
    error::CliError,
    export::{CsvReportSink, ReportSink},
};
use allision_engine::{
    aggregate::{Aggregator, ExecutionMode},
    constants::{APPROACH_ANGLE_STD_DEV_DEG, BASE_ABERRANCY_RATE},
    monitor::{
        aggregation_monitor::AggregationMonitor, log::LogMonitor, no_op::NoOperationMonitor,
    },
    protection::ProtectionPolicy,
};
use allision_model::{estimate::CollisionReport, loading::DatasetLoader};
use clap::Parser;
use std::path::PathBuf;

/// Annual probability of vessel collision with bridge piers.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "allision")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Study directory holding the bridge, pier, protection, width,
    /// centerline and traffic tables.
    #[arg(long)]
    pub data: PathBuf,

    /// Directory the result tables are written to.
    #[arg(long)]
    pub output: PathBuf,

    /// Base aberrancy rate per vessel transit.
    #[arg(long, default_value_t = BASE_ABERRANCY_RATE, allow_negative_numbers = true)]
    pub aberrancy_rate: f64,

    /// Standard deviation of the approach angle, in degrees.
    #[arg(
        long = "angle-std-dev-deg",
        default_value_t = APPROACH_ANGLE_STD_DEV_DEG,
        allow_negative_numbers = true
    )]
    pub angle_std_dev_deg: f64,

    /// Clamp protection factors into [0, 1].
    #[arg(long)]
    pub clamp_protection: bool,

    /// Estimate bridges on all cores.
    #[arg(long)]
    pub parallel: bool,

    /// Bridge evaluated with edge geometry. Repeatable; replaces the default.
    #[arg(long = "edge-bridge", value_name = "NAME")]
    pub edge_bridge: Vec<String>,

    /// Also write the per-pier, per-class breakdown table.
    #[arg(long)]
    pub breakdown: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Checks the numeric arguments clap cannot range-check.
    pub fn validate(&self) -> Result<(), CliError> {
        if !self.aberrancy_rate.is_finite() || !(0.0..=1.0).contains(&self.aberrancy_rate) {
            return Err(CliError::InvalidArgument(format!(
                "--aberrancy-rate must lie in [0, 1], got {}",
                self.aberrancy_rate
            )));
        }
        if !self.angle_std_dev_deg.is_finite() || self.angle_std_dev_deg <= 0.0 {
            return Err(CliError::InvalidArgument(format!(
                "--angle-std-dev-deg must be positive, got {}",
                self.angle_std_dev_deg
            )));
        }
        Ok(())
    }

    pub fn aggregator(&self) -> Aggregator {
        let policy = if self.clamp_protection {
            ProtectionPolicy::Clamped
        } else {
            ProtectionPolicy::Reference
        };
        let mode = if self.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        };
        Aggregator::builder()
            .aberrancy_rate(self.aberrancy_rate)
            .approach_angle_std_dev_deg(self.angle_std_dev_deg)
            .protection_policy(policy)
            .execution_mode(mode)
            .build()
    }

    pub fn loader(&self) -> DatasetLoader {
        let loader = DatasetLoader::new();
        if self.edge_bridge.is_empty() {
            loader
        } else {
            loader.edge_geometry_bridges(self.edge_bridge.iter().cloned())
        }
    }

    pub fn sink(&self) -> CsvReportSink {
        CsvReportSink::new(&self.output).with_breakdown(self.breakdown)
    }
}

/// Loads the study, estimates every bridge and writes the result tables.
pub fn run(cli: &Cli) -> Result<CollisionReport, CliError> {
    cli.validate()?;

    let dataset = cli.loader().from_dir(&cli.data)?;
    let aggregator = cli.aggregator();

    let mut monitor: Box<dyn AggregationMonitor> = if cli.quiet {
        Box::new(NoOperationMonitor::new())
    } else {
        Box::new(LogMonitor::default())
    };
    let outcome = aggregator.estimate(&dataset, monitor.as_mut())?;

    let mut sink = cli.sink();
    sink.write_report(outcome.report())?;

    if !cli.quiet {
        println!("{}", outcome.statistics());
        for path in sink.output_files() {
            println!("Wrote {}", path.display());
        }
    }

    Ok(outcome.into_report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{PROBABILITY_FILE, RETURN_PERIOD_FILE};
    use std::{fs, path::Path};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("allision").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    /// One protected bridge and one bridge whose only traffic is zero.
    fn write_study(dir: &Path) {
        fs::write(
            dir.join("bridge_parameters.csv"),
            "Name,Length,Piers,Protections,sx,sy,ex,ey\n\
             GOETHALS BRIDGE,1000,2,1,0,0,1000,0\n\
             IDLE CROSSING,400,1,0,0,0,400,0\n",
        )
        .unwrap();
        fs::write(
            dir.join("bridge_piers.csv"),
            "Name,Pier,x,y,z,Width\n\
             GOETHALS BRIDGE,0,250,10,0,20\n\
             GOETHALS BRIDGE,1,750,-10,0,20\n\
             IDLE CROSSING,0,200,0,0,10\n",
        )
        .unwrap();
        fs::write(
            dir.join("bridge_protections.csv"),
            "Name,Id,Pier,Efficiency,a,b,Distance,Diameter\n\
             GOETHALS BRIDGE,0,1,0.9,0,0,150,10\n",
        )
        .unwrap();
        fs::write(
            dir.join("Average_Widths.csv"),
            "Bridge,w1,w2,w3,w4,w5,w6\n\
             GOETHALS BRIDGE,25,28,30,32,34,36\n\
             IDLE CROSSING,20,20,20,20,20,20\n",
        )
        .unwrap();
        fs::write(
            dir.join("ship_travel_lines.csv"),
            "Bridge,Centerline\n\
             GOETHALS BRIDGE,0.45\n\
             IDLE CROSSING,0.5\n",
        )
        .unwrap();
        fs::create_dir(dir.join("traffic")).unwrap();
        fs::write(
            dir.join("traffic").join("GOETHALS BRIDGE Counts.csv"),
            "Year,c1,c2,c3,c4,c5,c6\n2018,100,40,20,10,5,2\n2019,200,60,30,10,5,2\n",
        )
        .unwrap();
        fs::write(
            dir.join("traffic").join("IDLE CROSSING Counts.csv"),
            "Year,c1,c2,c3,c4,c5,c6\n2018,0,0,0,0,0,0\n",
        )
        .unwrap();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--data", "in", "--output", "out"]);
        assert_eq!(cli.data, PathBuf::from("in"));
        assert_eq!(cli.aberrancy_rate, BASE_ABERRANCY_RATE);
        assert_eq!(cli.angle_std_dev_deg, APPROACH_ANGLE_STD_DEV_DEG);
        assert!(cli.edge_bridge.is_empty());
        assert!(!cli.parallel && !cli.breakdown && !cli.quiet && !cli.clamp_protection);
        assert!(cli.validate().is_ok());

        let aggregator = cli.aggregator();
        assert_eq!(aggregator.execution_mode(), ExecutionMode::Sequential);
        assert_eq!(aggregator.protection_policy(), ProtectionPolicy::Reference);
        assert_eq!(cli.loader(), DatasetLoader::new());
    }

    #[test]
    fn test_flags_configure_run() {
        let cli = parse(&[
            "--data",
            "in",
            "--output",
            "out",
            "--aberrancy-rate",
            "1e-4",
            "--angle-std-dev-deg",
            "20",
            "--clamp-protection",
            "--parallel",
            "--edge-bridge",
            "A",
            "--edge-bridge",
            "B",
        ]);
        let aggregator = cli.aggregator();
        assert_eq!(aggregator.aberrancy_rate(), 1e-4);
        assert_eq!(aggregator.execution_mode(), ExecutionMode::Parallel);
        assert_eq!(aggregator.protection_policy(), ProtectionPolicy::Clamped);
        assert_eq!(cli.loader(), DatasetLoader::new().edge_geometry_bridges(["A", "B"]));
    }

    #[test]
    fn test_missing_required_argument_is_rejected() {
        assert!(Cli::try_parse_from(["allision", "--data", "in"]).is_err());
    }

    #[test]
    fn test_invalid_numbers_exit_with_status_two() {
        for args in [
            ["--aberrancy-rate", "1.5"],
            ["--aberrancy-rate", "NaN"],
            ["--angle-std-dev-deg", "0"],
            ["--angle-std-dev-deg", "-3"],
        ] {
            let cli = parse(&["--data", "in", "--output", "out", args[0], args[1]]);
            let err = cli.validate().unwrap_err();
            assert_eq!(err.exit_code(), 2, "{:?}", args);
            assert_eq!(run(&cli).unwrap_err().exit_code(), 2);
        }
    }

    #[test]
    fn test_missing_study_exits_with_status_one() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("absent");
        let out = dir.path().join("out");
        let cli = parse(&["--data", data.to_str().unwrap(), "--output", out.to_str().unwrap(), "-q"]);
        let err = run(&cli).unwrap_err();
        assert!(matches!(err, CliError::Load(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(!out.exists());
    }

    #[test]
    fn test_run_writes_result_tables() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("study");
        fs::create_dir(&data).unwrap();
        write_study(&data);
        let out = dir.path().join("Results");

        let cli = parse(&[
            "--data",
            data.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--breakdown",
            "--quiet",
        ]);
        let report = run(&cli).expect("study should estimate");

        assert_eq!(report.len(), 2);
        let goethals = report.by_name("GOETHALS BRIDGE").unwrap();
        assert!(goethals.protected() > 0.0);
        assert!(goethals.protected() < goethals.unprotected());
        assert!(report.by_name("IDLE CROSSING").unwrap().return_period().is_undefined());

        let probabilities = fs::read_to_string(out.join(PROBABILITY_FILE)).unwrap();
        let mut lines = probabilities.lines();
        assert_eq!(lines.next(), Some(",Name,Estimated Probability of Collision"));
        assert_eq!(
            lines.next(),
            Some(format!("0,GOETHALS BRIDGE,{}", goethals.protected()).as_str())
        );
        assert_eq!(lines.next(), Some("1,IDLE CROSSING,0"));

        let periods = fs::read_to_string(out.join(RETURN_PERIOD_FILE)).unwrap();
        assert_eq!(periods.lines().last(), Some("1,IDLE CROSSING,-1"));

        // 2 piers * 6 classes + 1 pier * 6 classes, plus the header.
        let breakdown = fs::read_to_string(out.join(crate::export::BREAKDOWN_FILE)).unwrap();
        assert_eq!(breakdown.lines().count(), 19);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("study");
        fs::create_dir(&data).unwrap();
        write_study(&data);
        let data = data.to_str().unwrap().to_string();

        let seq_out = dir.path().join("seq");
        let par_out = dir.path().join("par");
        let sequential =
            run(&parse(&["--data", &data, "--output", seq_out.to_str().unwrap(), "-q"])).unwrap();
        let parallel = run(&parse(&[
            "--data",
            &data,
            "--output",
            par_out.to_str().unwrap(),
            "-q",
            "--parallel",
        ]))
        .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(
            fs::read_to_string(seq_out.join(PROBABILITY_FILE)).unwrap(),
            fs::read_to_string(par_out.join(PROBABILITY_FILE)).unwrap()
        );
    }
}
