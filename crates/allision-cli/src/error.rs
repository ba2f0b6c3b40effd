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

use crate::export::ExportError;
use allision_engine::error::EstimationError;
use allision_model::loading::LoaderError;
use thiserror::Error;

/// Exit status for invalid command-line arguments.
pub const EXIT_INVALID_ARGUMENT: i32 = 2;

/// Exit status for failures while loading, estimating or writing.
pub const EXIT_FAILURE: i32 = 1;

/// Errors that end a command-line run.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to load dataset: {0}")]
    Load(#[from] LoaderError),
    #[error("Estimation failed: {0}")]
    Estimation(#[from] EstimationError),
    #[error("Failed to write results: {0}")]
    Export(#[from] ExportError),
}

impl CliError {
    /// Returns the process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgument(_) => EXIT_INVALID_ARGUMENT,
            _ => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allision_model::error::DatasetError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::InvalidArgument("--aberrancy-rate".to_string()).exit_code(),
            2
        );
        let load = CliError::from(LoaderError::Dataset(DatasetError::NoLengthClasses));
        assert_eq!(load.exit_code(), 1);
        assert_eq!(
            load.to_string(),
            "Failed to load dataset: Dataset error: The dataset defines no vessel length classes"
        );
    }
}
