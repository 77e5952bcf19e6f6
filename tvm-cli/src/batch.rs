use std::io::Read;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use tvm_core::{SolveError, TvmRegistry, TvmSolver};

/// Errors that can occur when loading scenario data.
#[derive(Debug, Error)]
pub enum ScenarioLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("scenario file has no rows")]
    Empty,
}

impl From<csv::Error> for ScenarioLoaderError {
    fn from(err: csv::Error) -> Self {
        ScenarioLoaderError::CsvParse(err.to_string())
    }
}

/// A single row from a scenario CSV file.
///
/// - `n`, `i`, `pv`, `pmt`, `fv`: known inputs; an empty cell leaves the
///   variable unset
/// - `target`: the variable to solve for (`N`, `I`, `PV`, `PMT`, `FV`)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioRecord {
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub n: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub i: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub pv: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub pmt: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub fv: Option<f64>,
    pub target: String,
}

impl ScenarioRecord {
    /// The known inputs as a registry.
    pub fn registry(&self) -> TvmRegistry {
        TvmRegistry {
            n: self.n,
            i: self.i,
            pv: self.pv,
            pmt: self.pmt,
            fv: self.fv,
        }
    }
}

fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// The result of solving one scenario row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    /// 1-based data row, not counting the header.
    pub row: usize,
    pub target: String,
    pub result: Result<f64, SolveError>,
}

/// Loader for TVM scenarios from CSV files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Parse scenario records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file
    /// or a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScenarioRecord>, ScenarioLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScenarioRecord = result?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(ScenarioLoaderError::Empty);
        }
        Ok(records)
    }

    /// Solve every record. A failing row is reported in its outcome and
    /// does not stop the rest.
    pub fn solve_all(
        solver: &TvmSolver,
        records: &[ScenarioRecord],
    ) -> Vec<ScenarioOutcome> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let row = index + 1;
                let result = solver
                    .solve_named(record.target.trim(), &record.registry())
                    .map(|(_, value)| value);
                match &result {
                    Ok(value) => debug!(row, target = %record.target, value, "scenario solved"),
                    Err(err) => warn!(row, target = %record.target, error = %err, "scenario failed"),
                }
                ScenarioOutcome {
                    row,
                    target: record.target.trim().to_ascii_uppercase(),
                    result,
                }
            })
            .collect()
    }
}
