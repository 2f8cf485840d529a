#![deny(warnings)]

//! Scenario ingestion: YAML scenario files turned into validated inputs.
//!
//! A scenario bundles everything one simulation needs: the production
//! records, the royalty schedule of the applicable regime, and a default
//! gold price. Files are validated in full on load; a scenario that parses
//! is ready to run.

use rent_core::{RoyaltySchedule, ValidationError, YearRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// A complete, self-contained simulation scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name, e.g. the mine or study the data describes.
    pub name: String,
    /// Royalty schedule of the fiscal regime the scenario assumes.
    pub royalty_schedule: RoyaltySchedule,
    /// Gold price in USD/oz used when the caller supplies none.
    pub default_price: Decimal,
    /// Per-year records; kept sorted by ascending year after load.
    pub records: Vec<YearRecord>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid scenario file: {0}")]
    Parse(String),
    #[error("invalid scenario: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e.to_string())
    }
}

/// Check every domain invariant a scenario must satisfy: each record, the
/// royalty schedule, and the default price.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    rent_core::validate_schedule(&scenario.royalty_schedule)?;
    rent_core::validate_price(scenario.default_price)?;
    for record in &scenario.records {
        rent_core::validate_record(record)?;
    }
    Ok(())
}

/// Parse a scenario from YAML text, validate it, and sort its records by
/// year so downstream output follows the timeline.
pub fn parse_scenario(text: &str) -> Result<Scenario, ScenarioError> {
    let mut scenario: Scenario =
        serde_yaml::from_str(text).map_err(|e| ScenarioError::Parse(e.to_string()))?;
    validate_scenario(&scenario)?;
    scenario.records.sort_by_key(|r| r.year);
    Ok(scenario)
}

/// Load and validate a scenario from a YAML file on disk.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, ScenarioError> {
    let text = fs::read_to_string(path.as_ref())?;
    let scenario = parse_scenario(&text)?;
    info!(
        name = %scenario.name,
        years = scenario.records.len(),
        regime = %scenario.royalty_schedule.regime,
        "loaded scenario"
    );
    Ok(scenario)
}
