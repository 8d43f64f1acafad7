//! Case table loading.
//!
//! The default table is compiled into the binary; a YAML file given on the
//! command line replaces it entirely.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::models::CaseTable;

/// Default transliteration cases.
pub const DEFAULT_CASES: &str = include_str!("../../cases/transliteration.yaml");

#[derive(Error, Debug)]
pub enum CaseTableError {
    #[error("Failed to read case table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse case table: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Case table contains no cases")]
    Empty,

    #[error("Duplicate case id: {0}")]
    DuplicateId(String),

    #[error("Case {0} has an empty input")]
    EmptyInput(String),
}

/// Loads and validates case tables
pub struct CaseLoader;

impl CaseLoader {
    /// The embedded default table
    pub fn builtin() -> Result<CaseTable, CaseTableError> {
        Self::parse(DEFAULT_CASES)
    }

    /// Load from `path`, or the embedded table when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<CaseTable, CaseTableError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub fn from_path(path: &Path) -> Result<CaseTable, CaseTableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CaseTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<CaseTable, CaseTableError> {
        let table: CaseTable = serde_yaml::from_str(raw)?;
        Self::validate(&table)?;
        Ok(table)
    }

    /// Ids must be unique across groups. Inputs must be non-blank: a blank
    /// input never triggers a backend call and has nothing to verify.
    pub fn validate(table: &CaseTable) -> Result<(), CaseTableError> {
        if table.is_empty() {
            return Err(CaseTableError::Empty);
        }

        let mut seen = HashSet::new();
        for (_, case) in table.iter() {
            if !seen.insert(case.id.as_str()) {
                return Err(CaseTableError::DuplicateId(case.id.clone()));
            }
            if case.input.trim().is_empty() {
                return Err(CaseTableError::EmptyInput(case.id.clone()));
            }
        }
        Ok(())
    }
}
