//! The exchanged timeline document: years, lane labels and blocks.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{BlockError, ProgressBlock, WindowError, validate_years};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing or malformed field `{0}`")]
    MissingField(&'static str),
    #[error("block {index} is invalid: {source}")]
    InvalidBlock { index: usize, source: BlockError },
    #[error(transparent)]
    InvalidYears(#[from] WindowError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDocument {
    pub start_year: i32,
    pub end_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_section_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_section_label: Option<String>,
    pub progress_blocks: Vec<ProgressBlock>,
}

impl TimelineDocument {
    /// Parse and validate a document. Either the whole document is usable or
    /// an error is returned.
    pub fn from_json(data: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_slice(data)?;
        let is_integer = |key: &str| value.get(key).is_some_and(Value::is_i64);
        if !is_integer("startYear") {
            return Err(DocumentError::MissingField("startYear"));
        }
        if !is_integer("endYear") {
            return Err(DocumentError::MissingField("endYear"));
        }
        if !value.get("progressBlocks").is_some_and(Value::is_array) {
            return Err(DocumentError::MissingField("progressBlocks"));
        }

        let doc: Self = serde_json::from_value(value)?;
        doc.validate()?;
        tracing::debug!(
            start_year = doc.start_year,
            end_year = doc.end_year,
            blocks = doc.progress_blocks.len(),
            "document parsed"
        );
        Ok(doc)
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        validate_years(self.start_year, self.end_year)?;
        for (index, block) in self.progress_blocks.iter().enumerate() {
            block
                .validate()
                .map_err(|source| DocumentError::InvalidBlock { index, source })?;
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
