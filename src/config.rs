//! Chunking configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Chunks shorter than this are merged into the next one
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 8;

/// Hard ceiling on chunk text length (characters)
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 4096;

pub const DEFAULT_WHITESPACE_NORMALIZE_TEXT: bool = true;
pub const DEFAULT_SUB_CHUNK_TABLES: bool = false;
pub const DEFAULT_XML_MODE: bool = true;
pub const DEFAULT_PARENT_HIERARCHY_LEVELS: usize = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_text_length must be greater than zero")]
    ZeroMaxTextLength,

    #[error("min_text_length ({min}) exceeds max_text_length ({max})")]
    MinExceedsMax { min: usize, max: usize },
}

/// Options recognized by the chunker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Chunks shorter than this are held and merged forward
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Maximum chunk text length in characters
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Collapse whitespace while rendering
    #[serde(default = "default_whitespace_normalize_text")]
    pub whitespace_normalize_text: bool,

    /// Descend into tables instead of emitting each table as one leaf
    #[serde(default = "default_sub_chunk_tables")]
    pub sub_chunk_tables: bool,

    /// Render simplified XML and attach ancestor context, instead of plain
    /// text with neighbour-window context
    #[serde(default = "default_xml_mode")]
    pub xml_mode: bool,

    /// Ancestor depth (xml mode) or window radius (text mode) for context;
    /// 0 disables context
    #[serde(default = "default_parent_hierarchy_levels")]
    pub parent_hierarchy_levels: usize,

    /// Treat the root as a single leaf when the document has no structure
    /// markers at all
    #[serde(default = "default_whole_document_fallback")]
    pub whole_document_fallback: bool,
}

fn default_min_text_length() -> usize {
    DEFAULT_MIN_TEXT_LENGTH
}

fn default_max_text_length() -> usize {
    DEFAULT_MAX_TEXT_LENGTH
}

fn default_whitespace_normalize_text() -> bool {
    DEFAULT_WHITESPACE_NORMALIZE_TEXT
}

fn default_sub_chunk_tables() -> bool {
    DEFAULT_SUB_CHUNK_TABLES
}

fn default_xml_mode() -> bool {
    DEFAULT_XML_MODE
}

fn default_parent_hierarchy_levels() -> usize {
    DEFAULT_PARENT_HIERARCHY_LEVELS
}

fn default_whole_document_fallback() -> bool {
    true
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_text_length: default_min_text_length(),
            max_text_length: default_max_text_length(),
            whitespace_normalize_text: default_whitespace_normalize_text(),
            sub_chunk_tables: default_sub_chunk_tables(),
            xml_mode: default_xml_mode(),
            parent_hierarchy_levels: default_parent_hierarchy_levels(),
            whole_document_fallback: default_whole_document_fallback(),
        }
    }
}

impl ChunkingConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .context(format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_text_length == 0 {
            return Err(ConfigError::ZeroMaxTextLength);
        }
        if self.min_text_length > self.max_text_length {
            return Err(ConfigError::MinExceedsMax {
                min: self.min_text_length,
                max: self.max_text_length,
            });
        }
        Ok(())
    }

    /// Max length as used by the chunker (a zero max behaves as 1)
    pub fn effective_max_text_length(&self) -> usize {
        self.max_text_length.max(1)
    }

    pub fn min_text_length(mut self, length: usize) -> Self {
        self.min_text_length = length;
        self
    }

    pub fn max_text_length(mut self, length: usize) -> Self {
        self.max_text_length = length;
        self
    }

    pub fn whitespace_normalize_text(mut self, enabled: bool) -> Self {
        self.whitespace_normalize_text = enabled;
        self
    }

    pub fn sub_chunk_tables(mut self, enabled: bool) -> Self {
        self.sub_chunk_tables = enabled;
        self
    }

    pub fn xml_mode(mut self, enabled: bool) -> Self {
        self.xml_mode = enabled;
        self
    }

    pub fn parent_hierarchy_levels(mut self, levels: usize) -> Self {
        self.parent_hierarchy_levels = levels;
        self
    }

    pub fn whole_document_fallback(mut self, enabled: bool) -> Self {
        self.whole_document_fallback = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ChunkingConfig::default();
        assert_eq!(config.min_text_length, 8);
        assert_eq!(config.max_text_length, 4096);
        assert!(config.whitespace_normalize_text);
        assert!(!config.sub_chunk_tables);
        assert!(config.xml_mode);
        assert_eq!(config.parent_hierarchy_levels, 1);
        assert!(config.whole_document_fallback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ChunkingConfig =
            serde_json::from_str(r#"{"max_text_length": 512, "xml_mode": false}"#).unwrap();

        assert_eq!(config.max_text_length, 512);
        assert!(!config.xml_mode);
        assert_eq!(config.min_text_length, DEFAULT_MIN_TEXT_LENGTH);
    }

    #[test]
    fn test_validate_rejects_zero_max() {
        let config = ChunkingConfig::default().max_text_length(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxTextLength));
        assert_eq!(config.effective_max_text_length(), 1);
    }

    #[test]
    fn test_validate_rejects_min_above_max() {
        let config = ChunkingConfig::default().min_text_length(50).max_text_length(10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MinExceedsMax { min: 50, max: 10 })
        );
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_text_length": 4, "sub_chunk_tables": true}}"#).unwrap();

        let config = ChunkingConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.min_text_length, 4);
        assert!(config.sub_chunk_tables);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_text_length": 100, "max_text_length": 10}}"#).unwrap();

        let err = ChunkingConfig::from_json_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = ChunkingConfig::from_json_file(Path::new("/nonexistent/config.json"));
        assert!(result.is_err());
    }
}
