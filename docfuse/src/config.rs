//! Configuration for docfuse.
//!
//! This module holds the settings supplied by the surrounding application:
//! - The optional conversion backend (stored, never contacted)
//! - Merge options (compression, producer string, load concurrency)
//! - Output artifact naming

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DocFuseError, Result};

/// Base name used when the user leaves the output name blank.
pub const DEFAULT_OUTPUT_NAME: &str = "documento_fusionado";

/// Extension of the merged artifact.
pub const OUTPUT_EXTENSION: &str = "pdf";

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - streams are written as-is.
    None,
    /// Flate-compress content streams.
    #[default]
    Standard,
    /// Compress and drop unreachable objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = DocFuseError;

    /// Parse compression level from string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not one of "none", "standard" or
    /// "maximum" (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(DocFuseError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Connection settings for an external office/text conversion service.
///
/// The merge pipeline never calls the backend: office and text entries always
/// become placeholder pages. The setting is kept so the surrounding
/// application can persist and display it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the conversion service, if any.
    #[serde(default)]
    pub url: Option<String>,
}

impl BackendConfig {
    /// Create a config from an optional URL, treating blank input as unset.
    pub fn new(url: Option<String>) -> Self {
        Self {
            url: url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
        }
    }

    /// Whether a backend URL is set.
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

/// Settings that drive one merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Compression applied to the serialized output.
    pub compression: CompressionLevel,
    /// Written to the Creator and Producer fields of the output.
    pub producer: String,
    /// Maximum number of entry sources read concurrently.
    pub workers: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::default(),
            producer: format!("{} {}", crate::NAME, crate::VERSION),
            workers: 4,
        }
    }
}

impl MergeOptions {
    /// Validate the options.
    ///
    /// # Errors
    ///
    /// Returns an error if `workers` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DocFuseError::invalid_config(
                "Number of workers must be at least 1",
            ));
        }
        Ok(())
    }
}

/// File name of the merged artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputName {
    base: String,
}

impl OutputName {
    /// Normalize a user-supplied base name.
    ///
    /// Surrounding whitespace is trimmed, path separators become `_`, and a
    /// trailing `.pdf` typed by the user is dropped so the extension is never
    /// doubled. A blank name falls back to [`DEFAULT_OUTPUT_NAME`].
    ///
    /// # Examples
    ///
    /// ```
    /// use docfuse::config::OutputName;
    ///
    /// assert_eq!(OutputName::resolve("  ").file_name(), "documento_fusionado.pdf");
    /// assert_eq!(OutputName::resolve("Informe.PDF").file_name(), "Informe.pdf");
    /// ```
    pub fn resolve(base: &str) -> Self {
        let cleaned = base.trim().replace(['/', '\\'], "_");

        let stem = match cleaned.len().checked_sub(OUTPUT_EXTENSION.len() + 1) {
            Some(cut)
                if cleaned.is_char_boundary(cut)
                    && cleaned[cut..].eq_ignore_ascii_case(".pdf") =>
            {
                cleaned[..cut].trim_end().to_string()
            }
            _ => cleaned,
        };

        let base = if stem.is_empty() {
            DEFAULT_OUTPUT_NAME.to_string()
        } else {
            stem
        };

        Self { base }
    }

    /// Base name without extension.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full file name including the extension.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.base, OUTPUT_EXTENSION)
    }
}

impl Default for OutputName {
    fn default() -> Self {
        Self::resolve("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_compression_level_from_str() {
        assert_eq!(
            CompressionLevel::from_str("none").unwrap(),
            CompressionLevel::None
        );
        assert_eq!(
            CompressionLevel::from_str("standard").unwrap(),
            CompressionLevel::Standard
        );
        assert_eq!(
            CompressionLevel::from_str("MAXIMUM").unwrap(),
            CompressionLevel::Maximum
        );
        assert!(CompressionLevel::from_str("invalid").is_err());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some(" http://localhost:3000 "), Some("http://localhost:3000"))]
    fn test_backend_config_normalizes(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        let config = BackendConfig::new(input.map(str::to_string));
        assert_eq!(config.url.as_deref(), expected);
        assert_eq!(config.is_configured(), expected.is_some());
    }

    #[test]
    fn test_backend_config_deserializes_without_url() {
        let config: BackendConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_merge_options_validation() {
        let mut options = MergeOptions::default();
        assert!(options.validate().is_ok());
        assert!(options.producer.starts_with("docfuse"));

        options.workers = 0;
        assert!(options.validate().is_err());
    }

    #[rstest]
    #[case("", "documento_fusionado.pdf")]
    #[case("   ", "documento_fusionado.pdf")]
    #[case("contrato", "contrato.pdf")]
    #[case("  contrato final ", "contrato final.pdf")]
    #[case("informe.pdf", "informe.pdf")]
    #[case("informe.PDF", "informe.pdf")]
    #[case(".pdf", "documento_fusionado.pdf")]
    #[case("a/b\\c", "a_b_c.pdf")]
    #[case("notas.txt", "notas.txt.pdf")]
    #[case("año", "año.pdf")]
    fn test_output_name_resolve(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(OutputName::resolve(input).file_name(), expected);
    }

    #[test]
    fn test_output_name_default() {
        assert_eq!(OutputName::default().base(), DEFAULT_OUTPUT_NAME);
    }
}
