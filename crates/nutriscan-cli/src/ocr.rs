//! Text recognition through the tesseract command.

use crate::config::OcrSettings;
use crate::error::{CliError, Result};
use nutriscan_domain::traits::TextRecognizer;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Runs `tesseract <image> stdout -l <lang>` and returns what it printed.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    /// Create a recognizer for `binary` reading `language`.
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    /// Create a recognizer from configuration, with an optional language override.
    pub fn from_settings(settings: &OcrSettings, language: Option<&str>) -> Self {
        Self::new(
            settings.binary.clone(),
            language.unwrap_or(&settings.language),
        )
    }

    /// Language passed to tesseract
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl TextRecognizer for TesseractOcr {
    type Error = CliError;

    fn recognize(&self, image: &Path) -> Result<String> {
        if !image.is_file() {
            return Err(CliError::InvalidInput(format!(
                "Image not found: {}",
                image.display()
            )));
        }

        debug!("Running {} on {}", self.binary, image.display());
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| CliError::Ocr(format!("Failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!("Recognized {} characters", text.len());
        Ok(text)
    }
}
