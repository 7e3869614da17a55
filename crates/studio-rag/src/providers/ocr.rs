//! OCR engine wrapping a tesseract subprocess
//!
//! Constructed explicitly and injected where needed; image bytes in,
//! extracted text out.

use std::process::Command;

use crate::config::OcrConfig;
use crate::error::{Error, Result};

/// Tesseract-backed OCR engine
pub struct OcrEngine {
    command: String,
    language: String,
}

impl OcrEngine {
    /// Create a new engine from configuration
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            language: config.language.clone(),
        }
    }

    /// Check if the tesseract binary is available
    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Extract text from image bytes
    ///
    /// The image is staged in a scoped temporary directory that is removed
    /// on every exit path.
    pub fn extract_text(&self, image: &[u8]) -> Result<String> {
        if !self.is_available() {
            return Err(Error::Ocr(format!(
                "{} is not installed; install tesseract-ocr to extract text from images",
                self.command
            )));
        }

        let staging = tempfile::Builder::new()
            .prefix("studio-rag-ocr-")
            .tempdir()?;
        let image_path = staging.path().join("input.png");
        std::fs::write(&image_path, image)?;

        let output = Command::new(&self.command)
            .arg(&image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output()
            .map_err(|e| Error::Ocr(format!("failed to run {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
