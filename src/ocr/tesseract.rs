//! Tesseract CLI OCR engine.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info};

use super::OcrEngine;

pub struct TesseractEngine {
    binary: String,
    lang: String,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
        }
    }
}

#[async_trait::async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    /// Runs `tesseract <image> stdout -l <lang>`.
    async fn recognize(&self, image: &Path) -> anyhow::Result<String> {
        info!("TesseractEngine: running OCR on {:?}", image);

        let output = Command::new(&self.binary)
            .arg(image.as_os_str())
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to run tesseract (is it installed? path='{}'): {}",
                    self.binary,
                    e
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Tesseract OCR failed (exit code {}): {}",
                output.status.code().unwrap_or(-1),
                stderr
            );
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!("TesseractEngine: {} chars recognized", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary() {
        let engine = TesseractEngine::new("/nonexistent/tesseract", "eng");
        let err = engine
            .recognize(Path::new("image.png"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to run tesseract"));
    }
}
