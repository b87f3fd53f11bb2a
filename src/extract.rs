//! Upload-to-text pipeline: temp file, raw extraction, normalization.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::normalizer::Normalizer;
use crate::ocr::variants::build_ocr_variants;
use crate::ocr::OcrEngine;
use crate::pdf;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "tiff", "tif", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
}

impl FileKind {
    /// Classify an upload by its extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
        if ext == "pdf" {
            Some(Self::Pdf)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else {
            None
        }
    }
}

/// Turns uploaded bytes into normalized text.
pub struct Extractor {
    ocr: Arc<dyn OcrEngine>,
    normalizer: Normalizer,
    upload_dir: PathBuf,
    multi_pass: bool,
}

impl Extractor {
    pub fn new(ocr: Arc<dyn OcrEngine>, normalizer: Normalizer, upload_dir: PathBuf) -> Self {
        Self {
            ocr,
            normalizer,
            upload_dir,
            multi_pass: false,
        }
    }

    /// Also OCR every preprocessing variant and keep the richest result.
    pub fn with_multi_pass(mut self, multi_pass: bool) -> Self {
        self.multi_pass = multi_pass;
        self
    }

    /// Extract and normalize. The upload is written to a temp file that is
    /// removed when this returns, on success or failure. Empty normalized
    /// output is returned as-is; callers decide what "no content" means.
    pub async fn extract(&self, bytes: &[u8], kind: FileKind) -> Result<String, ExtractError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let suffix = match kind {
            FileKind::Pdf => ".pdf",
            FileKind::Image => ".img",
        };
        let upload = tempfile::Builder::new()
            .prefix(&format!("{}-", uuid::Uuid::new_v4()))
            .suffix(suffix)
            .tempfile_in(&self.upload_dir)?;
        tokio::fs::write(upload.path(), bytes).await?;
        debug!("Stored upload at {:?} ({} bytes)", upload.path(), bytes.len());

        let raw = match kind {
            FileKind::Pdf => self.pdf_text(&upload).await?,
            FileKind::Image => self.image_text(&upload).await?,
        };

        let normalized = self.normalizer.normalize(&raw);
        info!(
            "Extracted {} raw chars, {} after normalization",
            raw.chars().count(),
            normalized.chars().count()
        );
        Ok(normalized)
    }

    async fn pdf_text(&self, upload: &NamedTempFile) -> Result<String, ExtractError> {
        let path = upload.path().to_path_buf();
        tokio::task::spawn_blocking(move || pdf::extract_text(&path))
            .await
            .map_err(|e| ExtractError::CorruptPdf(e.to_string()))?
    }

    async fn image_text(&self, upload: &NamedTempFile) -> Result<String, ExtractError> {
        let path = upload.path().to_path_buf();
        let image = tokio::task::spawn_blocking(move || decode_image(&path))
            .await
            .map_err(|e| ExtractError::CorruptImage(e.to_string()))??;

        debug!("Running {} OCR on upload", self.ocr.name());
        let raw = self
            .ocr
            .recognize(upload.path())
            .await
            .map_err(|e| ExtractError::Ocr(format!("{:#}", e)))?;

        if !self.multi_pass {
            return Ok(raw);
        }

        self.best_variant_text(image, raw).await
    }

    /// OCR each preprocessing variant and return the raw text whose
    /// normalized form is longest. The plain pass is the baseline, and a
    /// failing variant is skipped.
    async fn best_variant_text(
        &self,
        image: DynamicImage,
        baseline: String,
    ) -> Result<String, ExtractError> {
        let dir = TempDir::new_in(&self.upload_dir)?;
        let variants = tokio::task::spawn_blocking(move || build_ocr_variants(&image))
            .await
            .map_err(|e| ExtractError::CorruptImage(e.to_string()))?;

        let mut best_score = self.normalizer.normalize(&baseline).chars().count();
        let mut best = baseline;
        let mut best_name = "plain";

        for variant in variants {
            let path = dir.path().join(format!("{}.png", variant.name));
            if let Err(e) = variant.image.save_with_format(&path, ImageFormat::Png) {
                warn!("Could not write OCR variant {}: {}", variant.name, e);
                continue;
            }

            let raw = match self.ocr.recognize(&path).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("OCR failed on variant {}: {:#}", variant.name, e);
                    continue;
                }
            };

            let score = self.normalizer.normalize(&raw).chars().count();
            debug!("OCR variant {} kept {} chars", variant.name, score);
            if score > best_score {
                best_score = score;
                best = raw;
                best_name = variant.name;
            }
        }

        info!("Multi-pass OCR picked variant {}", best_name);
        Ok(best)
    }
}

fn decode_image(path: &Path) -> Result<DynamicImage, ExtractError> {
    image::io::Reader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| ExtractError::CorruptImage(e.to_string()))
}
