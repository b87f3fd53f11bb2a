//! OCR engine abstraction.
//!
//! Defines the [`OcrEngine`] trait so the extractor can run Tesseract in
//! production and a canned engine in tests.

pub mod tesseract;
pub mod variants;

use std::path::Path;

/// Async trait implemented by each OCR backend: image file in, raw text out.
#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;
    async fn recognize(&self, image: &Path) -> anyhow::Result<String>;
}
