//! Process-wide configuration.
//!
//! Read once at startup from the environment (after `.env` is loaded) and
//! shared read-only afterwards. The artifact denylist can be overridden by a
//! JSON file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::llm;
use crate::normalizer::{ArtifactDenylist, ArtifactRule};

pub const MIN_TEXT_LENGTH: usize = 10;
pub const MAX_TEXT_LENGTH: usize = 50_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub model_timeout: Duration,
    /// Upload limit in bytes.
    pub max_file_size: usize,
    pub upload_dir: PathBuf,
    pub tesseract_path: String,
    pub ocr_lang: String,
    /// OCR every preprocessing variant and keep the best result.
    pub ocr_multi_pass: bool,
    pub denylist: ArtifactDenylist,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            gemini_api_key: None,
            gemini_model: llm::gemini::DEFAULT_MODEL.to_string(),
            openrouter_api_key: None,
            openrouter_model: llm::openrouter::DEFAULT_MODEL.to_string(),
            model_timeout: Duration::from_secs(60),
            max_file_size: 10 * 1024 * 1024, // 10MB
            upload_dir: PathBuf::from("temp_uploads"),
            tesseract_path: "tesseract".to_string(),
            ocr_lang: "eng".to_string(),
            ocr_multi_pass: false,
            denylist: ArtifactDenylist::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset and blank values fall back
    /// to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let model_timeout = match get("MODEL_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid MODEL_TIMEOUT_SECS: {}", v))?,
            ),
            None => defaults.model_timeout,
        };

        let max_file_size = match get("MAX_FILE_SIZE") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid MAX_FILE_SIZE: {}", v))?,
            None => defaults.max_file_size,
        };

        let ocr_multi_pass = match get("OCR_MULTI_PASS") {
            Some(v) => parse_flag(&v).with_context(|| format!("Invalid OCR_MULTI_PASS: {}", v))?,
            None => defaults.ocr_multi_pass,
        };

        let denylist = match get("DENYLIST_PATH") {
            Some(path) => load_denylist(Path::new(&path))?,
            None => defaults.denylist,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            openrouter_model: get("OPENROUTER_MODEL").unwrap_or(defaults.openrouter_model),
            model_timeout,
            max_file_size,
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            tesseract_path: get("TESSERACT_PATH").unwrap_or(defaults.tesseract_path),
            ocr_lang: get("OCR_LANG").unwrap_or(defaults.ocr_lang),
            ocr_multi_pass,
            denylist,
        })
    }

    pub fn model_configured(&self) -> bool {
        self.gemini_api_key.is_some() || self.openrouter_api_key.is_some()
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

/// Load artifact rules from a JSON array of `{"pattern", "reason"}` objects.
pub fn load_denylist(path: &Path) -> Result<ArtifactDenylist> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read denylist: {:?}", path))?;

    let rules: Vec<ArtifactRule> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse denylist: {:?}", path))?;

    let denylist = ArtifactDenylist::new(rules);
    info!(
        "Loaded {} artifact rules from {:?}",
        denylist.rules().len(),
        path
    );
    Ok(denylist)
}
