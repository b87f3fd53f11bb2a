//! Cleanup of raw OCR / PDF text into a compact, line-based block.
//!
//! Pure functions, no I/O. Every filter is a predicate over a single line so
//! it can be tested (and tuned) on its own.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lines whose share of symbol characters is above this are dropped.
pub const MAX_SYMBOL_DENSITY: f64 = 0.6;

pub const ARTIFACT_REASON: &str = "known non-content artifact";

/// Substrings left behind by scanners, terminals and OCR tooling.
const DEFAULT_ARTIFACTS: &[&str] = &["tesseract", "desktop", "dpi", "estimating", "~/", "show"];

static RE_NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// One denylist entry: a lowercase substring and why it marks a line as noise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRule {
    pub pattern: String,
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_reason() -> String {
    ARTIFACT_REASON.to_string()
}

impl ArtifactRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into().to_lowercase(),
            reason: default_reason(),
        }
    }
}

/// Case-insensitive substring denylist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDenylist {
    rules: Vec<ArtifactRule>,
}

impl Default for ArtifactDenylist {
    fn default() -> Self {
        Self {
            rules: DEFAULT_ARTIFACTS.iter().map(|p| ArtifactRule::new(*p)).collect(),
        }
    }
}

impl ArtifactDenylist {
    /// Build a denylist from configured rules. Patterns are lowercased and
    /// empty ones discarded, since an empty pattern would match every line.
    pub fn new(rules: Vec<ArtifactRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|r| !r.pattern.is_empty())
            .map(|r| ArtifactRule {
                pattern: r.pattern.to_lowercase(),
                reason: r.reason,
            })
            .collect();
        Self { rules }
    }

    /// The first rule whose pattern occurs in `line`, ignoring case.
    pub fn matches(&self, line: &str) -> Option<&ArtifactRule> {
        let lower = line.to_lowercase();
        self.rules.iter().find(|r| lower.contains(&r.pattern))
    }

    pub fn rules(&self) -> &[ArtifactRule] {
        &self.rules
    }
}

/// Fraction of characters that are not ASCII letters, digits or spaces.
/// Empty lines have density 0.
pub fn symbol_density(line: &str) -> f64 {
    let total = line.chars().count();
    if total == 0 {
        return 0.0;
    }
    let symbols = line
        .chars()
        .filter(|c| !(c.is_ascii_alphanumeric() || *c == ' '))
        .count();
    symbols as f64 / total as f64
}

pub fn is_symbol_heavy(line: &str) -> bool {
    symbol_density(line) > MAX_SYMBOL_DENSITY
}

/// Line filter pipeline configured with an artifact denylist.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    denylist: ArtifactDenylist,
}

#[derive(Debug, Default)]
struct DropCounts {
    empty: usize,
    symbols: usize,
    artifacts: usize,
    duplicates: usize,
}

impl Normalizer {
    pub fn new(denylist: ArtifactDenylist) -> Self {
        Self { denylist }
    }

    /// Trim, drop empty / symbol-heavy / artifact / repeated lines, and join
    /// what is left with single newlines. The first occurrence of a line wins.
    pub fn normalize(&self, raw: &str) -> String {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut kept: Vec<&str> = Vec::new();
        let mut dropped = DropCounts::default();

        for line in raw.split('\n') {
            let line = line.trim();

            if line.is_empty() {
                dropped.empty += 1;
                continue;
            }
            if is_symbol_heavy(line) {
                dropped.symbols += 1;
                continue;
            }
            if let Some(rule) = self.denylist.matches(line) {
                debug!("Dropping line matching '{}' ({})", rule.pattern, rule.reason);
                dropped.artifacts += 1;
                continue;
            }
            if !seen.insert(line) {
                dropped.duplicates += 1;
                continue;
            }

            kept.push(line);
        }

        debug!(
            "Normalized text: kept {} lines, dropped {} empty, {} symbol-heavy, {} artifacts, {} duplicates",
            kept.len(),
            dropped.empty,
            dropped.symbols,
            dropped.artifacts,
            dropped.duplicates
        );

        let joined = kept.join("\n");
        RE_NEWLINE_RUNS.replace_all(&joined, "\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> String {
        Normalizer::default().normalize(raw)
    }

    #[test]
    fn test_scenario_noise_and_duplicates() {
        let raw = "Hello\nHello\n###???\ntesseract v4 estimating resolution\nWorld";
        assert_eq!(normalize(raw), "Hello\nWorld");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n   \n\t\n"), "");
    }

    #[test]
    fn test_only_noise() {
        let raw = "%%%%%%\nshow me\nC:\\Users\\me\\Desktop\n|||---|||";
        assert_eq!(normalize(raw), "");
    }

    #[test]
    fn test_trims_and_preserves_order() {
        let raw = "   third  \n\tfirst\nsecond   \r";
        assert_eq!(normalize(raw), "third\nfirst\nsecond");
    }

    #[test]
    fn test_symbol_density() {
        assert_eq!(symbol_density(""), 0.0);
        assert_eq!(symbol_density("abc 123"), 0.0);
        assert!((symbol_density("a!!!") - 0.75).abs() < f64::EPSILON);
        // Non-ASCII letters count as symbols.
        assert!((symbol_density("éé") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symbol_heavy_threshold() {
        // 6 of 10 is exactly at the limit and survives.
        assert!(!is_symbol_heavy("abcd!!!!!!"));
        // 7 of 10 does not.
        assert!(is_symbol_heavy("abc!!!!!!!"));
        assert!(is_symbol_heavy("a.b,c;!?@#"));
    }

    #[test]
    fn test_symbol_heavy_lines_never_survive() {
        let lines = ["abc!!!!!!!", "ab@@@@@@@@", "x1?????? .", "---===+++"];
        for line in lines {
            let raw = format!("Intro line\n{line}\nOutro line");
            let out = normalize(&raw);
            assert!(!out.lines().any(|l| l == line), "{line} survived");
        }
    }

    #[test]
    fn test_denylist_case_insensitive() {
        let denylist = ArtifactDenylist::default();
        assert!(denylist.matches("Tesseract Open Source OCR Engine").is_some());
        assert!(denylist.matches("Saved to DESKTOP folder").is_some());
        assert!(denylist.matches("Warning: Invalid resolution 0 dpi").is_some());
        assert!(denylist.matches("cd ~/scans").is_some());
        assert!(denylist.matches("A plain sentence").is_none());

        let rule = denylist.matches("SHOWCASE").unwrap();
        assert_eq!(rule.pattern, "show");
        assert_eq!(rule.reason, ARTIFACT_REASON);
    }

    #[test]
    fn test_denylisted_lines_never_survive() {
        let raw = "Keep this\nEstimating resolution as 300\nwe will SHOW you\nKeep that";
        assert_eq!(normalize(raw), "Keep this\nKeep that");
    }

    #[test]
    fn test_custom_denylist() {
        let denylist = ArtifactDenylist::new(vec![
            ArtifactRule::new("WATERMARK"),
            ArtifactRule::new(""),
        ]);
        assert_eq!(denylist.rules().len(), 1);
        let normalizer = Normalizer::new(denylist);

        let raw = "Draft watermark\nReal content\ntesseract stays now";
        assert_eq!(
            normalizer.normalize(raw),
            "Real content\ntesseract stays now"
        );
    }

    #[test]
    fn test_duplicates_are_case_sensitive_after_trim() {
        let raw = "Header\n  Header  \nheader\nBody\nHeader";
        assert_eq!(normalize(raw), "Header\nheader\nBody");
    }

    #[test]
    fn test_duplicates_removed_across_document() {
        let raw = "Page footer\nPage one text\n\nPage footer\nPage two text\nPage footer";
        let out = normalize(raw);
        let lines: Vec<&str> = out.lines().collect();
        let unique: HashSet<&str> = lines.iter().copied().collect();
        assert_eq!(lines.len(), unique.len());
        assert_eq!(out, "Page footer\nPage one text\nPage two text");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "Hello\nHello\n###???\ntesseract v4 estimating resolution\nWorld",
            "  a  \n\n\n b \n a\n!!!!\nshow\n~/x\nc",
            "Line one\r\nLine two\r\n\r\nLine one\r\n",
            "Buy now!!\nBuy now!!\n50% off -- today only\n*** *** ***",
            "Olá, você está bem?\nçççç\nOk",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_no_blank_lines_in_output() {
        let out = normalize("a line\n\n\n\nanother line\n \n\nlast line\n");
        assert!(!out.contains("\n\n"));
        assert!(!out.starts_with('\n') && !out.ends_with('\n'));
    }

    #[test]
    fn test_artifact_rule_deserialize_default_reason() {
        let rules: Vec<ArtifactRule> =
            serde_json::from_str(r#"[{"pattern": "Scan"}, {"pattern": "page", "reason": "footer"}]"#)
                .unwrap();
        let denylist = ArtifactDenylist::new(rules);
        assert_eq!(denylist.rules()[0].pattern, "scan");
        assert_eq!(denylist.rules()[0].reason, ARTIFACT_REASON);
        assert_eq!(denylist.rules()[1].reason, "footer");
    }
}
