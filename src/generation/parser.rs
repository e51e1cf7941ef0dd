use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::error::GenerationError;

/// Finds the JSON payload candidate inside generated text.
pub trait JsonExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Option<String>;
}

/// Strips Markdown fences, then takes everything from the first `{` to the
/// last `}` inclusive.
///
/// Two top-level objects in one reply come out as a single span covering
/// both, which then fails to parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceSpan;

impl JsonExtractor for BraceSpan {
    fn extract(&self, text: &str) -> Option<String> {
        let cleaned = strip_fences(text);
        let start = cleaned.find('{')?;
        let end = cleaned.rfind('}')?;
        if end < start {
            return None;
        }
        Some(cleaned[start..=end].to_string())
    }
}

fn strip_fences(text: &str) -> String {
    lazy_static! {
        static ref FENCE_RE: Regex = Regex::new(r"```(?:json)?\n?").unwrap();
    }
    FENCE_RE.replace_all(text, "").into_owned()
}

/// Parses generated text with the default [`BraceSpan`] extractor.
pub fn parse(text: &str) -> Result<Value, GenerationError> {
    parse_with(&BraceSpan, text)
}

/// Extraction is lenient; the JSON itself is not repaired.
pub fn parse_with(extractor: &dyn JsonExtractor, text: &str) -> Result<Value, GenerationError> {
    let Some(candidate) = extractor.extract(text) else {
        debug!(raw = %text, "no JSON payload in generated text");
        return Err(GenerationError::Malformed {
            reason: "no JSON found in response".into(),
            raw: text.to_string(),
            candidate: None,
        });
    };

    serde_json::from_str::<Value>(&candidate).map_err(|e| {
        debug!(error = %e, raw = %text, candidate = %candidate, "generated JSON failed to parse");
        GenerationError::Malformed {
            reason: format!("invalid JSON structure: {}", e),
            raw: text.to_string(),
            candidate: Some(candidate),
        }
    })
}
