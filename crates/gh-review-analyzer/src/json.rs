//! Extraction of review JSON from free-form model output.
//!
//! Models asked for bare JSON still occasionally wrap it in markdown fences
//! or prose. The extraction is tolerant: strip a fenced block if present,
//! then parse the first JSON object found, ignoring trailing text.

use crate::analyzer::AnalyzerError;
use crate::finding::ReviewResult;

/// Parse a model response into a `ReviewResult`.
pub fn parse_review_json(text: &str) -> Result<ReviewResult, AnalyzerError> {
    let candidate = extract_json_block(text);

    let start = candidate.find('{').ok_or_else(|| {
        AnalyzerError::InvalidResponse("no JSON object found in model response".to_string())
    })?;

    // Parse the first JSON value and ignore anything after it.
    let mut stream =
        serde_json::Deserializer::from_str(&candidate[start..]).into_iter::<ReviewResult>();

    match stream.next() {
        Some(Ok(result)) => Ok(result),
        Some(Err(e)) => Err(AnalyzerError::InvalidResponse(e.to_string())),
        None => Err(AnalyzerError::InvalidResponse(
            "empty model response".to_string(),
        )),
    }
}

/// Extract JSON content from a response that may be wrapped in ``` blocks.
fn extract_json_block(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let json_start = start + 7;
        if let Some(end) = text[json_start..].find("```") {
            return text[json_start..json_start + end].trim();
        }
    }
    if let Some(start) = text.find("```") {
        let block_start = start + 3;
        if let Some(end) = text[block_start..].find("```") {
            let candidate = text[block_start..block_start + end].trim();
            // Skip a language identifier line if present
            if let Some(nl) = candidate.find('\n') {
                let first_line = &candidate[..nl];
                if !first_line.starts_with('{') {
                    return candidate[nl + 1..].trim();
                }
            }
            return candidate;
        }
    }
    text.trim()
}
