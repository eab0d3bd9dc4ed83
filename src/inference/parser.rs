use super::InferenceError;

/// Locate the JSON array inside free-form model text. Two strategies in
/// order: a ```json fenced block, then a bare bracket scan from the first
/// `[` to the last `]`. If neither matches, the text is returned unchanged
/// and left to the strict decode to reject.
pub fn extract_json_array(text: &str) -> &str {
    if let Some(fence_start) = text.find("```json") {
        let content_start = fence_start + "```json".len();
        if let Some(fence_end) = text[content_start..].find("```") {
            return text[content_start..content_start + fence_end].trim();
        }
    }

    if let Some(open) = text.find('[') {
        if let Some(close) = text.rfind(']') {
            if close > open {
                return &text[open..=close];
            }
        }
    }

    text
}

/// Strictly decode the extracted text as a sequence of disease names,
/// dropping blank entries.
pub fn parse_disease_names(json_array_text: &str) -> Result<Vec<String>, InferenceError> {
    let names: Vec<String> = serde_json::from_str(json_array_text)
        .map_err(|e| InferenceError::JsonParsing(e.to_string()))?;

    Ok(names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}
