use crate::core::AnalysisResult;
use anyhow::Result;

/// The full result as pretty JSON. `min_priority` does not apply here.
pub fn render_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
