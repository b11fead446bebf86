use meal_analyzer::AnalyzeInput;
use serde::Deserialize;
use serde_json::Value;

/// Request payload for POST /api/analyze.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    /// Meal description, or the correction instruction in revise mode.
    #[serde(default)]
    pub text: Option<String>,
    /// Data URL, http(s) URL or bare base64.
    #[serde(default)]
    pub image: Option<String>,
    /// `"identify"` (default) or `"revise"`.
    #[serde(default)]
    pub mode: Option<String>,
    /// Previous result to correct in revise mode.
    #[serde(default, rename = "prevJSON")]
    pub prev_json: Option<Value>,
}

impl AnalyzeRequest {
    pub fn into_input(self) -> AnalyzeInput {
        AnalyzeInput::new(self.text, self.image, self.mode.as_deref(), self.prev_json)
    }
}
