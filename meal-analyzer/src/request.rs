//! Validated, transport-independent view of one analysis request.

use serde_json::Value;

use crate::{errors::AnalyzeResult, limits};

/// Analysis flow requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Recognize foods from scratch.
    #[default]
    Identify,
    /// Correct a previous result with a natural-language instruction.
    Revise,
}

impl Mode {
    /// Parses the wire value; anything other than `revise` (any case) is `Identify`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(m) if m.eq_ignore_ascii_case("revise") => Mode::Revise,
            _ => Mode::Identify,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Identify => "identify",
            Mode::Revise => "revise",
        }
    }
}

/// Input for [`crate::analyze`].
#[derive(Debug, Clone, Default)]
pub struct AnalyzeInput {
    /// Free text: a meal description, or the correction instruction in revise mode.
    pub text: String,
    /// Image as a data URL, an http(s) URL, or bare base64.
    pub image: Option<String>,
    pub mode: Mode,
    /// Previous structured result, used only in revise mode.
    pub prev_json: Option<Value>,
}

impl AnalyzeInput {
    /// Builds an input, dropping blank images and `null` previous results.
    pub fn new(
        text: Option<String>,
        image: Option<String>,
        mode: Option<&str>,
        prev_json: Option<Value>,
    ) -> Self {
        Self {
            text: text.unwrap_or_default(),
            image: image.filter(|i| !i.trim().is_empty()),
            mode: Mode::parse(mode),
            prev_json: prev_json.filter(|v| !v.is_null()),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// `true` when this request should run the correction flow.
    pub fn is_revision(&self) -> bool {
        self.mode == Mode::Revise && self.prev_json.is_some()
    }

    /// Checks the image ceiling.
    ///
    /// Empty text is allowed: the prompt builder then falls back to its
    /// default identify instruction.
    ///
    /// # Errors
    /// [`crate::AnalyzeError::PayloadTooLarge`] if the image is above its ceiling.
    pub fn validate(&self) -> AnalyzeResult<()> {
        match &self.image {
            Some(image) => limits::check_image_len(image),
            None => Ok(()),
        }
    }
}
