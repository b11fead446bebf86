/// Which family of model a request is routed to.
///
/// Requests carrying an image need a multimodal (vision) model; text-only
/// requests go to the cheaper text model.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::model_variant::ModelVariant;
///
/// assert_eq!(ModelVariant::for_image(true), ModelVariant::Vision);
/// assert_eq!(ModelVariant::for_image(false), ModelVariant::Text);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelVariant {
    /// Image-capable model (accepts `image_url` content parts).
    Vision,
    /// Text-only model.
    Text,
}

impl ModelVariant {
    /// Picks the variant solely from image presence.
    pub fn for_image(has_image: bool) -> Self {
        if has_image {
            ModelVariant::Vision
        } else {
            ModelVariant::Text
        }
    }

    /// Short lowercase label for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::Vision => "vision",
            ModelVariant::Text => "text",
        }
    }
}
