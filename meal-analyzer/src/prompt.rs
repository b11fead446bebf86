//! Prompt builder for the identify and revise flows.
//!
//! The model is forced into a single JSON object with `items` and `notes`.
//! Correction instructions are passed through verbatim; interpreting
//! "remove X" / "replace X with Y" is left to the model.

use std::fmt::Write;

use ai_llm_service::{
    config::model_variant::ModelVariant, services::chat_message::ChatMessage,
};
use serde_json::Value;

use crate::request::AnalyzeInput;

/// Output contract shared by both flows.
pub const SYSTEM_PROMPT: &str = "You are a nutrition assistant that estimates the macronutrients of meals. \
Reply with EXACTLY ONE JSON object and nothing else: no markdown, no code fences, no commentary. \
Shape: {\"items\":[{\"name\":\"...\",\"protein\":0,\"fat\":0,\"carbs\":0,\"kcal\":0}],\"notes\":\"...\"}. \
`protein`, `fat` and `carbs` are grams for the portion shown or described; `kcal` is an integer. \
Use the language of the user's text for `name` and `notes`. \
If no food can be recognized, return {\"items\":[],\"notes\":\"<short reason>\"}.";

/// Used when the client sends an image without any text.
pub const DEFAULT_IDENTIFY_PROMPT: &str =
    "Identify every food in this meal and estimate the portion and nutrition of each item.";

/// Mime type assumed for bare base64 images.
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Messages plus the model family they must be sent to.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPlan {
    pub variant: ModelVariant,
    pub messages: Vec<ChatMessage>,
}

/// Builds the chat messages for one request.
///
/// - revise mode with a previous result → correction instruction
/// - otherwise → identify instruction (default text when empty)
///
/// The message shape and model variant depend only on image presence.
pub fn build_prompt(input: &AnalyzeInput) -> PromptPlan {
    let instruction = match &input.prev_json {
        Some(prev) if input.is_revision() => revise_instruction(prev, &input.text),
        _ => identify_instruction(&input.text),
    };

    let user = match &input.image {
        Some(image) => ChatMessage::user_text_and_image(instruction, image_data_url(image)),
        None => ChatMessage::user_text(instruction),
    };

    PromptPlan {
        variant: ModelVariant::for_image(input.has_image()),
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), user],
    }
}

/// "From scratch" instruction using the user's description.
fn identify_instruction(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return DEFAULT_IDENTIFY_PROMPT.to_string();
    }

    let mut s = String::with_capacity(text.len() + 256);
    writeln!(s, "{DEFAULT_IDENTIFY_PROMPT}").ok();
    writeln!(s, "\nUser description:").ok();
    writeln!(s, "{text}").ok();
    s
}

/// Correction instruction combining the previous result and the user's edit.
fn revise_instruction(prev: &Value, correction: &str) -> String {
    let prev_serialized = serde_json::to_string(prev).unwrap_or_else(|_| "{}".into());
    let correction = correction.trim();

    let mut s = String::with_capacity(prev_serialized.len() + correction.len() + 512);
    writeln!(s, "Here is the previous analysis of the meal as JSON:").ok();
    writeln!(s, "{prev_serialized}").ok();
    writeln!(s, "\nThe user wants the following correction applied:").ok();
    writeln!(s, "{correction}").ok();
    writeln!(
        s,
        "\nApply the correction (it may remove, replace, add or keep only certain items, \
or change portions) and return the FULL updated result as a replacement JSON object \
in the same shape. Re-estimate the nutrition of any changed item."
    )
    .ok();
    s
}

/// Normalizes an image reference to something the `image_url` part accepts.
///
/// `data:` and `http(s)://` values pass through; bare base64 gets a JPEG data-URL prefix.
pub fn image_data_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("data:") || raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("data:{DEFAULT_IMAGE_MIME};base64,{raw}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::services::chat_message::{ContentPart, MessageContent};
    use serde_json::json;

    fn user_text(plan: &PromptPlan) -> String {
        match &plan.messages[1].content {
            MessageContent::Text(t) => t.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.clone()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect(),
        }
    }

    #[test]
    fn text_only_uses_plain_content_and_text_model() {
        let input = AnalyzeInput::new(Some("two boiled eggs".into()), None, None, None);
        let plan = build_prompt(&input);

        assert_eq!(plan.variant, ModelVariant::Text);
        assert_eq!(plan.messages.len(), 2);
        assert!(matches!(plan.messages[1].content, MessageContent::Text(_)));
        assert!(user_text(&plan).contains("two boiled eggs"));
    }

    #[test]
    fn image_uses_parts_and_vision_model() {
        let input = AnalyzeInput::new(None, Some("QUJD".into()), None, None);
        let plan = build_prompt(&input);

        assert_eq!(plan.variant, ModelVariant::Vision);
        assert!(plan.messages[1].has_image());
        assert_eq!(user_text(&plan), DEFAULT_IDENTIFY_PROMPT);

        let MessageContent::Parts(parts) = &plan.messages[1].content else {
            panic!("expected multimodal content");
        };
        assert!(parts.iter().any(|p| matches!(
            p,
            ContentPart::ImageUrl { image_url } if image_url.url == "data:image/jpeg;base64,QUJD"
        )));
    }

    #[test]
    fn empty_request_gets_default_instruction() {
        let plan = build_prompt(&AnalyzeInput::new(None, None, None, None));
        assert_eq!(plan.variant, ModelVariant::Text);
        assert_eq!(user_text(&plan), DEFAULT_IDENTIFY_PROMPT);
    }

    #[test]
    fn revise_embeds_previous_result_and_instruction() {
        let prev = json!({ "items": [{ "name": "rice", "protein": 2 }] });
        let input = AnalyzeInput::new(
            Some("replace rice with noodles".into()),
            None,
            Some("revise"),
            Some(prev),
        );
        let plan = build_prompt(&input);
        let text = user_text(&plan);

        assert!(text.contains(r#"{"items":[{"name":"rice","protein":2}]}"#));
        assert!(text.contains("replace rice with noodles"));
        assert!(text.contains("replacement JSON"));
        assert_eq!(plan.variant, ModelVariant::Text);
    }

    #[test]
    fn revise_without_previous_falls_back_to_identify() {
        let input = AnalyzeInput::new(Some("a salad".into()), None, Some("revise"), None);
        let text = user_text(&build_prompt(&input));
        assert!(text.starts_with(DEFAULT_IDENTIFY_PROMPT));
        assert!(!text.contains("previous analysis"));
    }

    #[test]
    fn revise_with_image_keeps_multimodal_shape() {
        let input = AnalyzeInput::new(
            Some("only keep the soup".into()),
            Some("https://img.example/meal.jpg".into()),
            Some("revise"),
            Some(json!({ "items": [] })),
        );
        let plan = build_prompt(&input);
        assert_eq!(plan.variant, ModelVariant::Vision);
        assert!(user_text(&plan).contains("only keep the soup"));
    }

    #[test]
    fn image_urls_pass_through() {
        assert_eq!(image_data_url("data:image/png;base64,AA"), "data:image/png;base64,AA");
        assert_eq!(image_data_url(" https://x/y.jpg "), "https://x/y.jpg");
        assert_eq!(image_data_url("AA=="), "data:image/jpeg;base64,AA==");
    }
}
