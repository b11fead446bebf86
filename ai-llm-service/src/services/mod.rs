pub mod chat_message;
pub mod open_ai_service;
