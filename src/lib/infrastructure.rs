//! Infrastructure adapters: configuration, HTTP, LLM and SMTP

pub mod config;
pub mod email;
pub mod http;
pub mod llm;
