//! Prompt construction and the offline fallback reply

use super::request::ReplyRequest;

/// The reply used whenever text generation is unavailable.
///
/// It does not depend on the tone or the received email.
pub const FALLBACK_REPLY: &str = "Dear Sender,

Thank you for your email. I have received your message and will review it carefully. I will respond to you shortly with the necessary information.

Best regards,";

/// Builds the instruction prompt sent to the text generation provider.
///
/// The email is fenced in triple quotes so the model reads it as data.
pub fn build_prompt(request: &ReplyRequest) -> String {
    format!(
        r#"
You are an AI email assistant.

Rules:
- Read the email carefully
- Understand its intent
- Generate a clear and relevant reply
- Use a {tone} tone
- Reply strictly based on the given email

Email:
"""
{email}
"""

Write a complete professional email reply.
"#,
        tone = request.tone().as_str().to_lowercase(),
        email = request.email_body(),
    )
}
