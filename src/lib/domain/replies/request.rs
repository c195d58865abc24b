//! Reply request

use std::{fmt, str::FromStr};

use super::errors::ReplyRequestError;

/// The tone the generated reply should be written in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Formal
    Formal,

    /// Professional
    Professional,

    /// Friendly
    Friendly,
}

impl Tone {
    /// All supported tones
    pub const ALL: [Tone; 3] = [Tone::Formal, Tone::Professional, Tone::Friendly];

    /// The tone's display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "Formal",
            Self::Professional => "Professional",
            Self::Friendly => "Friendly",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = ReplyRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ReplyRequestError::UnknownTone(trimmed.to_string()))
    }
}

/// A request to compose a reply to a received email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyRequest {
    email_body: String,
    tone: Tone,
}

impl ReplyRequest {
    /// Creates a new reply request, rejecting empty email bodies.
    ///
    /// The body is kept verbatim, surrounding whitespace included.
    pub fn new(email_body: &str, tone: Tone) -> Result<Self, ReplyRequestError> {
        if email_body.trim().is_empty() {
            return Err(ReplyRequestError::EmptyEmailBody);
        }

        Ok(Self {
            email_body: email_body.to_string(),
            tone,
        })
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(email_body: &str, tone: Tone) -> Self {
        Self {
            email_body: email_body.to_string(),
            tone,
        }
    }

    /// The received email
    pub fn email_body(&self) -> &str {
        &self.email_body
    }

    /// The requested tone
    pub fn tone(&self) -> Tone {
        self.tone
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_tone_parses_case_insensitively() -> TestResult {
        assert_eq!("friendly".parse::<Tone>()?, Tone::Friendly);
        assert_eq!(" FORMAL ".parse::<Tone>()?, Tone::Formal);
        assert_eq!("Professional".parse::<Tone>()?, Tone::Professional);

        Ok(())
    }

    #[test]
    fn test_unknown_tone_is_rejected() {
        let result = "sarcastic".parse::<Tone>();

        assert_eq!(
            result,
            Err(ReplyRequestError::UnknownTone("sarcastic".to_string()))
        );
    }

    #[test]
    fn test_empty_email_body_is_rejected() {
        for body in ["", "   ", "\n\t  \r\n"] {
            assert_eq!(
                ReplyRequest::new(body, Tone::Formal),
                Err(ReplyRequestError::EmptyEmailBody)
            );
        }
    }

    #[test]
    fn test_email_body_is_kept_verbatim() -> TestResult {
        let request = ReplyRequest::new("  Hi there,\n\nSee you soon.\n", Tone::Friendly)?;

        assert_eq!(request.email_body(), "  Hi there,\n\nSee you soon.\n");
        assert_eq!(request.tone(), Tone::Friendly);

        Ok(())
    }
}
