//! Sensitive data redaction for diagnostic output
//!
//! Pattern-based masking of tokens, API keys, temporary S3 credentials and
//! presigned URL signatures.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// The replacement string used for redacted values
pub const REDACTED: &str = "[REDACTED]";

static REDACTION_PATTERNS: LazyLock<Vec<RedactionPattern>> = LazyLock::new(|| {
    vec![
        // Authorization header with Bearer token
        RedactionPattern::new(r"(?i)(Authorization:\s*Bearer\s+)\S+", |caps| {
            format!("{}{REDACTED}", &caps[1])
        }),
        // API key header
        RedactionPattern::new(r"(?i)(X-API-Key:\s*)\S+", |caps| {
            format!("{}{REDACTED}", &caps[1])
        }),
        // Secret fields in JSON, snake and camel case
        RedactionPattern::new(
            r#"("(?:access_token|accessToken|token|api_key|apiKey|secretKey|secret_key|sessionToken|session_token|accessKey)"\s*:\s*")[^"]*""#,
            |caps| format!("{}{REDACTED}\"", &caps[1]),
        ),
        // Secret fields in YAML
        RedactionPattern::new(r"(?m)^(\s*(?:access-token|x-api-key)\s*:\s*).+$", |caps| {
            format!("{}{REDACTED}", &caps[1])
        }),
        // Presigned URL signatures and security tokens
        RedactionPattern::new(
            r"(?i)([?&](?:X-Amz-Signature|X-Amz-Security-Token|X-Amz-Credential|Signature)=)[^&\s]+",
            |caps| format!("{}{REDACTED}", &caps[1]),
        ),
        // Credentials in URLs (user:password@host)
        RedactionPattern::new(r"(://[^:/\s]+:)[^@\s]+(@)", |caps| {
            format!("{}{REDACTED}{}", &caps[1], &caps[2])
        }),
    ]
});

/// A pattern for detecting and redacting sensitive data
pub struct RedactionPattern {
    regex: Regex,
    replacer: Box<dyn Fn(&regex::Captures) -> String + Send + Sync>,
}

impl RedactionPattern {
    fn new<F>(pattern: &str, replacer: F) -> Self
    where
        F: Fn(&regex::Captures) -> String + Send + Sync + 'static,
    {
        Self {
            // Patterns are literals above and covered by tests
            regex: Regex::new(pattern).expect("Invalid redaction pattern"),
            replacer: Box::new(replacer),
        }
    }

    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.regex
            .replace_all(input, |caps: &regex::Captures| (self.replacer)(caps))
    }
}

impl std::fmt::Debug for RedactionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedactionPattern")
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// Redactor for sensitive data in strings
#[derive(Debug, Default, Clone, Copy)]
pub struct Redactor;

impl Redactor {
    pub fn new() -> Self {
        Self
    }

    /// Redact sensitive data from the input string
    pub fn redact<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut result: Cow<str> = Cow::Borrowed(input);

        for pattern in REDACTION_PATTERNS.iter() {
            let redacted = pattern.apply(result.as_ref());
            if let Cow::Owned(owned) = redacted {
                result = Cow::Owned(owned);
            }
        }

        result
    }

    /// Mask a secret value for display, keeping a short prefix
    pub fn mask(&self, secret: &str) -> String {
        let prefix: String = secret.chars().take(4).collect();
        if secret.chars().count() <= 8 {
            REDACTED.to_string()
        } else {
            format!("{prefix}…{REDACTED}")
        }
    }
}
