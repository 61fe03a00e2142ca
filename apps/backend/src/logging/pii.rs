use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Patterns used when masking log fields. All are vetted literals.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    pub fn email() -> &'static Regex {
        static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL
    }

    /// `0x` followed by exactly 40 hex digits.
    pub fn wallet() -> &'static Regex {
        static WALLET: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b0x([0-9a-fA-F]{4})[0-9a-fA-F]{32}([0-9a-fA-F]{4})\b").unwrap()
        });
        &WALLET
    }

    /// Base64-like runs of 16+ chars (JWT segments, API keys).
    pub fn base64_token() -> &'static Regex {
        static BASE64_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}\b").unwrap()
        });
        &BASE64_TOKEN
    }

    pub fn hex_token() -> &'static Regex {
        static HEX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Fa-f0-9]{16,}\b").unwrap()
        });
        &HEX_TOKEN
    }
}

/// Masks emails (first char of the local part kept), wallet addresses
/// (first and last four digits kept) and opaque tokens.
///
/// Emails and wallets go first so the token patterns never see them whole.
pub fn redact(input: &str) -> String {
    let emails = PiiRegexRegistry::email().replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.find('@') {
            Some(0) | None => full.to_string(),
            Some(at) => format!("{}***{}", &full[..1], &full[at..]),
        }
    });

    let wallets = PiiRegexRegistry::wallet().replace_all(&emails, "0x$1..$2");
    let base64 = PiiRegexRegistry::base64_token().replace_all(&wallets, "[REDACTED_TOKEN]");

    PiiRegexRegistry::hex_token()
        .replace_all(&base64, "[REDACTED_TOKEN]")
        .to_string()
}

/// Applies [`redact`] when formatted, for use directly in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
