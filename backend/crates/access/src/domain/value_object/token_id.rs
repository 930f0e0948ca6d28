//! Token Identifier
//!
//! Revocation entries are keyed by a short suffix of the token's signature
//! segment so raw credentials are never held in the deny-list.

use derive_more::Display;

/// Characters kept from the end of the final token segment.
pub const TOKEN_ID_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct TokenId(String);

impl TokenId {
    /// Last [`TOKEN_ID_LEN`] characters of the final `.`-separated segment,
    /// or of the whole token when that segment is empty.
    pub fn from_token(token: &str) -> Self {
        let last = token.rsplit('.').next().filter(|s| !s.is_empty()).unwrap_or(token);
        let start = last
            .char_indices()
            .rev()
            .nth(TOKEN_ID_LEN - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);
        Self(last[start..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
