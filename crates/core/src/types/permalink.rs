use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

const MAX_PERMALINK_LEN: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Permalink(String);

impl Permalink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Permalink {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidPermalink("empty permalink".to_string()));
        }
        if trimmed.len() > MAX_PERMALINK_LEN
            || !trimmed.starts_with('/')
            || trimmed.chars().any(|ch| ch.is_whitespace())
        {
            return Err(CoreError::InvalidPermalink(trimmed.to_string()));
        }
        let normalized = trimmed.trim_end_matches('/');
        if normalized.is_empty() {
            return Err(CoreError::InvalidPermalink(trimmed.to_string()));
        }
        Ok(Permalink(normalized.to_string()))
    }
}

impl fmt::Display for Permalink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
