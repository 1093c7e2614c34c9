use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

pub const DEFAULT_MAX_DEPTH: usize = 4;
pub const MAX_DEPTH_CEILING: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MaxDepth(usize);

impl MaxDepth {
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MaxDepth {
    fn default() -> Self {
        MaxDepth(DEFAULT_MAX_DEPTH)
    }
}

impl TryFrom<i64> for MaxDepth {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let depth = usize::try_from(value).map_err(|_| CoreError::InvalidDepth(value.to_string()))?;
        MaxDepth::try_from(depth)
    }
}

impl TryFrom<usize> for MaxDepth {
    type Error = CoreError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value > MAX_DEPTH_CEILING {
            return Err(CoreError::InvalidDepth(format!(
                "{value} exceeds ceiling {MAX_DEPTH_CEILING}"
            )));
        }
        Ok(MaxDepth(value))
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
