use serde::{Deserialize, Serialize};
use std::fmt;

/// 提出・フィードバックのコンテンツ種別を表すプラグインタグ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginType(String);

impl PluginType {
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("plugin type cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Infallible constructor for compile-time-known plugin tags.
    pub fn from_static(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
