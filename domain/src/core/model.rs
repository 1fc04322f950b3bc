//! Model value object representing an LLM model

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available LLM models (Value Object)
///
/// The set is closed: every identifier maps to a route in the gateway
/// configuration, and adding a model means extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Model {
    Doubao,
    Qwen3,
    DeepSeekV3,
    DeepSeekR1,
    Gpt41,
    Gemini20Flash,
    Gemini25Pro,
}

impl Model {
    /// Every known model, in candidate-generation order.
    pub const ALL: [Model; 7] = [
        Model::Gemini20Flash,
        Model::DeepSeekR1,
        Model::Gpt41,
        Model::DeepSeekV3,
        Model::Qwen3,
        Model::Gemini25Pro,
        Model::Doubao,
    ];

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Doubao => "doubao",
            Model::Qwen3 => "qwen3",
            Model::DeepSeekV3 => "dsv3",
            Model::DeepSeekR1 => "dsr1",
            Model::Gpt41 => "gpt-4.1",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini25Pro => "gemini-2.5-pro",
        }
    }

    /// Models that draft candidates when none are configured.
    pub fn default_candidates() -> Vec<Model> {
        vec![
            Model::Gemini20Flash,
            Model::DeepSeekR1,
            Model::Gpt41,
            Model::DeepSeekV3,
            Model::Qwen3,
            Model::Gemini25Pro,
        ]
    }

    /// Whether the model is known to prepend reasoning spans to its answers.
    pub fn emits_reasoning(&self) -> bool {
        matches!(self, Model::DeepSeekR1 | Model::Gemini25Pro | Model::Qwen3)
    }
}

impl Default for Model {
    /// Returns the default model (DeepSeek R1)
    fn default() -> Self {
        Model::DeepSeekR1
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "doubao" => Ok(Model::Doubao),
            "qwen3" => Ok(Model::Qwen3),
            "dsv3" => Ok(Model::DeepSeekV3),
            "dsr1" => Ok(Model::DeepSeekR1),
            "gpt-4.1" => Ok(Model::Gpt41),
            "gemini-2.0-flash" => Ok(Model::Gemini20Flash),
            "gemini-2.5-pro" => Ok(Model::Gemini25Pro),
            other => Err(DomainError::InvalidModel(other.to_string())),
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
