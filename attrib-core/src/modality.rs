//! Input modality vocabulary.
//!
//! A modality describes the data domain of a model's input. Facades accept
//! raw strings (single or list) and parse them into the closed [`Modality`]
//! enum; anything outside the enum fails fast with an error naming the
//! offending string.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The data domain of a model's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Image,
    Tabular,
    Text,
}

impl Modality {
    /// All supported modalities, in canonical order.
    pub const ALL: [Modality; 3] = [Modality::Image, Modality::Tabular, Modality::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Image => "image",
            Modality::Tabular => "tabular",
            Modality::Text => "text",
        }
    }

    /// Parse a modality string. Unrecognized strings fail with
    /// [`ConfigError::UnsupportedModality`] carrying the input verbatim.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        match input {
            "image" => Ok(Modality::Image),
            "tabular" => Ok(Modality::Tabular),
            "text" => Ok(Modality::Text),
            other => Err(ConfigError::UnsupportedModality {
                modality: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modality::parse(s)
    }
}

/// An ordered, non-empty list of modalities.
///
/// Single-modality models use a one-element list. For composites, the first
/// entry is the *primary* modality and drives scalar default resolution
/// (baseline, feature mask, channel dimension); the text-layer requirement
/// triggers when *any* entry is [`Modality::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modalities(Vec<Modality>);

impl Modalities {
    pub fn new(modalities: Vec<Modality>) -> Result<Self, ConfigError> {
        if modalities.is_empty() {
            return Err(ConfigError::EmptyModalities);
        }
        Ok(Self(modalities))
    }

    pub fn single(modality: Modality) -> Self {
        Self(vec![modality])
    }

    /// Parse a list of modality strings, failing on the first unsupported one.
    pub fn parse<S: AsRef<str>>(inputs: &[S]) -> Result<Self, ConfigError> {
        let parsed = inputs
            .iter()
            .map(|s| Modality::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    /// The primary modality, used for scalar default resolution.
    pub fn primary(&self) -> Modality {
        self.0[0]
    }

    pub fn contains(&self, modality: Modality) -> bool {
        self.0.contains(&modality)
    }

    /// Whether any entry is the text modality.
    pub fn has_text(&self) -> bool {
        self.contains(Modality::Text)
    }

    pub fn as_slice(&self) -> &[Modality] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Modality> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Modality> for Modalities {
    fn from(modality: Modality) -> Self {
        Self::single(modality)
    }
}

impl fmt::Display for Modalities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for m in &self.0 {
            if !first {
                f.write_str("+")?;
            }
            f.write_str(m.as_str())?;
            first = false;
        }
        Ok(())
    }
}
