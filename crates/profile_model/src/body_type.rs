//! Body type vocabulary used in marker labels

use serde::{Deserialize, Serialize};

/// The fixed set of body types a label segment can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Fit,
    Slim,
    Muscular,
    Average,
    Stocky,
    Chubby,
    Large,
}

impl BodyType {
    /// Every body type, in vocabulary order
    pub const ALL: [BodyType; 7] = [
        BodyType::Fit,
        BodyType::Slim,
        BodyType::Muscular,
        BodyType::Average,
        BodyType::Stocky,
        BodyType::Chubby,
        BodyType::Large,
    ];

    /// Lowercase label text
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::Fit => "fit",
            BodyType::Slim => "slim",
            BodyType::Muscular => "muscular",
            BodyType::Average => "average",
            BodyType::Stocky => "stocky",
            BodyType::Chubby => "chubby",
            BodyType::Large => "large",
        }
    }

    /// Match a whole label segment, ignoring ASCII case
    pub fn from_label(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|body_type| body_type.as_str().eq_ignore_ascii_case(segment))
    }
}

impl std::fmt::Display for BodyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
