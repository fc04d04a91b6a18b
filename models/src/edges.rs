// models/src/edges.rs
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::ValidationError;

/// The kind of relationship an edge between two cluster instances records.
///
/// The crisp kinds are mutually exclusive per source cluster. `Fuzzy` tags the
/// raw edges laid down between every intersecting pair of adjacent clusters;
/// their graded kinds live in the edge's fuzzy-core map instead of the tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    Unchanged,
    Absorbed,
    Split,
    Dissolved,
    Merged,
    Reappear,
    Fuzzy,
}

impl TransitionType {
    /// All kinds that may appear as keys of a fuzzy-core map.
    pub const FUZZY_KINDS: [TransitionType; 5] = [
        TransitionType::Unchanged,
        TransitionType::Absorbed,
        TransitionType::Split,
        TransitionType::Dissolved,
        TransitionType::Merged,
    ];

    pub fn is_fuzzy_kind(&self) -> bool {
        Self::FUZZY_KINDS.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionType::Unchanged => "unchanged",
            TransitionType::Absorbed => "absorbed",
            TransitionType::Split => "split",
            TransitionType::Dissolved => "dissolved",
            TransitionType::Merged => "merged",
            TransitionType::Reappear => "reappear",
            TransitionType::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unchanged" => Ok(TransitionType::Unchanged),
            "absorbed" => Ok(TransitionType::Absorbed),
            "split" => Ok(TransitionType::Split),
            "dissolved" => Ok(TransitionType::Dissolved),
            "merged" => Ok(TransitionType::Merged),
            "reappear" => Ok(TransitionType::Reappear),
            "fuzzy" => Ok(TransitionType::Fuzzy),
            other => Err(ValidationError::UnknownTransitionType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TransitionType;

    #[test]
    fn should_round_trip_names() {
        for kind in TransitionType::FUZZY_KINDS {
            assert_eq!(kind.as_str().parse::<TransitionType>().unwrap(), kind);
        }
        assert_eq!("reappear".parse::<TransitionType>().unwrap(), TransitionType::Reappear);
        assert!("vanished".parse::<TransitionType>().is_err());
        assert!(!TransitionType::Reappear.is_fuzzy_kind());
        assert!(!TransitionType::Fuzzy.is_fuzzy_kind());
    }

    #[test]
    fn should_serialize_lowercase() {
        let json = serde_json::to_string(&TransitionType::Dissolved).unwrap();
        assert_eq!(json, "\"dissolved\"");
    }
}
