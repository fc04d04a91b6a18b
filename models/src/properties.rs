// models/src/properties.rs
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::edges::TransitionType;
use crate::errors::ValidationError;
use crate::identifiers::NodeId;

/// Linguistic label of a fuzzy membership degree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuzzyStrength {
    Weak,
    Medium,
    Strong,
}

impl FuzzyStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuzzyStrength::Weak => "weak",
            FuzzyStrength::Medium => "medium",
            FuzzyStrength::Strong => "strong",
        }
    }
}

impl fmt::Display for FuzzyStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuzzyStrength {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weak" => Ok(FuzzyStrength::Weak),
            "medium" => Ok(FuzzyStrength::Medium),
            "strong" => Ok(FuzzyStrength::Strong),
            other => Err(ValidationError::UnknownStrength(other.to_string())),
        }
    }
}

/// One exported transition: `(source, target, type, strength, degree)`.
///
/// Serializes as a five-element JSON array, the flat shape downstream
/// visualization consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionTuple(
    pub NodeId,
    pub NodeId,
    pub TransitionType,
    pub FuzzyStrength,
    pub f64,
);

impl TransitionTuple {
    /// A crisp transition is always reported as `strong` with degree 1.
    pub fn crisp(source: NodeId, target: NodeId, transition_type: TransitionType) -> Self {
        Self(source, target, transition_type, FuzzyStrength::Strong, 1.0)
    }

    pub fn source(&self) -> NodeId {
        self.0
    }

    pub fn target(&self) -> NodeId {
        self.1
    }

    pub fn transition_type(&self) -> TransitionType {
        self.2
    }

    pub fn strength(&self) -> FuzzyStrength {
        self.3
    }

    pub fn degree(&self) -> f64 {
        self.4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_from_str() {
        assert_eq!("weak".parse::<FuzzyStrength>().unwrap(), FuzzyStrength::Weak);
        assert_eq!("strong".parse::<FuzzyStrength>().unwrap(), FuzzyStrength::Strong);
        assert_eq!(
            "huge".parse::<FuzzyStrength>().unwrap_err(),
            ValidationError::UnknownStrength("huge".to_string())
        );
    }

    #[test]
    fn test_crisp_tuple_serializes_as_array() {
        let tuple = TransitionTuple::crisp(
            "0819_00".parse().unwrap(),
            "0820_02".parse().unwrap(),
            TransitionType::Absorbed,
        );
        let json = serde_json::to_string(&tuple).unwrap();
        assert_eq!(json, r#"["0819_00","0820_02","absorbed","strong",1.0]"#);
        assert_eq!(tuple.degree(), 1.0);
        assert_eq!(tuple.strength(), FuzzyStrength::Strong);
    }
}
