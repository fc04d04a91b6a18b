// models/src/identifiers.rs

use core::ops::Deref;
use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use internment::Intern;

use crate::errors::{ValidationError, ValidationResult};

/// Separator between the timepoint label and the cluster index in a node ID.
pub const NODE_ID_DELIMITER: char = '_';

/// A timepoint label, e.g. a `MMDD` date string. Labels are interned since the
/// same handful of labels is repeated in every node ID of the graph.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timepoint(Intern<String>);

impl Timepoint {
    /// Creates a new timepoint.
    ///
    /// # Errors
    /// Returns a `ValidationError` if the label is empty or contains
    /// [`NODE_ID_DELIMITER`], which would make node IDs ambiguous.
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyTimepoint);
        }
        if value.contains(NODE_ID_DELIMITER) {
            return Err(ValidationError::TimepointContainsDelimiter(value));
        }

        Ok(Self(Intern::new(value)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Timepoint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Timepoint {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl FromStr for Timepoint {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Timepoint {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl From<Timepoint> for String {
    fn from(value: Timepoint) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialOrd for Timepoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timepoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/// Identifies a cluster instance: the cluster at position `index` of the
/// partition at `timepoint`.
///
/// Renders as `"{timepoint}_{index:02}"`. Ordering is structural (timepoint
/// label, then numeric index), so `0819_10` sorts after `0819_02` no matter
/// how many clusters a timepoint holds.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct NodeId {
    pub timepoint: Timepoint,
    pub index: usize,
}

impl NodeId {
    pub fn new(timepoint: Timepoint, index: usize) -> Self {
        Self { timepoint, index }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:02}", self.timepoint, NODE_ID_DELIMITER, self.index)
    }
}

impl FromStr for NodeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        let invalid = || ValidationError::InvalidNodeId(s.to_string());
        let (timepoint, index) = s.rsplit_once(NODE_ID_DELIMITER).ok_or_else(invalid)?;
        if index.len() < 2 || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let index = index.parse::<usize>().map_err(|_| invalid())?;
        let timepoint = Timepoint::new(timepoint).map_err(|_| invalid())?;
        Ok(Self { timepoint, index })
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeId, Timepoint};
    use crate::errors::ValidationError;
    use core::str::FromStr;

    #[test]
    fn should_not_create_empty_timepoint() {
        let timepoint = Timepoint::new("");
        assert_eq!(timepoint.unwrap_err(), ValidationError::EmptyTimepoint);
    }

    #[test]
    fn should_not_create_timepoint_with_delimiter() {
        let timepoint = Timepoint::new("2020_08_19");
        assert_eq!(
            timepoint.unwrap_err(),
            ValidationError::TimepointContainsDelimiter("2020_08_19".to_string())
        );
    }

    #[test]
    fn should_pad_index_to_two_digits() {
        let id = NodeId::new(Timepoint::new("0819").unwrap(), 3);
        assert_eq!(id.to_string(), "0819_03");

        let id = NodeId::new(Timepoint::new("0819").unwrap(), 42);
        assert_eq!(id.to_string(), "0819_42");
    }

    #[test]
    fn should_parse_node_id() {
        let id = NodeId::from_str("0902_07").unwrap();
        assert_eq!(id.timepoint.as_str(), "0902");
        assert_eq!(id.index, 7);
    }

    #[test]
    fn should_reject_unpadded_or_malformed_node_id() {
        assert!(NodeId::from_str("0902_7").is_err());
        assert!(NodeId::from_str("0902").is_err());
        assert!(NodeId::from_str("_07").is_err());
        assert!(NodeId::from_str("0902_x7").is_err());
    }

    #[test]
    fn should_order_indices_numerically() {
        let tp = Timepoint::new("0819").unwrap();
        let mut ids = vec![NodeId::new(tp, 100), NodeId::new(tp, 2), NodeId::new(tp, 10)];
        ids.sort();
        let indices: Vec<usize> = ids.iter().map(|id| id.index).collect();
        assert_eq!(indices, vec![2, 10, 100]);
    }

    #[test]
    fn should_serialize_node_id_as_string() {
        let id = NodeId::from_str("0820_01").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0820_01\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
