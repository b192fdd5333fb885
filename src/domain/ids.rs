//! Domain identifier types
//!
//! Repository objects are addressed by a numeric identifier together with the
//! kind of object it names. The newtypes here keep those two apart from plain
//! integers and strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric repository object identifier
///
/// # Examples
///
/// ```
/// use isalink::domain::ids::ObjectId;
///
/// let id: ObjectId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Creates a new ObjectId
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| format!("Invalid object ID '{s}': {e}"))
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Kind of repository entity that can receive or supply metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Top-level container of datasets
    Project,
    /// Container of images
    Dataset,
    /// Container of plates (high-content screening)
    Screen,
    /// A single image
    Image,
}

impl EntityKind {
    /// Kinds accepted as import targets
    pub const IMPORT_TARGETS: [EntityKind; 3] =
        [EntityKind::Project, EntityKind::Dataset, EntityKind::Screen];

    /// Kinds accepted as export sources
    pub const EXPORT_SOURCES: [EntityKind; 2] = [EntityKind::Dataset, EntityKind::Image];

    /// Display name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Project => "Project",
            EntityKind::Dataset => "Dataset",
            EntityKind::Screen => "Screen",
            EntityKind::Image => "Image",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "project" => Ok(EntityKind::Project),
            "dataset" => Ok(EntityKind::Dataset),
            "screen" => Ok(EntityKind::Screen),
            "image" => Ok(EntityKind::Image),
            _ => Err(format!(
                "Invalid entity kind: {s}. Expected one of: project, dataset, screen, image"
            )),
        }
    }
}

/// Reference to one entity: its kind plus its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity kind
    pub kind: EntityKind,

    /// Entity identifier
    pub id: ObjectId,
}

impl EntityRef {
    /// Creates a new entity reference
    pub fn new(kind: EntityKind, id: impl Into<ObjectId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ID {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_parse() {
        let id: ObjectId = " 17 ".parse().unwrap();
        assert_eq!(id, ObjectId::new(17));
        assert!("abc".parse::<ObjectId>().is_err());
        assert!("-1".parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("Project".parse::<EntityKind>().unwrap(), EntityKind::Project);
        assert_eq!("dataset".parse::<EntityKind>().unwrap(), EntityKind::Dataset);
        assert_eq!("SCREEN".parse::<EntityKind>().unwrap(), EntityKind::Screen);
        assert_eq!("image".parse::<EntityKind>().unwrap(), EntityKind::Image);
        assert!("plate".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_ref_display() {
        let target = EntityRef::new(EntityKind::Screen, 5);
        assert_eq!(target.to_string(), "Screen ID 5");
    }

    #[test]
    fn test_entity_kind_serialization() {
        let json = serde_json::to_string(&EntityKind::Dataset).unwrap();
        assert_eq!(json, "\"dataset\"");
        let kind: EntityKind = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(kind, EntityKind::Image);
    }
}
