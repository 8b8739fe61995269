//! Object, subject and query references.
//!
//! Text forms:
//!
//! | Type | Form | Example |
//! |------|------|---------|
//! | [`ObjectRef`] | `type:id` | `starship:orion` |
//! | [`SubjectRef`] | `type:id[#relation]` | `crew:bridge#member` |
//! | [`PermissionQuery`] | `resource#permission@subject` | `starship:orion#operate@user:picard` |
//! | [`Relationship`] | `resource#relation@subject` | `starship:orion#captain@user:picard` |
//!
//! Wire forms follow the service's JSON API (`objectType`, `objectId`,
//! `optionalRelation`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AuthzError, AuthzResult};

/// A typed object: `type:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_type: String,
    pub object_id: String,
}

impl ObjectRef {
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }
}

impl FromStr for ObjectRef {
    type Err = AuthzError;

    fn from_str(s: &str) -> AuthzResult<Self> {
        let (object_type, object_id) = s
            .split_once(':')
            .ok_or_else(|| AuthzError::invalid_reference(s, "expected type:id"))?;

        check_part(s, "object type", object_type)?;
        check_part(s, "object id", object_id)?;

        Ok(Self::new(object_type, object_id))
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

/// A subject: an object, or a subject set when a relation is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    pub object: ObjectRef,

    /// Empty on the wire means no relation.
    #[serde(
        default,
        serialize_with = "serialize_relation",
        deserialize_with = "deserialize_relation"
    )]
    pub optional_relation: Option<String>,
}

impl SubjectRef {
    pub fn new(object: ObjectRef) -> Self {
        Self {
            object,
            optional_relation: None,
        }
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.optional_relation = Some(relation.into());
        self
    }
}

impl From<ObjectRef> for SubjectRef {
    fn from(object: ObjectRef) -> Self {
        Self::new(object)
    }
}

impl FromStr for SubjectRef {
    type Err = AuthzError;

    fn from_str(s: &str) -> AuthzResult<Self> {
        match s.split_once('#') {
            Some((object, relation)) => {
                check_part(s, "subject relation", relation)?;
                Ok(Self::new(object.parse()?).with_relation(relation))
            }
            None => Ok(Self::new(s.parse()?)),
        }
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.optional_relation {
            Some(relation) => write!(f, "{}#{}", self.object, relation),
            None => write!(f, "{}", self.object),
        }
    }
}

fn serialize_relation<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.as_deref().unwrap_or_default())
}

fn deserialize_relation<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(d)?;
    Ok(value.filter(|v| !v.is_empty()))
}

/// Does `subject` have `permission` on `resource`?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionQuery {
    pub resource: ObjectRef,
    pub permission: String,
    pub subject: SubjectRef,
}

impl PermissionQuery {
    pub fn new(resource: ObjectRef, permission: impl Into<String>, subject: SubjectRef) -> Self {
        Self {
            resource,
            permission: permission.into(),
            subject,
        }
    }
}

impl FromStr for PermissionQuery {
    type Err = AuthzError;

    fn from_str(s: &str) -> AuthzResult<Self> {
        let (resource, permission, subject) = split_triple(s, "permission")?;
        Ok(Self::new(resource, permission, subject))
    }
}

impl fmt::Display for PermissionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.permission, self.subject)
    }
}

/// A stored relationship between a resource and a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub resource: ObjectRef,
    pub relation: String,
    pub subject: SubjectRef,
}

impl FromStr for Relationship {
    type Err = AuthzError;

    fn from_str(s: &str) -> AuthzResult<Self> {
        let (resource, relation, subject) = split_triple(s, "relation")?;
        Ok(Self {
            resource,
            relation,
            subject,
        })
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.relation, self.subject)
    }
}

/// Split `type:id#name@subject`; the subject may carry its own `#relation`.
fn split_triple(s: &str, name: &str) -> AuthzResult<(ObjectRef, String, SubjectRef)> {
    let (left, subject) = s.split_once('@').ok_or_else(|| {
        AuthzError::invalid_reference(s, format!("expected resource#{name}@subject"))
    })?;
    let (resource, middle) = left
        .rsplit_once('#')
        .ok_or_else(|| AuthzError::invalid_reference(s, format!("missing #{name}")))?;

    check_part(s, name, middle)?;

    Ok((resource.parse()?, middle.to_string(), subject.parse()?))
}

fn check_part(reference: &str, what: &str, part: &str) -> AuthzResult<()> {
    if part.is_empty() {
        return Err(AuthzError::invalid_reference(
            reference,
            format!("{what} is empty"),
        ));
    }
    if let Some(c) = part.chars().find(|c| matches!(c, ':' | '#' | '@') || c.is_whitespace()) {
        return Err(AuthzError::invalid_reference(
            reference,
            format!("{what} contains {c:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        let obj: ObjectRef = "starship:orion".parse().unwrap();
        assert_eq!(obj, ObjectRef::new("starship", "orion"));
        assert_eq!(obj.to_string(), "starship:orion");
    }

    #[test]
    fn test_parse_subject_set() {
        let subject: SubjectRef = "crew:bridge#member".parse().unwrap();
        assert_eq!(subject.object, ObjectRef::new("crew", "bridge"));
        assert_eq!(subject.optional_relation.as_deref(), Some("member"));
        assert_eq!(subject.to_string(), "crew:bridge#member");
    }

    #[test]
    fn test_query_roundtrip() {
        for text in ["a:b#c@d:e", "a:b#c@d:e#f"] {
            let query: PermissionQuery = text.parse().unwrap();
            assert_eq!(query.to_string(), text);
        }

        let query: PermissionQuery = "a:b#c@d:e#f".parse().unwrap();
        assert_eq!(query.resource, ObjectRef::new("a", "b"));
        assert_eq!(query.permission, "c");
        assert_eq!(query.subject.optional_relation.as_deref(), Some("f"));
    }

    #[test]
    fn test_relationship_roundtrip() {
        let rel: Relationship = "starship:orion#captain@user:picard".parse().unwrap();
        assert_eq!(rel.relation, "captain");
        assert_eq!(rel.to_string(), "starship:orion#captain@user:picard");
    }

    #[test]
    fn test_reject_invalid() {
        for bad in [
            "",
            "orion",
            ":orion",
            "starship:",
            "starship:orion",
            "starship:orion#operate",
            "starship:orion@user:picard",
            "starship:orion#@user:picard",
            "starship:orion#operate@user",
            "starship:orion#operate@user:picard#",
            "star ship:orion#operate@user:picard",
        ] {
            let result = bad.parse::<PermissionQuery>();
            assert!(
                matches!(result, Err(AuthzError::InvalidReference { .. })),
                "{bad:?} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_wire_format() {
        let subject: SubjectRef = "user:picard".parse().unwrap();
        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "object": {"objectType": "user", "objectId": "picard"},
                "optionalRelation": ""
            })
        );

        let parsed: SubjectRef =
            serde_json::from_str(r#"{"object":{"objectType":"crew","objectId":"bridge"}}"#)
                .unwrap();
        assert_eq!(parsed.optional_relation, None);

        let parsed: SubjectRef = serde_json::from_value(serde_json::json!({
            "object": {"objectType": "crew", "objectId": "bridge"},
            "optionalRelation": "member"
        }))
        .unwrap();
        assert_eq!(parsed.to_string(), "crew:bridge#member");
    }
}
