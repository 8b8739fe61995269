//! Permission tree expansion: wire form and its simplified view.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reference::{ObjectRef, SubjectRef};

/// Expansion tree as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionTree {
    #[serde(default)]
    pub intermediate: Option<AlgebraicSubjectSet>,

    #[serde(default)]
    pub leaf: Option<DirectSubjectSet>,

    #[serde(default)]
    pub expanded_object: Option<ObjectRef>,

    #[serde(default)]
    pub expanded_relation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlgebraicSubjectSet {
    #[serde(default)]
    pub operation: WireOperation,

    #[serde(default)]
    pub children: Vec<PermissionTree>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectSubjectSet {
    #[serde(default)]
    pub subjects: Vec<SubjectRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum WireOperation {
    #[serde(rename = "OPERATION_UNION")]
    Union,
    #[serde(rename = "OPERATION_INTERSECTION")]
    Intersection,
    #[serde(rename = "OPERATION_EXCLUSION")]
    Exclusion,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// Set operation combining the children of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Union,
    Intersection,
    Exclusion,
    Unspecified,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersection => "INTERSECTION",
            Self::Exclusion => "EXCLUSION",
            Self::Unspecified => "UNSPECIFIED",
        }
    }
}

impl From<WireOperation> for Operation {
    fn from(op: WireOperation) -> Self {
        match op {
            WireOperation::Union => Self::Union,
            WireOperation::Intersection => Self::Intersection,
            WireOperation::Exclusion => Self::Exclusion,
            WireOperation::Unspecified => Self::Unspecified,
        }
    }
}

/// Simplified expansion node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionNode {
    pub relation: String,
    pub object: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PermissionNode>,
}

impl PermissionNode {
    pub fn new(relation: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            object: object.into(),
            operation: None,
            subjects: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl PermissionTree {
    /// Collapse the wire tree.
    ///
    /// Leaves list their subjects as strings. A union with a single child is
    /// replaced by that child.
    pub fn simplify(&self) -> PermissionNode {
        let object = self
            .expanded_object
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let mut node = PermissionNode::new(self.expanded_relation.clone(), object);

        if let Some(intermediate) = &self.intermediate {
            let operation = Operation::from(intermediate.operation);
            let mut children: Vec<PermissionNode> =
                intermediate.children.iter().map(Self::simplify).collect();

            if operation == Operation::Union && children.len() == 1 {
                return children.remove(0);
            }

            node.operation = Some(operation);
            node.children = children;
        } else if let Some(leaf) = &self.leaf {
            // subject sets are listed by object only, without their relation
            node.subjects = leaf.subjects.iter().map(|s| s.object.to_string()).collect();
        } else {
            debug!(relation = %node.relation, object = %node.object, "tree node has neither leaf nor intermediate");
        }

        node
    }
}
