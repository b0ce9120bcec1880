//! Zarr hierarchy node paths and names.
//!
//! A node is a position in a Zarr hierarchy which is either an [`Array`](crate::array::Array) or a [`Group`](crate::group::Group).
//! Nodes are addressed by a [`NodePath`] such as `/measurements/temperature`, and the final path component is the node [`NodeName`].

use derive_more::Display;
use thiserror::Error;

use crate::storage::StorePrefix;

/// A Zarr hierarchy node path.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct NodePath(String);

/// An invalid node path.
#[derive(Debug, Error)]
#[error("invalid node path {0}")]
pub struct NodePathError(String);

impl NodePath {
    /// Create a new node path from `path`.
    ///
    /// # Errors
    /// Returns [`NodePathError`] if `path` is not valid according to [`NodePath::validate`].
    pub fn new(path: &str) -> Result<Self, NodePathError> {
        if Self::validate(path) {
            Ok(Self(path.to_string()))
        } else {
            Err(NodePathError(path.to_string()))
        }
    }

    /// The root node path.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Extracts a string slice containing the node path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the path of the child node called `name`.
    ///
    /// # Errors
    /// Returns [`NodeNameError`] if `name` is not a valid node name.
    pub fn child(&self, name: &str) -> Result<Self, NodeNameError> {
        if NodeName::validate(name) {
            if self.0 == "/" {
                Ok(Self(format!("/{name}")))
            } else {
                Ok(Self(format!("{}/{name}", self.0)))
            }
        } else {
            Err(NodeNameError(name.to_string()))
        }
    }

    /// Validates a path:
    /// - a path always starts with `/`,
    /// - a non-root path cannot end with `/`, and
    /// - a path cannot contain an empty node (a `//` substring).
    #[must_use]
    pub fn validate(path: &str) -> bool {
        path.eq("/") || (path.starts_with('/') && !path.ends_with('/') && !path.contains("//"))
    }
}

impl TryFrom<&str> for NodePath {
    type Error = NodePathError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl TryFrom<&StorePrefix> for NodePath {
    type Error = NodePathError;

    fn try_from(prefix: &StorePrefix) -> Result<Self, Self::Error> {
        let path = "/".to_string() + prefix.as_str().strip_suffix('/').unwrap_or("");
        Self::new(&path)
    }
}

/// The name of a Zarr hierarchy node, the final component of a [`NodePath`].
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct NodeName(String);

/// An invalid node name.
#[derive(Debug, Error)]
#[error("invalid node name {0}")]
pub struct NodeNameError(String);

impl NodeName {
    /// Create a new node name from `name`.
    ///
    /// # Errors
    /// Returns [`NodeNameError`] if `name` is not valid according to [`NodeName::validate`].
    pub fn new(name: &str) -> Result<Self, NodeNameError> {
        if Self::validate(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(NodeNameError(name.to_string()))
        }
    }

    /// Extracts a string slice containing the node name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a name:
    /// - a name is a non-empty string,
    /// - a name cannot contain `/`, and
    /// - a name cannot start with `.` (metadata keys such as `.zarray` are reserved).
    #[must_use]
    pub fn validate(name: &str) -> bool {
        !name.is_empty() && !name.contains('/') && !name.starts_with('.')
    }
}
