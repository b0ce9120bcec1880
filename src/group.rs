//! Zarr V2 groups.
//!
//! A group is a named container of child [`arrays`](crate::array::Array) and groups,
//! persisted as a `.zgroup` document, an optional `.zattrs` document, and one
//! subdirectory per child:
//! ```text
//! <group>/
//!   .zgroup         JSON: {"zarr_format": 2}
//!   .zattrs         JSON: free-form attributes (optional)
//!   <child>/        child array or group
//! ```
//!
//! On open, children are discovered by directory enumeration: a child directory with a
//! `.zarray` document loads as an array, one with a `.zgroup` document loads as a group,
//! and anything else is skipped.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{
    array::{Array, ArrayError},
    metadata::GroupMetadata,
    node::{NodeName, NodeNameError, NodePath},
    storage::{
        meta_key_array, meta_key_attributes, meta_key_group, node_prefix,
        ListableStorageTraits, ReadableStorageTraits, StorageError, WritableStorageTraits,
    },
};

/// A child node of a [`Group`]: an array or a group.
#[derive(Debug, PartialEq)]
pub enum Node {
    /// An array node.
    Array(Array),
    /// A group node.
    Group(Group),
}

impl From<Array> for Node {
    fn from(array: Array) -> Self {
        Self::Array(array)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

/// A Zarr V2 group: user attributes and named children, kept in name order.
#[derive(Debug, Default, PartialEq)]
pub struct Group {
    attributes: serde_json::Map<String, serde_json::Value>,
    children: BTreeMap<String, Node>,
}

impl Group {
    /// Create a new empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty group with user attributes.
    #[must_use]
    pub fn new_with_attributes(
        attributes: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            attributes,
            children: BTreeMap::default(),
        }
    }

    /// The user attributes of the group.
    #[must_use]
    pub fn attributes(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.attributes
    }

    /// Insert a child node called `name`, replacing any previous child with that name.
    ///
    /// # Errors
    /// Returns a [`NodeNameError`] if `name` is not a valid node name.
    pub fn insert(
        &mut self,
        name: &str,
        node: impl Into<Node>,
    ) -> Result<(), NodeNameError> {
        let name = NodeName::new(name)?;
        self.children.insert(name.as_str().to_string(), node.into());
        Ok(())
    }

    /// The children of the group, in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// The number of children of the group.
    #[must_use]
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// The child called `name`, or [`None`] if there is no such child.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// The child array called `name`, or [`None`] if there is no such array.
    #[must_use]
    pub fn array(&self, name: &str) -> Option<&Array> {
        match self.children.get(name) {
            Some(Node::Array(array)) => Some(array),
            _ => None,
        }
    }

    /// The child group called `name`, or [`None`] if there is no such group.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        match self.children.get(name) {
            Some(Node::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Store the group and all of its children in `storage` at `path`.
    ///
    /// Writes `<path>/.zgroup`, then `<path>/.zattrs` when attributes are present,
    /// then every child into its subdirectory in name order.
    ///
    /// # Errors
    /// Returns a [`GroupError`] if a child fails to store or there is an underlying store error.
    pub fn store<TStorage: ?Sized + WritableStorageTraits>(
        &self,
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<(), GroupError> {
        storage.set(
            &meta_key_group(path),
            &serde_json::to_vec_pretty(&GroupMetadata::default())?,
        )?;
        if !self.attributes.is_empty() {
            storage.set(
                &meta_key_attributes(path),
                &serde_json::to_vec_pretty(&self.attributes)?,
            )?;
        }
        for (name, node) in &self.children {
            let child_path = path.child(name)?;
            match node {
                Node::Array(array) => array.store(storage, &child_path)?,
                Node::Group(group) => group.store(storage, &child_path)?,
            }
        }
        Ok(())
    }

    /// Open a group and all of its children in `storage` at `path`.
    ///
    /// # Errors
    /// Returns a [`GroupCreateError`] if the group metadata is missing or invalid,
    /// a child fails to load, or there is an underlying store error.
    pub fn open<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<Self, GroupCreateError> {
        let metadata = storage
            .get(&meta_key_group(path))?
            .ok_or(GroupCreateError::MissingMetadata)?;
        let _metadata: GroupMetadata = serde_json::from_slice(&metadata)
            .map_err(|err| GroupCreateError::InvalidMetadata(err.to_string()))?;

        let attributes = match storage.get(&meta_key_attributes(path))? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| GroupCreateError::InvalidMetadata(err.to_string()))?,
            None => serde_json::Map::default(),
        };

        let mut children = BTreeMap::new();
        for child_prefix in storage.list_dir(&node_prefix(path))?.prefixes() {
            let name = child_prefix.name();
            let Ok(child_path) = path.child(name) else {
                continue;
            };
            let malformed = |source: Box<dyn std::error::Error + Send + Sync>| {
                GroupCreateError::MalformedChild {
                    name: name.to_string(),
                    source,
                }
            };
            if storage.key_exists(&meta_key_array(&child_path))? {
                let array = Array::open(storage, &child_path)
                    .map_err(|err| malformed(Box::new(err)))?;
                children.insert(name.to_string(), Node::Array(array));
            } else if storage.key_exists(&meta_key_group(&child_path))? {
                let group = Self::open(storage, &child_path)
                    .map_err(|err| malformed(Box::new(err)))?;
                children.insert(name.to_string(), Node::Group(group));
            }
        }

        Ok(Self {
            attributes,
            children,
        })
    }
}

/// A group operation error.
#[derive(Debug, Error)]
pub enum GroupError {
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// A child array error.
    #[error(transparent)]
    ArrayError(#[from] ArrayError),
    /// An invalid child name.
    #[error(transparent)]
    InvalidChildName(#[from] NodeNameError),
    /// An error serialising metadata.
    #[error(transparent)]
    MetadataSerializationError(#[from] serde_json::Error),
}

/// A group creation error, raised when opening a group.
#[derive(Debug, Error)]
pub enum GroupCreateError {
    /// Missing metadata (no `.zgroup`).
    #[error("group metadata is missing")]
    MissingMetadata,
    /// The metadata is malformed.
    #[error("group metadata is invalid: {0}")]
    InvalidMetadata(String),
    /// A child failed to load.
    #[error("failed to load child {name}: {source}")]
    MalformedChild {
        /// The child name.
        name: String,
        /// The failure.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
}
