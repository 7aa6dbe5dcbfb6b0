//! The mount surface: named anchors holding rendered view trees.

use std::collections::HashMap;

use crate::error::{ConsoleError, Result};

/// The well-known anchor the console mounts under.
pub const ROOT_ANCHOR: &str = "root";

/// A node in a rendered view tree.
///
/// Just enough structure to express component nesting; rendering to a
/// real display is the host's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode {
    name: String,
    children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), children: Vec::new() }
    }

    pub fn with_child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[ViewNode] {
        &self.children
    }

    /// Depth-first search for a descendant (or self) by name.
    pub fn find(&self, name: &str) -> Option<&ViewNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// Handle to one mounted subtree, used to unmount it later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountId {
    anchor: String,
    serial: u64,
}

impl MountId {
    /// The anchor this mount lives under.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }
}

impl std::fmt::Display for MountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.anchor, self.serial)
    }
}

/// A set of named anchors that rendered trees can be mounted under.
///
/// The host page's stand-in: anchors must exist before anything mounts
/// under them, and a mount against a missing anchor fails without
/// touching the surface.
#[derive(Debug, Default)]
pub struct Surface {
    anchors: HashMap<String, Vec<(u64, ViewNode)>>,
    next_serial: u64,
}

impl Surface {
    /// Creates a surface with no anchors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface with the well-known [`ROOT_ANCHOR`].
    pub fn with_root() -> Self {
        let mut surface = Self::new();
        surface.add_anchor(ROOT_ANCHOR);
        surface
    }

    /// Adds an empty anchor. Adding an existing anchor is a no-op and
    /// keeps its mounted content.
    pub fn add_anchor(&mut self, id: impl Into<String>) {
        self.anchors.entry(id.into()).or_default();
    }

    /// Whether an anchor exists.
    pub fn has_anchor(&self, id: &str) -> bool {
        self.anchors.contains_key(id)
    }

    /// Mounts a tree under an anchor.
    pub fn mount(&mut self, anchor: &str, node: ViewNode) -> Result<MountId> {
        let mounts = self
            .anchors
            .get_mut(anchor)
            .ok_or_else(|| ConsoleError::MountTargetMissing(anchor.to_string()))?;

        self.next_serial += 1;
        let serial = self.next_serial;
        mounts.push((serial, node));
        Ok(MountId { anchor: anchor.to_string(), serial })
    }

    /// Removes a previously mounted tree.
    pub fn unmount(&mut self, id: &MountId) -> Result<()> {
        let mounts = self
            .anchors
            .get_mut(&id.anchor)
            .ok_or_else(|| ConsoleError::UnknownMount(id.to_string()))?;

        let before = mounts.len();
        mounts.retain(|(serial, _)| *serial != id.serial);
        if mounts.len() == before {
            return Err(ConsoleError::UnknownMount(id.to_string()));
        }
        Ok(())
    }

    /// The trees mounted under an anchor, in mount order.
    pub fn children(&self, anchor: &str) -> Option<Vec<&ViewNode>> {
        self.anchors.get(anchor).map(|mounts| mounts.iter().map(|(_, node)| node).collect())
    }

    /// Total number of mounted trees across all anchors.
    pub fn mounted_count(&self) -> usize {
        self.anchors.values().map(Vec::len).sum()
    }
}
