//! Headless document tree
//!
//! A small arena-backed stand-in for the browser document. Nodes carry a
//! tag, optional text, attributes, an inline style and a layout rectangle in
//! document coordinates. Every inline style write is counted so callers can
//! verify that an unmounted component stopped touching the tree.
//!
//! Nodes are addressed by [`NodeId`] (a slotmap key). Removing a subtree with
//! [`Document::clear_children`] frees the keys, so stale ids held by a
//! dangling callback simply stop resolving.

use crate::geometry::Rect;
use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::fmt::Write as _;

new_key_type! {
    /// Handle to a node in a [`Document`]
    pub struct NodeId;
}

/// 2D transform applied to a node (translate, rotate, scale)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    /// Rotation in degrees
    pub rotate: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        rotate: 0.0,
        scale: 1.0,
    };

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// CSS `transform` value for this transform
    pub fn to_css(&self) -> String {
        if self.is_identity() {
            return "none".to_string();
        }
        let mut css = format!(
            "translate3d({}px, {}px, 0)",
            self.translate_x, self.translate_y
        );
        if self.rotate != 0.0 {
            let _ = write!(css, " rotate({}deg)", self.rotate);
        }
        if self.scale != 1.0 {
            let _ = write!(css, " scale({})", self.scale);
        }
        css
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Inline style of a node
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub opacity: f32,
    pub transform: Transform,
    /// Free-form properties (`cursor`, `--spotlight-x`, ...)
    pub properties: IndexMap<String, String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transform: Transform::IDENTITY,
            properties: IndexMap::new(),
        }
    }
}

impl Style {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

#[derive(Debug)]
struct Node {
    tag: String,
    text: Option<String>,
    attributes: IndexMap<String, String>,
    children: SmallVec<[NodeId; 4]>,
    parent: Option<NodeId>,
    style: Style,
    rect: Rect,
    connected: bool,
    style_writes: u64,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: None,
            attributes: IndexMap::new(),
            children: SmallVec::new(),
            parent: None,
            style: Style::default(),
            rect: Rect::ZERO,
            connected: false,
            style_writes: 0,
        }
    }
}

/// Tag used for text nodes
pub const TEXT_TAG: &str = "#text";

/// The document tree
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    style_writes: u64,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut body = Node::new("body");
        body.connected = true;
        let root = nodes.insert(body);
        Self {
            nodes,
            root,
            style_writes: 0,
        }
    }

    /// The document body; always connected
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Node::new(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let mut node = Node::new(TEXT_TAG);
        node.text = Some(text.to_string());
        self.nodes.insert(node)
    }

    /// Append `child` to `parent`, moving it out of any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(parent) || !self.nodes.contains_key(child)
        {
            return;
        }
        self.detach(child);
        let connected = self.nodes[parent].connected;
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.set_connected(child, connected);
    }

    /// Detach a node from its parent; the subtree stays alive but disconnected
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        self.set_connected(node, false);
    }

    /// Detach a node and free it with its whole subtree
    pub fn delete(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        self.delete_subtree(node);
    }

    /// Delete every child subtree of `node`, freeing their ids
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node) else {
            return;
        };
        let children = std::mem::take(&mut parent.children);
        for child in children {
            self.delete_subtree(child);
        }
    }

    fn delete_subtree(&mut self, node: NodeId) {
        if let Some(removed) = self.nodes.remove(node) {
            for child in removed.children {
                self.delete_subtree(child);
            }
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != node);
        }
    }

    fn set_connected(&mut self, node: NodeId, connected: bool) {
        let mut stack: SmallVec<[NodeId; 8]> = SmallVec::new();
        stack.push(node);
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.get_mut(id) {
                n.connected = connected;
                stack.extend(n.children.iter().copied());
            }
        }
    }

    /// Whether the node exists and is attached to the document body
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.connected)
    }

    /// Whether the id still resolves to a node (connected or not)
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.tag.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Own text of a node (text nodes, or elements given text directly)
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).and_then(|n| n.text.as_deref())
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.text = Some(text.to_string());
        }
    }

    /// Concatenated text of the node and all of its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        if let Some(text) = &n.text {
            out.push_str(text);
        }
        for child in &n.children {
            self.collect_text(*child, out);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.attributes.shift_remove(name);
        }
    }

    /// Walk from `node` up to the root, returning the first match
    pub fn closest<F>(&self, node: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&Document, NodeId) -> bool,
    {
        let mut current = Some(node);
        while let Some(id) = current {
            if !self.nodes.contains_key(id) {
                return None;
            }
            if predicate(self, id) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Layout rectangle in document coordinates
    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(node).map(|n| n.rect)
    }

    /// Assign a layout rectangle (the host has no layout engine)
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.rect = rect;
        }
    }

    pub fn style(&self, node: NodeId) -> Option<&Style> {
        self.nodes.get(node).map(|n| &n.style)
    }

    /// Mutate a node's inline style. Returns false if the node is gone.
    pub fn update_style<F>(&mut self, node: NodeId, f: F) -> bool
    where
        F: FnOnce(&mut Style),
    {
        let Some(n) = self.nodes.get_mut(node) else {
            return false;
        };
        f(&mut n.style);
        n.style_writes += 1;
        self.style_writes += 1;
        true
    }

    /// Total number of inline style writes since creation
    pub fn style_writes(&self) -> u64 {
        self.style_writes
    }

    /// Number of inline style writes to one node
    pub fn node_style_writes(&self, node: NodeId) -> u64 {
        self.nodes.get(node).map(|n| n.style_writes).unwrap_or(0)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
