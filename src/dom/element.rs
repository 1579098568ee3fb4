//! Element - Lightweight DOM node handle.
//!
//! An [`Element`] is a cheap, clonable handle (`Rc`) to a node with a tag
//! name, an ordered attribute list, children and a weak parent link. Two
//! handles are equal when they point at the same node.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

// =============================================================================
// Flags
// =============================================================================

bitflags::bitflags! {
    /// Per-node markers written by the component layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        const NONE = 0;
        /// Node belongs to a content-free "pure" component.
        const PURE = 1 << 0;
        /// Node was mounted by a full component and is not eligible for the
        /// pure fast paths.
        const IMPURE = 1 << 1;
    }
}

// =============================================================================
// Attribute
// =============================================================================

/// A raw DOM attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// =============================================================================
// Node storage
// =============================================================================

thread_local! {
    /// Counter for unique node ids.
    static NODE_COUNTER: Cell<usize> = const { Cell::new(0) };
}

fn next_node_id() -> usize {
    NODE_COUNTER.with(|counter| {
        let id = counter.get();
        counter.set(id + 1);
        id
    })
}

pub(crate) struct Node {
    id: usize,
    tag_name: String,
    attributes: RefCell<Vec<Attribute>>,
    children: RefCell<Vec<Element>>,
    parent: RefCell<Weak<Node>>,
    flags: Cell<ElementFlags>,
}

// =============================================================================
// Element handle
// =============================================================================

/// Handle to a DOM element.
#[derive(Clone)]
pub struct Element(Rc<Node>);

/// Weak handle to a DOM element. Does not keep the node alive.
#[derive(Clone)]
pub struct WeakElement(Weak<Node>);

impl Element {
    /// Create a detached element.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self(Rc::new(Node {
            id: next_node_id(),
            tag_name: tag_name.into(),
            attributes: RefCell::new(Vec::new()),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            flags: Cell::new(ElementFlags::NONE),
        }))
    }

    /// Create a detached element with the given attributes.
    pub fn with_attributes<N, V, I>(tag_name: impl Into<String>, attributes: I) -> Self
    where
        N: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (N, V)>,
    {
        let element = Self::new(tag_name);
        for (name, value) in attributes {
            element.set_attribute(name, value);
        }
        element
    }

    /// Unique node id (stable for the node's lifetime).
    pub fn id(&self) -> usize {
        self.0.id
    }

    pub fn tag_name(&self) -> &str {
        &self.0.tag_name
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    /// Snapshot of the attributes in document order.
    pub fn attributes(&self) -> Vec<Attribute> {
        self.0.attributes.borrow().clone()
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.0
            .attributes
            .borrow()
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.attributes.borrow().iter().any(|attr| attr.name == name)
    }

    /// Set an attribute. Existing attributes keep their position.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let mut attributes = self.0.attributes.borrow_mut();
        match attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => attributes.push(Attribute { name, value }),
        }
    }

    /// Remove an attribute. Returns true if it was present.
    pub fn remove_attribute(&self, name: &str) -> bool {
        let mut attributes = self.0.attributes.borrow_mut();
        let before = attributes.len();
        attributes.retain(|attr| attr.name != name);
        attributes.len() != before
    }

    // -------------------------------------------------------------------------
    // Tree
    // -------------------------------------------------------------------------

    /// Append a child, detaching it from any previous parent first.
    pub fn append_child(&self, child: &Element) {
        child.remove();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    /// Snapshot of the children.
    pub fn children(&self) -> Vec<Element> {
        self.0.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<Element> {
        self.0.parent.borrow().upgrade().map(Element)
    }

    /// Detach this element from its parent. No-op when detached.
    pub fn remove(&self) {
        let parent = self.0.parent.replace(Weak::new()).upgrade();
        if let Some(parent) = parent {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(&child.0, &self.0));
        }
    }

    /// Detach every child.
    pub fn clear_children(&self) {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        for child in children {
            *child.0.parent.borrow_mut() = Weak::new();
        }
    }

    // -------------------------------------------------------------------------
    // Flags
    // -------------------------------------------------------------------------

    pub fn flags(&self) -> ElementFlags {
        self.0.flags.get()
    }

    /// Mark the node as mounted by a full component.
    pub fn mark_impure(&self) {
        let mut flags = self.0.flags.get();
        flags.remove(ElementFlags::PURE);
        flags.insert(ElementFlags::IMPURE);
        self.0.flags.set(flags);
    }

    /// Mark the node as owned by a pure component.
    pub fn mark_pure(&self) {
        let mut flags = self.0.flags.get();
        flags.remove(ElementFlags::IMPURE);
        flags.insert(ElementFlags::PURE);
        self.0.flags.set(flags);
    }

    /// `Some(true)` for pure nodes, `Some(false)` once marked impure,
    /// `None` if never marked.
    pub fn purity(&self) -> Option<bool> {
        let flags = self.0.flags.get();
        if flags.contains(ElementFlags::PURE) {
            Some(true)
        } else if flags.contains(ElementFlags::IMPURE) {
            Some(false)
        } else {
            None
        }
    }
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }

    /// True while the node is alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.0.id)
            .field("tag_name", &self.0.tag_name)
            .field("attributes", &self.0.attributes.borrow())
            .field("children", &self.0.children.borrow().len())
            .finish()
    }
}
