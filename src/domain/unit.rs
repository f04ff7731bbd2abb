//! Organisational units: leaves and composites with rolled-up headcounts.
//!
//! A `Unit` owns its children. Attaching moves the child into the parent,
//! so a unit belongs to at most one composite and cycles cannot be built.
//! Totals are maintained incrementally on attach; since attached children are
//! only reachable through shared references afterwards, a cached total never
//! goes stale.
//!
//! Nesting is capped at [`MAX_DEPTH`] levels. Reports, rendering and drop all
//! recurse per level, so the cap keeps every walk within a fixed stack budget.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Maximum number of levels in a hierarchy, counting the root.
pub const MAX_DEPTH: usize = 256;

/// Non-negative number of employees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Headcount(u64);

impl Headcount {
    pub const ZERO: Headcount = Headcount(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Adds two headcounts, rejecting overflow.
    pub fn checked_add(self, other: Headcount) -> DomainResult<Headcount> {
        self.0
            .checked_add(other.0)
            .map(Headcount)
            .ok_or_else(|| {
                DomainError::InvalidArgument(format!("headcount overflow: {} + {}", self, other))
            })
    }
}

impl TryFrom<i64> for Headcount {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value).map(Headcount).map_err(|_| {
            DomainError::InvalidArgument(format!("headcount must not be negative: {}", value))
        })
    }
}

impl fmt::Display for Headcount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a unit can hold children. Fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    #[default]
    Leaf,
    Composite,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Leaf => write!(f, "leaf"),
            UnitKind::Composite => write!(f, "composite"),
        }
    }
}

/// Indivisible unit. Its total is its own count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    label: String,
    count: Headcount,
}

impl Leaf {
    pub fn new(label: impl Into<String>, count: Headcount) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn count(&self) -> Headcount {
        self.count
    }
}

/// Aggregating unit: its own base count plus the totals of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    label: String,
    own_count: Headcount,
    total_count: Headcount,
    /// Levels in this subtree, 1 while childless
    depth: usize,
    children: Vec<Unit>,
}

impl Composite {
    pub fn new(label: impl Into<String>, own_count: Headcount) -> Self {
        Self {
            label: label.into(),
            own_count,
            total_count: own_count,
            depth: 1,
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn own_count(&self) -> Headcount {
        self.own_count
    }

    pub fn total_count(&self) -> Headcount {
        self.total_count
    }

    pub fn children(&self) -> &[Unit] {
        &self.children
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Appends `child` and adds its total. On overflow, or when the subtree
    /// would grow past [`MAX_DEPTH`], nothing changes.
    #[instrument(level = "trace", skip(self, child), fields(parent = %self.label, child = %child.label()))]
    pub fn attach(&mut self, child: Unit) -> DomainResult<()> {
        let child_depth = child.depth();
        if child_depth >= MAX_DEPTH {
            return Err(DomainError::DepthExceeded {
                parent: self.label.clone(),
                child: child.label().to_string(),
                max: MAX_DEPTH,
            });
        }
        let total = self.total_count.checked_add(child.total_count())?;
        self.children.push(child);
        self.total_count = total;
        self.depth = self.depth.max(child_depth + 1);
        trace!("total now {}", self.total_count);
        Ok(())
    }
}

/// A node in the organisational hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Leaf(Leaf),
    Composite(Composite),
}

impl Unit {
    pub fn leaf(label: impl Into<String>, count: Headcount) -> Self {
        Unit::Leaf(Leaf::new(label, count))
    }

    pub fn composite(label: impl Into<String>, own_count: Headcount) -> Self {
        Unit::Composite(Composite::new(label, own_count))
    }

    pub fn new(kind: UnitKind, label: impl Into<String>, own_count: Headcount) -> Self {
        match kind {
            UnitKind::Leaf => Self::leaf(label, own_count),
            UnitKind::Composite => Self::composite(label, own_count),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Unit::Leaf(leaf) => leaf.label(),
            Unit::Composite(composite) => composite.label(),
        }
    }

    pub fn kind(&self) -> UnitKind {
        match self {
            Unit::Leaf(_) => UnitKind::Leaf,
            Unit::Composite(_) => UnitKind::Composite,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Unit::Leaf(_))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Unit::Composite(_))
    }

    pub fn own_count(&self) -> Headcount {
        match self {
            Unit::Leaf(leaf) => leaf.count(),
            Unit::Composite(composite) => composite.own_count(),
        }
    }

    pub fn total_count(&self) -> Headcount {
        match self {
            Unit::Leaf(leaf) => leaf.count(),
            Unit::Composite(composite) => composite.total_count(),
        }
    }

    /// Children in attachment order. Always empty for leaves.
    pub fn children(&self) -> &[Unit] {
        match self {
            Unit::Leaf(_) => &[],
            Unit::Composite(composite) => composite.children(),
        }
    }

    /// Attaches `child` to this unit.
    ///
    /// Fails with `UnsupportedOperation` on a leaf, with `DepthExceeded` past
    /// [`MAX_DEPTH`] levels and with `InvalidArgument` if the total would
    /// overflow. The receiver is unchanged on failure.
    pub fn attach(&mut self, child: Unit) -> DomainResult<()> {
        match self {
            Unit::Leaf(leaf) => Err(DomainError::UnsupportedOperation {
                label: leaf.label().to_string(),
                operation: format!("attach '{}'", child.label()),
            }),
            Unit::Composite(composite) => composite.attach(child),
        }
    }

    /// Builder-style `attach`.
    pub fn with_child(mut self, child: Unit) -> DomainResult<Self> {
        self.attach(child)?;
        Ok(self)
    }

    /// Number of levels in this subtree (a lone unit has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            Unit::Leaf(_) => 1,
            Unit::Composite(composite) => composite.depth(),
        }
    }

    /// Pre-order, depth-first traversal starting with `self`.
    pub fn iter(&self) -> UnitIter<'_> {
        UnitIter { stack: vec![self] }
    }

    /// Leaf units of this subtree, left to right.
    pub fn leaves(&self) -> Vec<&Unit> {
        self.iter().filter(|unit| unit.is_leaf()).collect()
    }

    /// First unit (pre-order) with the given label.
    pub fn find(&self, label: &str) -> Option<&Unit> {
        self.iter().find(|unit| unit.label() == label)
    }
}

impl From<Leaf> for Unit {
    fn from(leaf: Leaf) -> Self {
        Unit::Leaf(leaf)
    }
}

impl From<Composite> for Unit {
    fn from(composite: Composite) -> Self {
        Unit::Composite(composite)
    }
}

pub struct UnitIter<'a> {
    stack: Vec<&'a Unit>,
}

impl<'a> Iterator for UnitIter<'a> {
    type Item = &'a Unit;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children().iter().rev());
        Some(current)
    }
}
