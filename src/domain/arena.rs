use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::unit::{Headcount, Unit, UnitKind, MAX_DEPTH};

/// Data payload for arena nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitData {
    /// Unique key used for parent links
    pub name: String,
    /// Label shown in reports
    pub label: String,
    pub kind: UnitKind,
    pub own_count: Headcount,
}

/// Node in the arena-based hierarchy.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: UnitData,
    /// Index of the owning composite, None for roots
    pub parent: Option<Index>,
    /// Indices of child nodes in attachment order
    pub children: Vec<Index>,
    /// Own count plus the totals of all children
    pub total: Headcount,
    /// Levels in the subtree rooted here, 1 while childless
    pub height: usize,
}

/// Name-addressed staging area for unit hierarchies.
///
/// Units are linked by index after insertion, so unlike owned `Unit` trees
/// the arena can express invalid links. `attach` rejects them: a node has at
/// most one parent, can never become its own ancestor, and no hierarchy grows
/// past [`MAX_DEPTH`] levels.
#[derive(Debug, Default)]
pub struct OrgArena {
    arena: Arena<ArenaNode>,
    names: HashMap<String, Index>,
    /// Insertion order, for deterministic root ordering
    order: Vec<Index>,
}

impl OrgArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self), fields(name = %data.name))]
    pub fn insert(&mut self, data: UnitData) -> DomainResult<Index> {
        if self.names.contains_key(&data.name) {
            return Err(DomainError::DuplicateUnit(data.name));
        }
        let name = data.name.clone();
        let total = data.own_count;
        let idx = self.arena.insert(ArenaNode {
            data,
            parent: None,
            children: Vec::new(),
            total,
            height: 1,
        });
        self.names.insert(name, idx);
        self.order.push(idx);
        Ok(idx)
    }

    pub fn lookup(&self, name: &str) -> Option<Index> {
        self.names.get(name).copied()
    }

    pub fn get(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    fn node(&self, idx: Index) -> DomainResult<&ArenaNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::UnknownUnit(format!("{:?}", idx)))
    }

    pub fn total(&self, idx: Index) -> Option<Headcount> {
        self.get(idx).map(|node| node.total)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Unit names with their current totals, in insertion order.
    pub fn totals(&self) -> impl Iterator<Item = (&str, Headcount)> + '_ {
        self.order
            .iter()
            .filter_map(|&idx| self.get(idx))
            .map(|node| (node.data.name.as_str(), node.total))
    }

    /// Units without a parent, in insertion order.
    pub fn roots(&self) -> Vec<Index> {
        self.order
            .iter()
            .copied()
            .filter(|&idx| self.get(idx).is_some_and(|node| node.parent.is_none()))
            .collect()
    }

    /// Walks from `idx` up to its root, starting with `idx` itself.
    pub fn ancestors(&self, idx: Index) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: Some(idx),
        }
    }

    /// Attaches `child` to `parent` and adds the child's total to every
    /// ancestor. On error the arena is left untouched.
    ///
    /// The ancestor chain is walked once: it serves the cycle check, the
    /// depth check and the total/height updates.
    #[instrument(level = "debug", skip(self))]
    pub fn attach(&mut self, parent: Index, child: Index) -> DomainResult<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if parent_node.data.kind == UnitKind::Leaf {
            return Err(DomainError::UnsupportedOperation {
                label: parent_node.data.name.clone(),
                operation: format!("attach '{}'", child_node.data.name),
            });
        }
        if let Some(owner) = child_node.parent {
            return Err(DomainError::AlreadyAttached {
                child: child_node.data.name.clone(),
                parent: self.node(owner)?.data.name.clone(),
            });
        }

        let chain: Vec<(Index, &ArenaNode)> = self.ancestors(parent).collect();
        if chain.iter().any(|&(idx, _)| idx == child) {
            return Err(DomainError::CycleDetected {
                parent: parent_node.data.name.clone(),
                child: child_node.data.name.clone(),
            });
        }
        if chain.len() + child_node.height > MAX_DEPTH {
            return Err(DomainError::DepthExceeded {
                parent: parent_node.data.name.clone(),
                child: child_node.data.name.clone(),
                max: MAX_DEPTH,
            });
        }

        // Compute every new total before touching anything
        let delta = child_node.total;
        let child_height = child_node.height;
        let updates = chain
            .iter()
            .enumerate()
            .map(|(distance, &(idx, node))| {
                let height = node.height.max(child_height + distance + 1);
                node.total
                    .checked_add(delta)
                    .map(|total| (idx, total, height))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        for (idx, total, height) in updates {
            if let Some(node) = self.arena.get_mut(idx) {
                node.total = total;
                node.height = height;
            }
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        debug!("attached {:?} -> {:?}, delta {}", child, parent, delta);
        Ok(())
    }

    /// Levels in the deepest hierarchy, 0 for an empty arena.
    pub fn depth(&self) -> usize {
        self.roots()
            .into_iter()
            .filter_map(|root| self.get(root))
            .map(|node| node.height)
            .max()
            .unwrap_or(0)
    }

    /// Converts every root into an owned `Unit` tree.
    ///
    /// Recursion is bounded by [`MAX_DEPTH`], which `attach` enforces.
    #[instrument(level = "debug", skip(self))]
    pub fn to_units(&self) -> DomainResult<Vec<Unit>> {
        self.roots()
            .into_iter()
            .map(|root| self.build_unit(root))
            .collect()
    }

    fn build_unit(&self, idx: Index) -> DomainResult<Unit> {
        let node = self.node(idx)?;
        let mut unit = Unit::new(node.data.kind, node.data.label.clone(), node.data.own_count);
        for &child in &node.children {
            unit.attach(self.build_unit(child)?)?;
        }
        Ok(unit)
    }
}

pub struct Ancestors<'a> {
    arena: &'a OrgArena,
    next: Option<Index>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.arena.get(idx)?;
        self.next = node.parent;
        Some((idx, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(name: &str, kind: UnitKind, count: u64) -> UnitData {
        UnitData {
            name: name.to_string(),
            label: name.to_string(),
            kind,
            own_count: Headcount::new(count),
        }
    }

    #[test]
    fn given_chain_when_attaching_leaf_then_every_ancestor_grows() {
        let mut arena = OrgArena::new();
        let top = arena.insert(data("top", UnitKind::Composite, 1)).unwrap();
        let mid = arena.insert(data("mid", UnitKind::Composite, 2)).unwrap();
        let leaf = arena.insert(data("leaf", UnitKind::Leaf, 40)).unwrap();

        arena.attach(top, mid).unwrap();
        arena.attach(mid, leaf).unwrap();

        assert_eq!(arena.total(mid), Some(Headcount::new(42)));
        assert_eq!(arena.total(top), Some(Headcount::new(43)));
        assert_eq!(arena.roots(), vec![top]);
        assert_eq!(arena.depth(), 3);
    }

    #[test]
    fn given_ancestor_when_attaching_below_descendant_then_cycle_detected() {
        let mut arena = OrgArena::new();
        let a = arena.insert(data("a", UnitKind::Composite, 1)).unwrap();
        let b = arena.insert(data("b", UnitKind::Composite, 1)).unwrap();
        arena.attach(a, b).unwrap();

        let err = arena.attach(b, a).unwrap_err();
        assert!(matches!(err, DomainError::CycleDetected { .. }));

        let err = arena.attach(a, a).unwrap_err();
        assert!(matches!(err, DomainError::CycleDetected { .. }));
        assert_eq!(arena.total(a), Some(Headcount::new(2)));
    }

    #[test]
    fn given_attached_unit_when_attaching_again_then_already_attached() {
        let mut arena = OrgArena::new();
        let a = arena.insert(data("a", UnitKind::Composite, 0)).unwrap();
        let b = arena.insert(data("b", UnitKind::Composite, 0)).unwrap();
        let leaf = arena.insert(data("leaf", UnitKind::Leaf, 5)).unwrap();
        arena.attach(a, leaf).unwrap();

        let err = arena.attach(b, leaf).unwrap_err();
        assert_eq!(
            err,
            DomainError::AlreadyAttached {
                child: "leaf".into(),
                parent: "a".into()
            }
        );
        assert_eq!(arena.total(b), Some(Headcount::ZERO));
    }

    #[test]
    fn given_overflow_when_attaching_then_no_total_changes() {
        let mut arena = OrgArena::new();
        let top = arena.insert(data("top", UnitKind::Composite, u64::MAX)).unwrap();
        let mid = arena.insert(data("mid", UnitKind::Composite, 0)).unwrap();
        let leaf = arena.insert(data("leaf", UnitKind::Leaf, 1)).unwrap();
        arena.attach(top, mid).unwrap();

        assert!(arena.attach(mid, leaf).is_err());
        assert_eq!(arena.total(mid), Some(Headcount::ZERO));
        assert!(arena.get(mid).unwrap().children.is_empty());
        assert!(arena.get(leaf).unwrap().parent.is_none());
    }

    #[test]
    fn given_duplicate_name_when_inserting_then_rejected() {
        let mut arena = OrgArena::new();
        arena.insert(data("a", UnitKind::Leaf, 1)).unwrap();
        let err = arena.insert(data("a", UnitKind::Leaf, 2)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateUnit("a".into()));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn given_subtree_when_attached_then_heights_propagate_to_root() {
        let mut arena = OrgArena::new();
        let top = arena.insert(data("top", UnitKind::Composite, 0)).unwrap();
        let mid = arena.insert(data("mid", UnitKind::Composite, 0)).unwrap();
        let low = arena.insert(data("low", UnitKind::Composite, 0)).unwrap();
        let leaf = arena.insert(data("leaf", UnitKind::Leaf, 1)).unwrap();

        // Build bottom-up and top-down mixed
        arena.attach(low, leaf).unwrap();
        arena.attach(top, mid).unwrap();
        arena.attach(mid, low).unwrap();

        assert_eq!(arena.get(top).unwrap().height, 4);
        assert_eq!(arena.get(mid).unwrap().height, 3);
        assert_eq!(arena.depth(), 4);
        let totals: Vec<_> = arena.totals().collect();
        assert_eq!(
            totals,
            vec![
                ("top", Headcount::new(1)),
                ("mid", Headcount::new(1)),
                ("low", Headcount::new(1)),
                ("leaf", Headcount::new(1)),
            ]
        );
    }

    #[test]
    fn given_chain_at_max_depth_when_attaching_below_then_depth_exceeded() {
        let mut arena = OrgArena::new();
        let mut parent = arena.insert(data("c0", UnitKind::Composite, 1)).unwrap();
        for level in 1..MAX_DEPTH {
            let next = arena
                .insert(data(&format!("c{}", level), UnitKind::Composite, 1))
                .unwrap();
            arena.attach(parent, next).unwrap();
            parent = next;
        }
        assert_eq!(arena.depth(), MAX_DEPTH);
        let extra = arena.insert(data("extra", UnitKind::Leaf, 1)).unwrap();

        let err = arena.attach(parent, extra).unwrap_err();

        assert!(matches!(err, DomainError::DepthExceeded { max: MAX_DEPTH, .. }));
        assert!(arena.get(extra).unwrap().parent.is_none());
        assert_eq!(arena.depth(), MAX_DEPTH);
        assert_eq!(arena.to_units().unwrap()[0].depth(), MAX_DEPTH);
    }
}
