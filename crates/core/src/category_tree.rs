//! Category forest reconstruction
//!
//! Categories are stored flat, each pointing at an optional parent. This
//! module rebuilds the hierarchy as an owning tree under a synthetic root
//! (id 0, "Root") for display.
//!
//! Malformed input never fails the build. Nodes that cannot be placed are
//! left out of the tree and listed in [`CategoryForest::excluded`]:
//!
//! - a parent id that matches no category drops the node and its subtree;
//! - categories whose ancestry loops back on itself are never reachable
//!   from the root and are dropped;
//! - nodes deeper than the configured depth bound are dropped.
//!
//! Dropping orphans is intended: the tree shows what is reachable from the
//! top level, it does not repair data.
//!
//! # Example
//!
//! ```rust
//! use catalog_core::category_tree::CategoryTreeBuilder;
//! use catalog_core::model::Category;
//!
//! let categories = vec![
//!     Category::new(1, "Electronics", None),
//!     Category::new(2, "Laptops", Some(1)),
//!     Category::new(3, "Ghost", Some(99)),
//! ];
//!
//! let forest = CategoryTreeBuilder::new().build_forest(&categories);
//!
//! assert_eq!(forest.root.children.len(), 1);
//! assert_eq!(forest.root.children[0].children[0].name, "Laptops");
//! assert_eq!(forest.excluded.len(), 1);
//! ```

use crate::model::Category;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Id of the synthetic root node
pub const ROOT_ID: i64 = 0;

/// Depth bound applied by [`CategoryTreeBuilder::new`]
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// A category with its owned children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent_category_id: Option<i64>,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    fn root(children: Vec<CategoryNode>) -> Self {
        Self {
            id: ROOT_ID,
            name: "Root".to_string(),
            description: "Root category".to_string(),
            parent_category_id: None,
            children,
        }
    }

    fn from_category(category: &Category, children: Vec<CategoryNode>) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            parent_category_id: category.parent_category_id,
            children,
        }
    }

    /// Number of nodes in this subtree, excluding `self`
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&CategoryNode> = vec![self];
        while let Some(node) = stack.pop() {
            count += node.children.len();
            stack.extend(node.children.iter());
        }
        count
    }

    /// Levels below this node (0 for a leaf)
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&CategoryNode, usize)> = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        max_depth
    }

    /// Find a node by id in this subtree
    pub fn find(&self, id: i64) -> Option<&CategoryNode> {
        let mut stack: Vec<&CategoryNode> = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }
}

/// Why a category was left out of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The node's parent, or an ancestor's parent, does not exist
    MissingParent,
    /// The node's ancestry loops without reaching a top-level category
    Cycle,
    /// The node sits deeper than the depth bound
    DepthLimit,
}

/// A category that could not be placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedCategory {
    pub id: i64,
    pub parent_category_id: Option<i64>,
    pub reason: ExclusionReason,
}

/// Result of a forest build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryForest {
    /// Synthetic root owning every top-level category
    pub root: CategoryNode,
    /// Categories left out, in input order
    pub excluded: Vec<ExcludedCategory>,
}

impl CategoryForest {
    /// Number of excluded categories with the given reason
    pub fn excluded_count(&self, reason: ExclusionReason) -> usize {
        self.excluded.iter().filter(|e| e.reason == reason).count()
    }
}

/// Builds category forests from flat records
#[derive(Debug, Clone, Copy)]
pub struct CategoryTreeBuilder {
    max_depth: usize,
}

impl Default for CategoryTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTreeBuilder {
    /// Builder with [`DEFAULT_MAX_DEPTH`]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Builder with a custom depth bound; top-level categories are depth 1
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Configured depth bound
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Rebuild the hierarchy under a synthetic root
    ///
    /// Duplicate ids keep the last record, placed where the id first
    /// appeared. Children keep input order.
    pub fn build_forest(&self, categories: &[Category]) -> CategoryForest {
        let index = CategoryIndex::new(categories);
        let placed = index.walk_from_roots(self.max_depth);

        let root = CategoryNode::root(index.assemble(&placed));
        let excluded = index.classify_excluded(&placed);

        if !excluded.is_empty() {
            tracing::warn!(
                excluded = excluded.len(),
                missing_parent = excluded.iter().filter(|e| e.reason == ExclusionReason::MissingParent).count(),
                cycle = excluded.iter().filter(|e| e.reason == ExclusionReason::Cycle).count(),
                depth_limit = excluded.iter().filter(|e| e.reason == ExclusionReason::DepthLimit).count(),
                "Categories excluded from tree"
            );
        }

        CategoryForest { root, excluded }
    }

    /// Top-level categories with their subtrees, without the synthetic root
    pub fn build_tree_list(&self, categories: &[Category]) -> Vec<CategoryNode> {
        self.build_forest(categories).root.children
    }
}

/// Deduplicated view of the input with parent → children adjacency
struct CategoryIndex<'c> {
    order: Vec<i64>,
    by_id: HashMap<i64, &'c Category>,
    children: HashMap<i64, Vec<i64>>,
    roots: Vec<i64>,
}

impl<'c> CategoryIndex<'c> {
    fn new(categories: &'c [Category]) -> Self {
        let mut order = Vec::with_capacity(categories.len());
        let mut by_id: HashMap<i64, &Category> = HashMap::with_capacity(categories.len());

        for category in categories {
            if by_id.insert(category.id, category).is_none() {
                order.push(category.id);
            }
        }

        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut roots = Vec::new();
        for id in &order {
            match by_id[id].parent_category_id {
                None => roots.push(*id),
                Some(parent) => children.entry(parent).or_default().push(*id),
            }
        }

        Self { order, by_id, children, roots }
    }

    /// Depth-first walk from the top level; returns placed ids in preorder.
    fn walk_from_roots(&self, max_depth: usize) -> Vec<i64> {
        let mut placed = Vec::with_capacity(self.order.len());
        let mut visited: HashSet<i64> = HashSet::with_capacity(self.order.len());
        let mut stack: Vec<(i64, usize)> = self.roots.iter().rev().map(|id| (*id, 1)).collect();

        while let Some((id, depth)) = stack.pop() {
            if depth > max_depth || !visited.insert(id) {
                continue;
            }
            placed.push(id);

            if let Some(kids) = self.children.get(&id) {
                stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
            }
        }

        placed
    }

    /// Build owned nodes bottom-up from a preorder of placed ids.
    fn assemble(&self, placed: &[i64]) -> Vec<CategoryNode> {
        let mut built: HashMap<i64, CategoryNode> = HashMap::with_capacity(placed.len());

        // Reverse preorder visits every child before its parent.
        for id in placed.iter().rev() {
            let children = self
                .children
                .get(id)
                .map(|kids| kids.iter().filter_map(|kid| built.remove(kid)).collect())
                .unwrap_or_default();
            built.insert(*id, CategoryNode::from_category(self.by_id[id], children));
        }

        self.roots
            .iter()
            .filter_map(|id| built.remove(id))
            .collect()
    }

    fn classify_excluded(&self, placed: &[i64]) -> Vec<ExcludedCategory> {
        if placed.len() == self.order.len() {
            return Vec::new();
        }

        let placed: HashSet<i64> = placed.iter().copied().collect();
        let mut reasons: HashMap<i64, ExclusionReason> = HashMap::new();

        for id in &self.order {
            if placed.contains(id) || reasons.contains_key(id) {
                continue;
            }

            // Climb until the ancestry resolves, then label the whole path.
            let mut path = Vec::new();
            let mut on_path = HashSet::new();
            let mut current = *id;
            let reason = loop {
                if let Some(known) = reasons.get(&current) {
                    break *known;
                }
                if placed.contains(&current) {
                    break ExclusionReason::DepthLimit;
                }
                if !on_path.insert(current) {
                    break ExclusionReason::Cycle;
                }
                path.push(current);

                match self.by_id.get(&current).and_then(|c| c.parent_category_id) {
                    // Unplaced top-level node: only the depth bound does that.
                    None => break ExclusionReason::DepthLimit,
                    Some(parent) if !self.by_id.contains_key(&parent) => {
                        break ExclusionReason::MissingParent;
                    }
                    Some(parent) => current = parent,
                }
            };

            for node in path {
                reasons.insert(node, reason);
            }
        }

        self.order
            .iter()
            .filter_map(|id| {
                reasons.get(id).map(|reason| ExcludedCategory {
                    id: *id,
                    parent_category_id: self.by_id[id].parent_category_id,
                    reason: *reason,
                })
            })
            .collect()
    }
}
