use indexmap::IndexMap;
use petgraph::Direction;
use rustc_hash::FxHasher;
use std::collections::VecDeque;
use std::hash::{BuildHasherDefault, Hash};

use crate::refine::graph::RouteGraph;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// One traversed edge of a [`Bfs`] run: `vertex` was reached from
/// `parent`.
#[derive(Debug, Clone, Copy)]
pub struct BfsState<S> {
    pub vertex: S,
    pub parent: S,
}

/// Breadth-first expansion over a [`RouteGraph`], forward or backward,
/// with the visitor in control of both acceptance and termination.
pub struct Bfs<'a, G> {
    graph: &'a G,
}

impl<'a, G: RouteGraph> Bfs<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Expands level by level from `start`, following edges in
    /// `direction`, and calls `visit` once per traversed edge.
    ///
    /// Returning `true` records the parent link and enqueues the child.
    /// Returning `false` halts the **entire run** immediately; queued
    /// vertices are dropped, not just the current branch. Revisit
    /// filtering is the visitor's job, there is no internal seen-set.
    ///
    /// The parent links are owned by the returned [`BfsTree`]; nothing
    /// is carried over between runs.
    pub fn run<F>(&self, start: G::Segment, direction: Direction, mut visit: F) -> BfsTree<G::Segment>
    where
        F: FnMut(&BfsState<G::Segment>) -> bool,
    {
        let mut parents = FxIndexMap::default();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for vertex in self.graph.edges_directed(&current, direction) {
                let state = BfsState {
                    vertex,
                    parent: current,
                };

                if !visit(&state) {
                    return BfsTree { parents };
                }

                parents.insert(state.vertex, state.parent);
                queue.push_back(state.vertex);
            }
        }

        BfsTree { parents }
    }
}

/// Parent links recorded by a single [`Bfs::run`] invocation.
pub struct BfsTree<S> {
    parents: FxIndexMap<S, S>,
}

impl<S: Copy + Eq + Hash> BfsTree<S> {
    /// Walks parent links from `target` back to the run's start and
    /// returns the vertex sequence in target-to-start order.
    ///
    /// A target with no recorded parent yields just `[target]`.
    pub fn reconstruct(&self, target: S) -> Vec<S> {
        let mut path = vec![target];
        let mut next = target;

        while let Some(&parent) = self.parents.get(&next) {
            path.push(parent);
            next = parent;
        }

        path
    }

    /// Vertices the run accepted, in discovery order. The start vertex
    /// is not part of the tree (it has no parent).
    pub fn visited(&self) -> impl Iterator<Item = &S> {
        self.parents.keys()
    }
}
