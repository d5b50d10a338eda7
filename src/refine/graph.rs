use petgraph::graphmap::NodeTrait;
use petgraph::prelude::DiGraphMap;
use petgraph::Direction;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

/// Adjacent segments reached by one move; road graphs branch rarely,
/// so small lists stay inline.
pub type EdgeList<S> = SmallVec<[S; 4]>;

/// Read-only view of the road/transit graph the coarse route was
/// computed on. The refiner only ever asks for one-hop adjacency and
/// per-segment traversal cost; everything else about the road model
/// stays with the caller.
pub trait RouteGraph {
    /// Atomic directed edge instance of the road graph; the unit a
    /// route is made of. Small, copyable, no ownership semantics.
    type Segment: Copy + Eq + Hash + Debug;

    /// Segments reachable by one forward move out of `segment`.
    fn outgoing_edges(&self, segment: &Self::Segment) -> EdgeList<Self::Segment>;

    /// Segments from which `segment` is reachable by one forward move.
    fn ingoing_edges(&self, segment: &Self::Segment) -> EdgeList<Self::Segment>;

    /// Estimated traversal cost (time) of a single segment.
    fn segment_eta(&self, segment: &Self::Segment) -> f64;

    fn edges_directed(
        &self,
        segment: &Self::Segment,
        direction: Direction,
    ) -> EdgeList<Self::Segment> {
        match direction {
            Direction::Outgoing => self.outgoing_edges(segment),
            Direction::Incoming => self.ingoing_edges(segment),
        }
    }
}

/// In-memory [`RouteGraph`] over a [`DiGraphMap`], with traversal
/// costs kept in a side map.
///
/// Nodes of the underlying graph are the segments themselves and an
/// edge `a -> b` states that `b` can directly follow `a` on a route.
pub struct SegmentGraph<S: NodeTrait = i64> {
    graph: DiGraphMap<S, ()>,
    eta: FxHashMap<S, f64>,
}

impl<S: NodeTrait + Debug> SegmentGraph<S> {
    pub fn new() -> Self {
        Self {
            graph: DiGraphMap::new(),
            eta: FxHashMap::default(),
        }
    }

    /// Registers `segment` with its traversal cost. Re-adding a
    /// segment overwrites its cost.
    pub fn add_segment(&mut self, segment: S, eta: f64) {
        self.graph.add_node(segment);
        self.eta.insert(segment, eta);
    }

    /// States that `to` can directly follow `from` on a route.
    pub fn add_connection(&mut self, from: S, to: S) {
        self.graph.add_edge(from, to, ());
    }

    pub fn size(&self) -> usize {
        self.graph.node_count()
    }
}

impl<S: NodeTrait + Debug> Default for SegmentGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NodeTrait + Debug> RouteGraph for SegmentGraph<S> {
    type Segment = S;

    #[inline]
    fn outgoing_edges(&self, segment: &S) -> EdgeList<S> {
        self.graph
            .neighbors_directed(*segment, Direction::Outgoing)
            .collect()
    }

    #[inline]
    fn ingoing_edges(&self, segment: &S) -> EdgeList<S> {
        self.graph
            .neighbors_directed(*segment, Direction::Incoming)
            .collect()
    }

    /// # Panics
    /// If `segment` was never registered with [`SegmentGraph::add_segment`].
    #[inline]
    fn segment_eta(&self, segment: &S) -> f64 {
        self.eta[segment]
    }
}
