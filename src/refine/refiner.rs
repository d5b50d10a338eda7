use itertools::Itertools;
use log::debug;
use measure_time::debug_time;
use petgraph::Direction;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

use crate::refine::bfs::{Bfs, FxIndexMap};
use crate::refine::graph::RouteGraph;
use crate::refine::interval::DisjointIntervals;

/// Hop cap of each backward search, and the narrowest route window
/// a detour is searched for.
pub const MAX_STEP: usize = 5;

/// Minimum ETA win for a detour to be worth splicing; filters out
/// floating-point noise and negligible improvements.
pub const WEIGHT_EPS: f64 = 1.0;

/// A proposed replacement of the coarse sub-range `[left, right]` by a
/// cheaper alternate path, winning `win_weight` ETA over it.
#[derive(Debug, Clone)]
pub struct Detour<S> {
    pub win_weight: f64,
    pub left: usize,
    pub right: usize,
    /// Alternate route from the coarse segment at `left` through to
    /// the one at `right`, in travel order.
    pub path: Vec<S>,
}

impl<S> Detour<S> {
    /// # Panics
    /// If the window is malformed (`left == 0` or `left >= right`) or
    /// the detour does not win anything.
    pub(crate) fn new(win_weight: f64, left: usize, right: usize, path: Vec<S>) -> Self {
        assert!(
            0 < left && left < right,
            "detour window [{left}, {right}] is malformed"
        );
        assert!(
            win_weight > 0.0,
            "detour over [{left}, {right}] must win over the coarse sub-path"
        );

        Self {
            win_weight,
            left,
            right,
            path,
        }
    }

    fn width(&self) -> usize {
        self.right - self.left
    }

    /// Splice priority: descending win; wins within [`WEIGHT_EPS`] of
    /// each other fall back to the wider window first.
    ///
    /// Near-tie equivalence is not transitive, so the relative order
    /// within a chain of pairwise near-ties is unspecified.
    pub(crate) fn priority(a: &Self, b: &Self) -> Ordering {
        if (a.win_weight - b.win_weight).abs() < WEIGHT_EPS {
            return b.width().cmp(&a.width());
        }

        b.win_weight.total_cmp(&a.win_weight)
    }
}

/// Traversal state of one backward search; one entry per visited
/// segment, discarded after the search.
#[derive(Debug, Clone, Copy)]
struct SegmentData {
    steps: usize,
    summary_eta: f64,
}

/// Post-processes a coarse leap route into a refined route of equal or
/// lower total ETA, preserving its first and last segment.
///
/// The refiner never alters the road graph and never searches beyond
/// [`MAX_STEP`] hops from any route position; it is a local repair, not
/// a shortest-path solver.
pub struct Refiner<'a, G: RouteGraph> {
    graph: &'a G,
    path: Vec<G::Segment>,
    /// `prefix_eta[i]` is the cumulative ETA of segments `[0..=i]`.
    prefix_eta: Vec<f64>,
    index: FxHashMap<G::Segment, usize>,
}

impl<'a, G: RouteGraph> Refiner<'a, G> {
    /// Builds the prefix ETAs and the segment-to-position index over
    /// the coarse route.
    ///
    /// # Panics
    /// If the coarse route visits the same segment twice.
    pub fn new(graph: &'a G, path: Vec<G::Segment>) -> Self {
        let mut prefix_eta = Vec::with_capacity(path.len());
        let mut index =
            FxHashMap::with_capacity_and_hasher(path.len(), Default::default());

        let mut total = 0.0;
        for (position, segment) in path.iter().enumerate() {
            total += graph.segment_eta(segment);
            prefix_eta.push(total);

            let previous = index.insert(*segment, position);
            assert!(
                previous.is_none(),
                "coarse route revisits segment {segment:?}"
            );
        }

        Self {
            graph,
            path,
            prefix_eta,
            index,
        }
    }

    /// Repairs the coarse route and returns the refined segment
    /// sequence. With no worthwhile detour found, the input comes back
    /// unchanged.
    pub fn refined_path(self) -> Vec<G::Segment> {
        debug_time!("leap repair over {} segments", self.path.len());

        let detours = self.calculate_detours();
        let candidates = detours.len();

        let mut scheduler = DisjointIntervals::new();
        let mut accepted = Vec::new();
        for detour in detours.into_iter().sorted_unstable_by(Detour::priority) {
            if scheduler.insert(detour.left, detour.right) {
                accepted.push(detour);
            }
        }

        debug!("accepted {} of {candidates} candidate detours", accepted.len());

        // Disjoint by construction, so left-endpoint order is total.
        accepted.sort_unstable_by_key(|detour| detour.left);

        let mut output = Vec::with_capacity(self.path.len());
        let mut resume = 0;
        for detour in accepted {
            assert!(resume <= detour.left, "accepted detours overlap");

            output.extend_from_slice(&self.path[resume..detour.left]);
            output.extend(detour.path);
            resume = detour.right + 1;
        }
        output.extend_from_slice(&self.path[resume..]);

        output
    }

    /// One hop-bounded backward search per route position `right`,
    /// emitting a [`Detour`] for every earlier position the search
    /// reaches more cheaply than the coarse sub-path in between.
    fn calculate_detours(&self) -> Vec<Detour<G::Segment>> {
        let bfs = Bfs::new(self.graph);
        let mut detours = Vec::new();

        for right in MAX_STEP..self.path.len() {
            let seed = self.path[right];

            let mut visited: FxIndexMap<G::Segment, SegmentData> = FxIndexMap::default();
            visited.insert(
                seed,
                SegmentData {
                    steps: 0,
                    summary_eta: self.graph.segment_eta(&seed),
                },
            );

            let tree = bfs.run(seed, Direction::Incoming, |state| {
                if visited.contains_key(&state.vertex) {
                    return false;
                }

                let parent = visited[&state.parent];
                if parent.steps == MAX_STEP {
                    return false;
                }

                visited.insert(
                    state.vertex,
                    SegmentData {
                        steps: parent.steps + 1,
                        summary_eta: parent.summary_eta
                            + self.graph.segment_eta(&state.vertex),
                    },
                );

                true
            });

            for (segment, data) in &visited {
                let Some(&left) = self.index.get(segment) else {
                    continue;
                };

                // Position 0 has no preceding prefix sum.
                if left == 0 || left >= right {
                    continue;
                }

                let prev_weight = self.prefix_eta[right] - self.prefix_eta[left - 1];
                let cur_weight = data.summary_eta;
                if prev_weight - WEIGHT_EPS <= cur_weight {
                    continue;
                }

                // Backward expansion leaves the target-to-start walk
                // already in travel order, left through right.
                detours.push(Detour::new(
                    prev_weight - cur_weight,
                    left,
                    right,
                    tree.reconstruct(*segment),
                ));
            }
        }

        detours
    }
}
