//! Repairs a coarse "leap" route by splicing in cheaper local detours.
//!
//! One hop-bounded backward search runs per route position to discover
//! reconnections into earlier positions; discovered windows are ranked
//! by won ETA, thinned to a pairwise-disjoint set, and spliced back
//! into the route.

#[doc(hidden)]
pub mod bfs;
#[doc(hidden)]
pub mod graph;
#[doc(hidden)]
pub mod interval;
#[doc(hidden)]
pub mod refiner;


#[doc(inline)]
pub use bfs::{Bfs, BfsState, BfsTree};
#[doc(inline)]
pub use graph::{EdgeList, RouteGraph, SegmentGraph};
#[doc(inline)]
pub use interval::DisjointIntervals;
#[doc(inline)]
pub use refiner::{Detour, Refiner, MAX_STEP, WEIGHT_EPS};
