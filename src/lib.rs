#![doc = include_str!("../readme.md")]

pub mod refine;
pub use refine::*;
