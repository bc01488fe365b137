//! Field path resolver (verb module)
//!
//! Turns dot-separated field paths into join steps and column references.

mod error;
mod resolve;
mod types;

pub use error::ResolveError;
pub use resolve::resolve_field;
pub use types::{JoinStep, ResolvedField};
