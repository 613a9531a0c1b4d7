//! Price series handling.
//!
//! Aligns heterogeneous price series onto one date index and rescales
//! trajectories for comparison.

mod align;
mod rebase;

pub use align::{align, AlignedHolding, AlignedSeries};
pub use rebase::{rebase, REBASE_REFERENCE};
