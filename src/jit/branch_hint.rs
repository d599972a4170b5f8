//! Compile-time branch direction prediction.
//!
//! Guessing which way a branch will go before it ever runs lets the
//! generator emit the predicted path as the straight-line continuation
//! and the other side as a taken jump, which is faster on hardware that
//! predicts straight-line code better than a jump. Its only effect is to
//! pick which of the two target-unbound exit sequences is the
//! fallthrough and which is the jumped-to side — it never affects
//! correctness, and is safe to omit.
//!
//! Interpreter register state belongs to an external collaborator, so
//! this crate does not reach into it directly; callers that want the
//! heuristic pass a [`BranchHint`] alongside each branch lowering.
//! [`BranchHint::Unknown`] is always a safe default.

/// A compile-time guess about which way a branch will go.
///
/// Only meaningful when *neither* the branch target nor the fallthrough PC
/// already has a bound label — that is the only shape with a genuine
/// choice to make; in every other case the shape is fully determined by
/// which side already has a label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BranchHint {
    /// No prediction available; treat the branch target as the "far" side
    /// needing a local label, and the fallthrough as the exit path. This
    /// is always correct, just not necessarily fast.
    #[default]
    Unknown,
    /// Predict the branch will be taken.
    Taken,
    /// Predict the branch will not be taken (falls through).
    NotTaken,
}
