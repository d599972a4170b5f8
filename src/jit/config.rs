//! Trace code generator configuration.
//!
//! Exactly one configuration knob exists: a flag selecting whether to
//! emit human-readable trace log lines alongside the generated machine
//! code. It has no effect on the generated code itself.

/// Default configuration constants, mirroring the house convention of a
/// `defaults` submodule of named constants backing a `Default` impl.
mod defaults {
    /// Trace logging is off by default; callers opt in explicitly.
    pub const TRACE_LOG: bool = false;
}

/// Configuration for [`crate::jit::driver::TraceDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct JitConfig {
    /// When `true`, each lowering emits a `tracing::trace!` event carrying
    /// the guest PC and opcode being lowered.
    pub trace_log: bool,
}

impl Default for JitConfig {
    fn default() -> Self {
        Self {
            trace_log: defaults::TRACE_LOG,
        }
    }
}
