//! Maps guest PC to emitter label, stitching intra-trace branches together.

use std::collections::BTreeMap;

use crate::jit::emitter::{Emitter, Label};

/// An ordered guest-PC → label table.
///
/// A label exists for a PC only once an instruction at that PC has actually
/// been emitted; [`LabelTable::bind_new`] is what creates the entry. A
/// branch lowering that targets a PC with no entry yet (a forward jump this
/// generator hasn't reached, or one it never will) does not go through this
/// table at all — it routes through the shared `term` exit instead. This
/// generator never defers branch lowering, so there is no "referenced but
/// not yet positioned" state to track here.
#[derive(Debug, Default)]
pub struct LabelTable {
    entries: BTreeMap<u64, Label>,
}

impl LabelTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the label bound at `pc`, if an instruction has been emitted
    /// there.
    #[must_use]
    pub fn get(&self, pc: u64) -> Option<Label> {
        self.entries.get(&pc).copied()
    }

    /// Returns `true` if an instruction at `pc` has already been emitted.
    /// This is the check [`crate::jit::driver::TraceDriver`] uses to detect
    /// a PC revisit.
    #[must_use]
    pub fn is_bound(&self, pc: u64) -> bool {
        self.entries.contains_key(&pc)
    }

    /// Allocates a new label for `pc`, binds it at the current emit
    /// position, and records it as bound.
    ///
    /// # Panics
    ///
    /// Panics (debug assertion) if `pc` is already bound — callers must
    /// check [`LabelTable::is_bound`] first; a double-bind for the same PC
    /// indicates a driver bug, not a runtime condition.
    pub fn bind_new(&mut self, pc: u64, emitter: &mut dyn Emitter) -> Label {
        debug_assert!(!self.is_bound(pc), "PC {pc:#x} already has a bound label");
        let label = emitter.new_label();
        emitter.bind_label(label);
        self.entries.insert(pc, label);
        label
    }

    /// Number of PCs with a bound label.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no PC has been bound yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
