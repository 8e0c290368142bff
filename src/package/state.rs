// src/package/state.rs

//! Mutable per-package flags owned by the package set

use std::ops::BitOr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PkgFlags(u8);

impl PkgFlags {
    pub const NONE: PkgFlags = PkgFlags(0);
    /// Selected directly by the user
    pub const HAND_MARK: PkgFlags = PkgFlags(1 << 0);
    /// Selected because something marked needs it
    pub const DEP_MARK: PkgFlags = PkgFlags(1 << 1);
    /// Has an unsatisfiable requirement, directly or transitively
    pub const UNMET_DEPS: PkgFlags = PkgFlags(1 << 2);
    /// Obsoleted by another package of the set
    pub const OBSOLETED: PkgFlags = PkgFlags(1 << 3);

    pub fn contains(self, other: PkgFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: PkgFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: PkgFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: PkgFlags) {
        self.0 &= !other.0;
    }
}

impl BitOr for PkgFlags {
    type Output = PkgFlags;

    fn bitor(self, rhs: PkgFlags) -> PkgFlags {
        PkgFlags(self.0 | rhs.0)
    }
}

/// Resolver-owned state of one package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PkgState {
    flags: PkgFlags,
}

impl PkgState {
    pub fn flags(&self) -> PkgFlags {
        self.flags
    }

    pub fn hand_mark(&mut self) {
        self.flags.insert(PkgFlags::HAND_MARK);
    }

    pub fn dep_mark(&mut self) {
        self.flags.insert(PkgFlags::DEP_MARK);
    }

    pub fn unmark(&mut self) {
        self.flags.remove(PkgFlags::HAND_MARK | PkgFlags::DEP_MARK);
    }

    pub fn is_marked(&self) -> bool {
        self.flags.intersects(PkgFlags::HAND_MARK | PkgFlags::DEP_MARK)
    }

    pub fn is_hand_marked(&self) -> bool {
        self.flags.contains(PkgFlags::HAND_MARK)
    }

    pub fn is_dep_marked(&self) -> bool {
        self.flags.contains(PkgFlags::DEP_MARK)
    }

    pub fn has_unmet_deps(&self) -> bool {
        self.flags.contains(PkgFlags::UNMET_DEPS)
    }

    pub fn set_unmet_deps(&mut self) {
        self.flags.insert(PkgFlags::UNMET_DEPS);
    }

    pub fn is_obsoleted(&self) -> bool {
        self.flags.contains(PkgFlags::OBSOLETED)
    }

    pub fn set_obsoleted(&mut self) {
        self.flags.insert(PkgFlags::OBSOLETED);
    }

    /// Forget everything a resolution run derived, keeping the marks
    pub fn clear_derived(&mut self) {
        self.flags.remove(PkgFlags::UNMET_DEPS | PkgFlags::OBSOLETED);
    }
}
