use core::fmt;

use crate::address::Pfn;

/// Number of PTEs held by one page-table directory (`D`).
pub const NR_PTES_PER_PAGE: usize = 16;
/// Number of directory slots in the outer page table.
pub const NR_PAGETABLES: usize = 16;

/// Default size of one simulated frame in bytes.
pub const DEFAULT_FRAME_SIZE: usize = 4096;

/// Intent of a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    pub fn is_write(self) -> bool {
        matches!(self, AccessKind::Write)
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessKind::Read => "read",
            AccessKind::Write => "write",
        };
        f.pad(name)
    }
}

/// Leaf page table entry.
///
/// - `valid` gates the entry; a default PTE maps nothing.
/// - `writable` is cleared by fork to share the frame copy-on-write and is
///   set again only when the fault handler gives the page a private frame.
/// - `pfn` is meaningful only while `valid` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pte {
    pub pfn: Pfn,
    pub valid: bool,
    pub writable: bool,
}

impl Pte {
    /// A freshly mapped, private page.
    pub const fn mapped(pfn: Pfn) -> Self {
        Self {
            pfn,
            valid: true,
            writable: true,
        }
    }

    /// Whether an access of `kind` can go through without faulting.
    pub fn permits(&self, kind: AccessKind) -> bool {
        self.valid && (!kind.is_write() || self.writable)
    }

    /// Valid but read-only: the frame is shared copy-on-write.
    pub fn is_cow(&self) -> bool {
        self.valid && !self.writable
    }

    /// Drop write permission so the frame can be shared.
    pub fn share(&mut self) {
        self.writable = false;
    }

    /// Short permission tag used in dumps.
    pub fn perms(&self) -> &'static str {
        match (self.valid, self.writable) {
            (false, _) => "--",
            (true, false) => "r-",
            (true, true) => "rw",
        }
    }
}
