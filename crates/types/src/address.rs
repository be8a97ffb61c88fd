use core::fmt;

use crate::mmu::{NR_PAGETABLES, NR_PTES_PER_PAGE};

/// Virtual page number as seen by a process.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Vpn(pub u32);

impl Vpn {
    /// One past the highest VPN the two-level table can describe.
    pub const LIMIT: u32 = (NR_PTES_PER_PAGE * NR_PAGETABLES) as u32;

    /// Rebuild a VPN from its outer (directory) and inner (PTE) indices.
    pub const fn from_indices(dir: usize, pte: usize) -> Self {
        Self((dir * NR_PTES_PER_PAGE + pte) as u32)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Index of the directory slot in the outer table (`vpn / D`).
    pub fn dir_index(self) -> usize {
        self.0 as usize / NR_PTES_PER_PAGE
    }

    /// Index of the PTE inside its directory (`vpn % D`).
    pub fn pte_index(self) -> usize {
        self.0 as usize % NR_PTES_PER_PAGE
    }

    pub fn is_mappable(self) -> bool {
        self.0 < Self::LIMIT
    }
}

impl From<u32> for Vpn {
    fn from(value: u32) -> Self {
        Vpn(value)
    }
}

impl fmt::Debug for Vpn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vpn({})", self.0)
    }
}

impl fmt::Display for Vpn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Physical frame number handed out by the frame allocator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pfn(pub u32);

impl Pfn {
    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Pfn {
    fn from(value: u32) -> Self {
        Pfn(value)
    }
}

impl fmt::Debug for Pfn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pfn({})", self.0)
    }
}

impl fmt::Display for Pfn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
