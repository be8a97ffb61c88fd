use types::{Pte, Vpn, NR_PAGETABLES};

use super::pte::PteDirectory;

/// Two-level page table owned by exactly one process.
///
/// The outer level is a fixed array of directory slots indexed by
/// `vpn / NR_PTES_PER_PAGE`; a slot stays `None` until the first fault in
/// its range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageTable {
    outer: [Option<Box<PteDirectory>>; NR_PAGETABLES],
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory(&self, idx: usize) -> Option<&PteDirectory> {
        self.outer.get(idx)?.as_deref()
    }

    pub fn directory_mut(&mut self, idx: usize) -> Option<&mut PteDirectory> {
        self.outer.get_mut(idx)?.as_deref_mut()
    }

    /// Place `dir` into slot `idx`, returning whatever was there before.
    pub fn install(&mut self, idx: usize, dir: Box<PteDirectory>) -> Option<Box<PteDirectory>> {
        let slot = self.outer.get_mut(idx)?;
        slot.replace(dir)
    }

    /// Walk both levels for `vpn`. `None` when the VPN is out of range or
    /// its directory is absent; an invalid PTE is still returned.
    pub fn lookup(&self, vpn: Vpn) -> Option<&Pte> {
        self.directory(vpn.dir_index())?.get(vpn.pte_index())
    }

    pub fn lookup_mut(&mut self, vpn: Vpn) -> Option<&mut Pte> {
        self.directory_mut(vpn.dir_index())?.get_mut(vpn.pte_index())
    }

    pub fn directory_count(&self) -> usize {
        self.outer.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn mapped_count(&self) -> usize {
        self.outer
            .iter()
            .flatten()
            .map(|dir| dir.valid_count())
            .sum()
    }

    /// All valid mappings in ascending VPN order.
    pub fn mappings(&self) -> impl Iterator<Item = (Vpn, Pte)> + '_ {
        self.outer
            .iter()
            .enumerate()
            .filter_map(|(dir_idx, slot)| slot.as_deref().map(|dir| (dir_idx, dir)))
            .flat_map(|(dir_idx, dir)| {
                dir.valid_entries()
                    .map(move |(pte_idx, pte)| (Vpn::from_indices(dir_idx, pte_idx), *pte))
            })
    }

    /// Produce the child's table for fork and downgrade this one to
    /// copy-on-write. Absent slots stay absent in the child.
    pub fn share_cow(&mut self) -> PageTable {
        let mut child = PageTable::new();
        for (parent, slot) in self.outer.iter_mut().zip(child.outer.iter_mut()) {
            if let Some(dir) = parent.as_deref_mut() {
                *slot = Some(Box::new(dir.share_cow()));
            }
        }
        child
    }
}
