use types::{Pte, NR_PTES_PER_PAGE};

/// Second-level table: one block of `NR_PTES_PER_PAGE` consecutive pages.
///
/// Directories are created lazily by the fault handler and are never shared
/// between processes; fork gives the child its own copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PteDirectory {
    pub ptes: [Pte; NR_PTES_PER_PAGE],
}

impl PteDirectory {
    pub fn get(&self, idx: usize) -> Option<&Pte> {
        self.ptes.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Pte> {
        self.ptes.get_mut(idx)
    }

    /// Iterate over valid entries with their index inside the directory.
    pub fn valid_entries(&self) -> impl Iterator<Item = (usize, &Pte)> {
        self.ptes.iter().enumerate().filter(|(_, pte)| pte.valid)
    }

    pub fn valid_count(&self) -> usize {
        self.ptes.iter().filter(|pte| pte.valid).count()
    }

    /// Build the child's copy of this directory for fork.
    ///
    /// Every valid entry is copied by PFN and both sides lose write
    /// permission, so the next write from either process faults. Invalid
    /// entries stay invalid in the child.
    pub fn share_cow(&mut self) -> PteDirectory {
        let mut child = PteDirectory::default();
        for (parent, slot) in self.ptes.iter_mut().zip(child.ptes.iter_mut()) {
            if parent.valid {
                parent.share();
                *slot = *parent;
            }
        }
        child
    }
}
