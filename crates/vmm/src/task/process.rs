use crate::memory::PageTable;

pub type Pid = u32;

/// A simulated process: an identifier plus the page table it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid: Pid,
    pub pagetable: PageTable,
}

impl Process {
    /// A process with an empty address space.
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            pagetable: PageTable::new(),
        }
    }

    /// Fork a child with `pid` that shares every mapped frame with `self`.
    ///
    /// Both parent and child lose write permission on the shared pages.
    pub fn fork(&mut self, pid: Pid) -> Process {
        Process {
            pid,
            pagetable: self.pagetable.share_cow(),
        }
    }
}
