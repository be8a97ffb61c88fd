use crate::mmu::FaultResolution;

/// Running counters for the memory subsystem.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FaultStats {
    /// Accesses dispatched through `access`.
    pub accesses: u64,
    /// Accesses that translated on the first try.
    pub hits: u64,
    /// Page faults resolved by the fault handler.
    pub faults: u64,
    /// Faults that had to create a directory first.
    pub directory_allocs: u64,
    /// Faults that mapped a fresh page into an existing directory.
    pub zero_fills: u64,
    /// Copy-on-write upgrades.
    pub cow_upgrades: u64,
    /// Faults that found nothing to do.
    pub spurious: u64,
    /// Hard faults (out of memory, bad address).
    pub failures: u64,
    pub forks: u64,
    pub activations: u64,
}

impl FaultStats {
    pub(crate) fn record(&mut self, resolution: &FaultResolution) {
        self.faults += 1;
        match resolution {
            FaultResolution::DirectoryAlloc { .. } => self.directory_allocs += 1,
            FaultResolution::ZeroFill { .. } => self.zero_fills += 1,
            FaultResolution::CopyOnWrite { .. } => self.cow_upgrades += 1,
            FaultResolution::Spurious { .. } => self.spurious += 1,
        }
    }
}
