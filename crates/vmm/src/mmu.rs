// Translation and fault handling for the current process.
//
// The driver contract is: `translate` first; if it fails, call
// `handle_page_fault` for the same (kind, vpn) and translate again.
// `access` bundles that loop. Faults only ever touch the current process's
// own page table.

use types::{AccessKind, Pfn, Pte, VmError, VmResult, Vpn};

use crate::memory::PteDirectory;
use crate::system::System;

/// What the fault handler did to make a faulting access translatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultResolution {
    /// The directory was missing; it was created and the page mapped.
    DirectoryAlloc { pfn: Pfn },
    /// The directory existed but the PTE was invalid; the page was mapped.
    ZeroFill { pfn: Pfn },
    /// A write hit a shared read-only page; it now has a private copy.
    CopyOnWrite { old: Pfn, new: Pfn },
    /// The PTE already permitted the access.
    Spurious { pfn: Pfn },
}

impl System {
    /// Translate `vpn` of the current process to its frame.
    ///
    /// Fails with `Untranslatable` when the directory is absent, the PTE is
    /// invalid, or a write targets a read-only PTE. Never modifies any page
    /// table.
    pub fn translate(&self, kind: AccessKind, vpn: Vpn) -> VmResult<Pfn> {
        match self.current.pagetable.lookup(vpn) {
            Some(pte) if pte.permits(kind) => Ok(pte.pfn),
            _ => Err(VmError::Untranslatable),
        }
    }

    /// Resolve a fault for `vpn` in the current process.
    ///
    /// Cases, in order:
    /// 1. no directory: allocate one and map a fresh frame,
    /// 2. invalid PTE: map a fresh frame,
    /// 3. write to a read-only PTE: copy the shared frame into a fresh one
    ///    and make the PTE writable.
    ///
    /// Frame exhaustion leaves the page table untouched and is returned as
    /// `OutOfMemory`.
    pub fn handle_page_fault(&mut self, kind: AccessKind, vpn: Vpn) -> VmResult<FaultResolution> {
        let pid = self.current.pid;
        match self.resolve_fault(kind, vpn) {
            Ok(resolution) => {
                self.stats.record(&resolution);
                self.observer.on_fault(pid, kind, vpn, &resolution);
                Ok(resolution)
            }
            Err(err) => {
                self.stats.failures += 1;
                self.observer.on_fault_error(pid, kind, vpn, err);
                Err(err)
            }
        }
    }

    fn resolve_fault(&mut self, kind: AccessKind, vpn: Vpn) -> VmResult<FaultResolution> {
        if !vpn.is_mappable() {
            return Err(VmError::InvalidVpn(vpn.as_u32()));
        }
        let table = &mut self.current.pagetable;

        if table.directory(vpn.dir_index()).is_none() {
            let pfn = self.memory.alloc_zeroed()?;
            let mut dir = Box::<PteDirectory>::default();
            dir.ptes[vpn.pte_index()] = Pte::mapped(pfn);
            table.install(vpn.dir_index(), dir);
            return Ok(FaultResolution::DirectoryAlloc { pfn });
        }

        let pte = table
            .lookup_mut(vpn)
            .ok_or(VmError::InvalidVpn(vpn.as_u32()))?;

        if !pte.valid {
            let pfn = self.memory.alloc_zeroed()?;
            *pte = Pte::mapped(pfn);
            return Ok(FaultResolution::ZeroFill { pfn });
        }

        if kind.is_write() && !pte.writable {
            let old = pte.pfn;
            let new = self.memory.alloc_zeroed()?;
            self.memory.copy_frame(old, new)?;
            pte.pfn = new;
            pte.writable = true;
            return Ok(FaultResolution::CopyOnWrite { old, new });
        }

        Ok(FaultResolution::Spurious { pfn: pte.pfn })
    }

    /// Run one access the way the driver does: translate, fault on failure,
    /// then translate again.
    pub fn access(&mut self, kind: AccessKind, vpn: Vpn) -> VmResult<Pfn> {
        let pid = self.current.pid;
        self.stats.accesses += 1;

        let first = self.translate(kind, vpn);
        self.observer.on_translate(pid, kind, vpn, first.ok());
        if let Ok(pfn) = first {
            self.stats.hits += 1;
            return Ok(pfn);
        }

        self.handle_page_fault(kind, vpn)?;
        let retry = self.translate(kind, vpn);
        self.observer.on_translate(pid, kind, vpn, retry.ok());
        retry
    }

    /// Read one byte at `offset` inside page `vpn`, faulting it in if needed.
    pub fn read_byte(&mut self, vpn: Vpn, offset: usize) -> VmResult<u8> {
        if offset >= self.memory.frame_size() {
            return Err(VmError::InvalidOffset(offset));
        }
        let pfn = self.access(AccessKind::Read, vpn)?;
        self.memory.read_byte(pfn, offset)
    }

    /// Write one byte at `offset` inside page `vpn`. A shared page is given a
    /// private copy first.
    pub fn write_byte(&mut self, vpn: Vpn, offset: usize, value: u8) -> VmResult<()> {
        if offset >= self.memory.frame_size() {
            return Err(VmError::InvalidOffset(offset));
        }
        let pfn = self.access(AccessKind::Write, vpn)?;
        self.memory.write_byte(pfn, offset, value)
    }
}
