use vmm::{
    AccessKind, FaultResolution, FrameAllocator, Pfn, System, SystemConfig, VmError, Vpn,
};

fn system_with_frames(nr_frames: usize) -> System {
    System::new(SystemConfig {
        nr_frames: Some(nr_frames),
        frame_size: 32,
        init_pid: 1,
    })
    .unwrap()
}

#[test]
fn test_missing_directory_is_created() {
    let mut sys = system_with_frames(8);
    let res = sys.handle_page_fault(AccessKind::Read, Vpn(33)).unwrap();

    assert_eq!(res, FaultResolution::DirectoryAlloc { pfn: Pfn(0) });
    let table = &sys.current().pagetable;
    assert_eq!(table.directory_count(), 1);
    assert!(table.directory(2).is_some());
    let pte = table.lookup(Vpn(33)).unwrap();
    assert!(pte.valid && pte.writable);
    assert_eq!(pte.pfn, Pfn(0));
    // Only the faulting PTE is mapped in the new directory.
    assert_eq!(table.mapped_count(), 1);
}

#[test]
fn test_missing_pte_in_existing_directory() {
    let mut sys = system_with_frames(8);
    sys.handle_page_fault(AccessKind::Read, Vpn(0)).unwrap();
    let res = sys.handle_page_fault(AccessKind::Write, Vpn(1)).unwrap();

    assert_eq!(res, FaultResolution::ZeroFill { pfn: Pfn(1) });
    assert_eq!(sys.current().pagetable.directory_count(), 1);
    assert_eq!(sys.translate(AccessKind::Write, Vpn(1)), Ok(Pfn(1)));
}

#[test]
fn test_fault_then_translate_succeeds_for_every_kind() {
    let mut sys = system_with_frames(64);
    let cases = [
        (AccessKind::Read, 0),
        (AccessKind::Write, 15),
        (AccessKind::Read, 16),
        (AccessKind::Write, 200),
        (AccessKind::Write, Vpn::LIMIT - 1),
    ];
    for (kind, vpn) in cases {
        let vpn = Vpn(vpn);
        assert_eq!(sys.translate(kind, vpn), Err(VmError::Untranslatable));
        sys.handle_page_fault(kind, vpn).unwrap();
        assert!(sys.translate(kind, vpn).is_ok(), "{:?} {:?}", kind, vpn);
    }
}

#[test]
fn test_cow_upgrade_replaces_pfn_and_keeps_data() {
    let mut sys = system_with_frames(8);
    sys.write_byte(Vpn(5), 7, 0x5a).unwrap();
    sys.switch_process(2);

    let res = sys.handle_page_fault(AccessKind::Write, Vpn(5)).unwrap();

    assert_eq!(res, FaultResolution::CopyOnWrite { old: Pfn(0), new: Pfn(1) });
    let pte = sys.current().pagetable.lookup(Vpn(5)).copied().unwrap();
    assert!(pte.writable);
    assert_eq!(pte.pfn, Pfn(1));
    assert_eq!(sys.read_byte(Vpn(5), 7), Ok(0x5a));
}

#[test]
fn test_read_fault_on_shared_page_is_spurious() {
    let mut sys = system_with_frames(8);
    sys.handle_page_fault(AccessKind::Write, Vpn(3)).unwrap();
    sys.switch_process(9);

    let res = sys.handle_page_fault(AccessKind::Read, Vpn(3)).unwrap();
    assert_eq!(res, FaultResolution::Spurious { pfn: Pfn(0) });
    assert!(sys.current().pagetable.lookup(Vpn(3)).unwrap().is_cow());
    assert_eq!(sys.stats().spurious, 1);
}

#[test]
fn test_out_of_memory_leaves_table_untouched() {
    let mut sys = system_with_frames(1);
    sys.handle_page_fault(AccessKind::Write, Vpn(0)).unwrap();
    let before = sys.current().clone();

    assert_eq!(
        sys.handle_page_fault(AccessKind::Write, Vpn(40)),
        Err(VmError::OutOfMemory)
    );
    assert_eq!(
        sys.handle_page_fault(AccessKind::Write, Vpn(1)),
        Err(VmError::OutOfMemory)
    );
    assert_eq!(sys.current(), &before);
    assert_eq!(sys.stats().failures, 2);
}

#[test]
fn test_out_of_memory_during_cow_keeps_shared_mapping() {
    let mut sys = system_with_frames(1);
    sys.handle_page_fault(AccessKind::Write, Vpn(4)).unwrap();
    sys.switch_process(2);

    assert_eq!(sys.access(AccessKind::Write, Vpn(4)), Err(VmError::OutOfMemory));
    let pte = sys.current().pagetable.lookup(Vpn(4)).copied().unwrap();
    assert!(pte.is_cow());
    assert_eq!(pte.pfn, Pfn(0));
}

#[test]
fn test_vpn_outside_address_space_is_a_hard_fault() {
    let mut sys = system_with_frames(4);
    let err = sys
        .handle_page_fault(AccessKind::Read, Vpn(Vpn::LIMIT))
        .unwrap_err();
    assert_eq!(err, VmError::InvalidVpn(Vpn::LIMIT));
    assert!(err.is_hard_fault());
    assert_eq!(sys.memory().allocated(), 0);
}

#[derive(Debug)]
struct StridedAllocator {
    next: u32,
}

impl FrameAllocator for StridedAllocator {
    fn alloc_frame(&mut self) -> Option<Pfn> {
        let pfn = self.next;
        self.next += 3;
        Some(Pfn(pfn))
    }

    fn allocated(&self) -> usize {
        (self.next / 3) as usize
    }
}

#[test]
fn test_custom_frame_allocator() {
    let config = SystemConfig {
        nr_frames: Some(7),
        frame_size: 16,
        init_pid: 0,
    };
    let mut sys = System::with_allocator(config, Box::new(StridedAllocator { next: 0 })).unwrap();

    assert_eq!(sys.access(AccessKind::Read, Vpn(0)), Ok(Pfn(0)));
    assert_eq!(sys.access(AccessKind::Read, Vpn(1)), Ok(Pfn(3)));
    assert_eq!(sys.access(AccessKind::Read, Vpn(2)), Ok(Pfn(6)));
    // Frame 9 lies past the 7-frame limit.
    assert_eq!(sys.access(AccessKind::Read, Vpn(3)), Err(VmError::OutOfMemory));
}
