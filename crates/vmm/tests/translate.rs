use vmm::{AccessKind, Pfn, System, SystemConfig, VmError, Vpn};

fn system() -> System {
    System::new(SystemConfig {
        nr_frames: Some(64),
        frame_size: 64,
        init_pid: 1,
    })
    .unwrap()
}

#[test]
fn test_untouched_pages_never_translate() {
    let sys = system();
    for vpn in 0..Vpn::LIMIT {
        assert_eq!(sys.translate(AccessKind::Read, Vpn(vpn)), Err(VmError::Untranslatable));
        assert_eq!(sys.translate(AccessKind::Write, Vpn(vpn)), Err(VmError::Untranslatable));
    }
}

#[test]
fn test_out_of_range_vpn_is_untranslatable() {
    let sys = system();
    assert_eq!(
        sys.translate(AccessKind::Read, Vpn(Vpn::LIMIT + 3)),
        Err(VmError::Untranslatable)
    );
}

#[test]
fn test_invalid_pte_in_present_directory() {
    let mut sys = system();
    sys.handle_page_fault(AccessKind::Read, Vpn(16)).unwrap();

    // vpn 17 shares the directory with 16 but was never mapped.
    assert_eq!(sys.translate(AccessKind::Read, Vpn(17)), Err(VmError::Untranslatable));
    assert!(sys.translate(AccessKind::Read, Vpn(16)).is_ok());
}

#[test]
fn test_translate_does_not_modify_page_table() {
    let mut sys = system();
    sys.handle_page_fault(AccessKind::Write, Vpn(5)).unwrap();
    let before = sys.current().clone();

    for vpn in 0..40 {
        let _ = sys.translate(AccessKind::Read, Vpn(vpn));
        let _ = sys.translate(AccessKind::Write, Vpn(vpn));
    }

    assert_eq!(sys.current(), &before);
    assert_eq!(sys.memory().allocated(), 1);
}

#[test]
fn test_write_to_read_only_pte_fails_but_read_succeeds() {
    let mut sys = system();
    sys.handle_page_fault(AccessKind::Write, Vpn(2)).unwrap();
    sys.switch_process(2);

    let pfn = sys.translate(AccessKind::Read, Vpn(2)).unwrap();
    assert_eq!(pfn, Pfn(0));
    assert_eq!(sys.translate(AccessKind::Write, Vpn(2)), Err(VmError::Untranslatable));
}
