use vmm::{AccessKind, Pfn, System, SwitchOutcome, SystemConfig, Vpn};

fn system() -> System {
    System::new(SystemConfig {
        nr_frames: Some(32),
        frame_size: 16,
        init_pid: 1,
    })
    .unwrap()
}

#[test]
fn test_fork_from_empty_process() {
    let mut sys = system();
    assert_eq!(sys.switch_process(2), SwitchOutcome::Forked);

    assert_eq!(sys.current_pid(), 2);
    assert_eq!(sys.current().pagetable.directory_count(), 0);
    assert_eq!(sys.ready_queue().pids().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_fork_grows_population_by_one() {
    let mut sys = system();
    sys.switch_process(2);
    sys.switch_process(3);
    let queued = sys.ready_queue().len();
    let live = sys.process_count();

    assert_eq!(sys.switch_process(4), SwitchOutcome::Forked);

    assert_eq!(sys.ready_queue().len(), queued + 1);
    assert_eq!(sys.process_count(), live + 1);
    assert_eq!(sys.current_pid(), 4);
    assert_eq!(sys.ready_queue().pids().last(), Some(3));
}

#[test]
fn test_activate_keeps_queue_size_and_swaps_member() {
    let mut sys = system();
    sys.switch_process(2);
    sys.switch_process(3);
    sys.switch_process(4);
    assert_eq!(sys.ready_queue().pids().collect::<Vec<_>>(), vec![1, 2, 3]);

    assert_eq!(sys.switch_process(2), SwitchOutcome::Activated);

    assert_eq!(sys.current_pid(), 2);
    assert_eq!(sys.ready_queue().len(), 3);
    assert!(!sys.ready_queue().contains(2));
    assert_eq!(sys.ready_queue().pids().collect::<Vec<_>>(), vec![1, 3, 4]);
}

#[test]
fn test_activate_does_not_fork_or_touch_tables() {
    let mut sys = system();
    sys.access(AccessKind::Write, Vpn(0)).unwrap();
    sys.switch_process(2);
    sys.access(AccessKind::Write, Vpn(0)).unwrap();
    let child_table = sys.current().pagetable.clone();

    sys.switch_process(1);
    assert_eq!(sys.ready_queue().get(2).unwrap().pagetable, child_table);

    sys.switch_process(2);
    assert_eq!(sys.current().pagetable, child_table);
    assert_eq!(sys.stats().forks, 1);
    assert_eq!(sys.stats().activations, 2);
}

#[test]
fn test_switch_to_current_pid_is_a_no_op() {
    let mut sys = system();
    sys.switch_process(2);
    assert_eq!(sys.switch_process(2), SwitchOutcome::AlreadyRunning);
    assert_eq!(sys.process_count(), 2);
    assert_eq!(sys.ready_queue().pids().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_fork_copies_only_valid_ptes_read_only() {
    let mut sys = system();
    for vpn in [0, 3, 17, 100] {
        sys.access(AccessKind::Write, Vpn(vpn)).unwrap();
    }
    let parent_map: Vec<_> = sys.current().pagetable.mappings().collect();

    sys.switch_process(7);

    let child = &sys.current().pagetable;
    let parent = &sys.process(1).unwrap().pagetable;
    assert_eq!(child.directory_count(), parent.directory_count());
    assert_eq!(child.mapped_count(), 4);
    for (vpn, before) in parent_map {
        let c = child.lookup(vpn).unwrap();
        let p = parent.lookup(vpn).unwrap();
        assert_eq!(c.pfn, before.pfn);
        assert_eq!(p.pfn, before.pfn);
        assert!(c.valid && !c.writable);
        assert!(p.valid && !p.writable);
    }
    assert!(child.lookup(Vpn(1)).map_or(true, |pte| !pte.valid));
    assert!(child.directory(3).is_none());
}

#[test]
fn test_grandchild_shares_frame_with_whole_family() {
    let mut sys = system();
    sys.access(AccessKind::Write, Vpn(9)).unwrap();
    sys.switch_process(2);
    sys.switch_process(3);

    for pid in [1, 2, 3] {
        let pte = sys.process(pid).unwrap().pagetable.lookup(Vpn(9)).copied().unwrap();
        assert_eq!(pte.pfn, Pfn(0));
        assert!(pte.is_cow());
    }
}

#[test]
fn test_pids_are_unique_across_switches() {
    let mut sys = system();
    for pid in [2, 3, 1, 4, 2, 5, 3, 1] {
        sys.switch_process(pid);
        let mut pids = sys.pids();
        let total = pids.len();
        pids.sort_unstable();
        pids.dedup();
        assert_eq!(pids.len(), total);
        assert!(!sys.ready_queue().contains(sys.current_pid()));
    }
    assert_eq!(sys.process_count(), 5);
}
