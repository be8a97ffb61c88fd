use std::fmt;

use types::{AccessKind, Pfn, VmError, Vpn};

use crate::mmu::FaultResolution;
use crate::task::{Pid, SwitchOutcome};

/// Pluggable event sink. Drivers use it for tracing without touching the
/// core; every hook defaults to doing nothing.
pub trait Observer: fmt::Debug {
    /// Called after each translation attempt made by [`crate::System::access`].
    fn on_translate(&mut self, _pid: Pid, _kind: AccessKind, _vpn: Vpn, _pfn: Option<Pfn>) {}

    /// Called when a page fault has been resolved.
    fn on_fault(&mut self, _pid: Pid, _kind: AccessKind, _vpn: Vpn, _resolution: &FaultResolution) {}

    /// Called when the fault handler gives up with a hard fault.
    fn on_fault_error(&mut self, _pid: Pid, _kind: AccessKind, _vpn: Vpn, _err: VmError) {}

    /// Called after every process switch request.
    fn on_switch(&mut self, _from: Pid, _to: Pid, _outcome: SwitchOutcome) {}
}

/// Default observer that records nothing.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}
