use colored::*;
use types::{AccessKind, Pfn, VmError, Vpn};
use vmm::{FaultResolution, Observer, Pid, SwitchOutcome};

/// Observer that prints every translation, fault and switch to stdout.
#[derive(Debug, Default)]
pub struct TraceObserver;

impl Observer for TraceObserver {
    fn on_translate(&mut self, pid: Pid, kind: AccessKind, vpn: Vpn, pfn: Option<Pfn>) {
        match pfn {
            Some(pfn) => println!(
                "  {} [{}] {:<5} vpn {:>3} -> pfn {}",
                "tlb".dimmed(),
                pid,
                kind,
                vpn,
                pfn
            ),
            None => println!(
                "  {} [{}] {:<5} vpn {:>3} untranslatable",
                "tlb".dimmed(),
                pid,
                kind,
                vpn
            ),
        }
    }

    fn on_fault(&mut self, pid: Pid, kind: AccessKind, vpn: Vpn, resolution: &FaultResolution) {
        let detail = match resolution {
            FaultResolution::DirectoryAlloc { pfn } => format!("new directory, pfn {}", pfn),
            FaultResolution::ZeroFill { pfn } => format!("zero fill, pfn {}", pfn),
            FaultResolution::CopyOnWrite { old, new } => {
                format!("copy-on-write, pfn {} -> {}", old, new)
            }
            FaultResolution::Spurious { pfn } => format!("nothing to do, pfn {}", pfn),
        };
        println!(
            "  {} [{}] {:<5} vpn {:>3}: {}",
            "fault".yellow(),
            pid,
            kind,
            vpn,
            detail
        );
    }

    fn on_fault_error(&mut self, pid: Pid, kind: AccessKind, vpn: Vpn, err: VmError) {
        println!(
            "  {} [{}] {:<5} vpn {:>3}: {}",
            "fault".red().bold(),
            pid,
            kind,
            vpn,
            err
        );
    }

    fn on_switch(&mut self, from: Pid, to: Pid, outcome: SwitchOutcome) {
        let how = match outcome {
            SwitchOutcome::Activated => "activated".green(),
            SwitchOutcome::Forked => "forked".cyan(),
            SwitchOutcome::AlreadyRunning => "already running".dimmed(),
        };
        println!("  {} {} -> {} ({})", "switch".blue(), from, to, how);
    }
}
