use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use types::Pfn;
use vmm::{FaultStats, Pid, Process, System};

/// Bytes of frame content shown next to each mapping.
const PREVIEW_BYTES: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemReport {
    pub current: Pid,
    pub ready_queue: Vec<Pid>,
    pub frame_limit: Option<usize>,
    pub frame_size: usize,
    pub frames_allocated: usize,
    pub processes: Vec<ProcessReport>,
    pub stats: StatsReport,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessReport {
    pub pid: Pid,
    pub directories: usize,
    pub mappings: Vec<MappingReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappingReport {
    pub vpn: u32,
    pub pfn: u32,
    pub writable: bool,
    /// Hex of the first bytes of the mapped frame.
    pub preview: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StatsReport {
    pub accesses: u64,
    pub hits: u64,
    pub faults: u64,
    pub directory_allocs: u64,
    pub zero_fills: u64,
    pub cow_upgrades: u64,
    pub spurious: u64,
    pub failures: u64,
    pub forks: u64,
    pub activations: u64,
}

impl From<&FaultStats> for StatsReport {
    fn from(stats: &FaultStats) -> Self {
        Self {
            accesses: stats.accesses,
            hits: stats.hits,
            faults: stats.faults,
            directory_allocs: stats.directory_allocs,
            zero_fills: stats.zero_fills,
            cow_upgrades: stats.cow_upgrades,
            spurious: stats.spurious,
            failures: stats.failures,
            forks: stats.forks,
            activations: stats.activations,
        }
    }
}

impl SystemReport {
    pub fn capture(sys: &System) -> Self {
        let memory = sys.memory();
        Self {
            current: sys.current_pid(),
            ready_queue: sys.ready_queue().pids().collect(),
            frame_limit: memory.limit(),
            frame_size: memory.frame_size(),
            frames_allocated: memory.allocated(),
            processes: sys
                .processes()
                .map(|process| ProcessReport::capture(sys, process))
                .collect(),
            stats: StatsReport::from(sys.stats()),
        }
    }
}

impl ProcessReport {
    fn capture(sys: &System, process: &Process) -> Self {
        Self {
            pid: process.pid,
            directories: process.pagetable.directory_count(),
            mappings: process
                .pagetable
                .mappings()
                .map(|(vpn, pte)| MappingReport {
                    vpn: vpn.as_u32(),
                    pfn: pte.pfn.as_u32(),
                    writable: pte.writable,
                    preview: frame_preview(sys, pte.pfn),
                })
                .collect(),
        }
    }
}

fn frame_preview(sys: &System, pfn: Pfn) -> String {
    sys.memory()
        .frame(pfn)
        .map(|bytes| hex::encode(&bytes[..bytes.len().min(PREVIEW_BYTES)]))
        .unwrap_or_default()
}

/// Print the page table of `process` as `dir:pte -> pfn (perms) bytes`.
pub fn write_page_table(out: &mut dyn Write, sys: &System, process: &Process) -> Result<()> {
    writeln!(
        out,
        "pid {}: {} directories, {} mapped pages",
        process.pid,
        process.pagetable.directory_count(),
        process.pagetable.mapped_count()
    )?;
    for (vpn, pte) in process.pagetable.mappings() {
        writeln!(
            out,
            "  {:02}:{:02} -> {:>4} ({}) {}",
            vpn.dir_index(),
            vpn.pte_index(),
            pte.pfn,
            pte.perms(),
            frame_preview(sys, pte.pfn)
        )?;
    }
    Ok(())
}

pub fn write_queue(out: &mut dyn Write, sys: &System) -> Result<()> {
    let queued: Vec<String> = sys.ready_queue().pids().map(|pid| pid.to_string()).collect();
    writeln!(
        out,
        "current {} | ready [{}]",
        sys.current_pid(),
        queued.join(", ")
    )?;
    Ok(())
}

pub fn write_stats(out: &mut dyn Write, sys: &System) -> Result<()> {
    let s = sys.stats();
    writeln!(
        out,
        "accesses {} hits {} faults {} (directory {}, zero-fill {}, cow {}, spurious {}) failures {}",
        s.accesses, s.hits, s.faults, s.directory_allocs, s.zero_fills, s.cow_upgrades, s.spurious, s.failures
    )?;
    let limit = match sys.memory().limit() {
        Some(n) => n.to_string(),
        None => "unbounded".to_string(),
    };
    writeln!(
        out,
        "forks {} activations {} frames {}/{}",
        s.forks,
        s.activations,
        sys.memory().allocated(),
        limit
    )?;
    Ok(())
}

/// Which `pid:vpn` pairs map each allocated frame.
pub fn frame_owners(sys: &System) -> BTreeMap<Pfn, Vec<(Pid, u32)>> {
    let mut owners: BTreeMap<Pfn, Vec<(Pid, u32)>> = BTreeMap::new();
    for process in sys.processes() {
        for (vpn, pte) in process.pagetable.mappings() {
            owners
                .entry(pte.pfn)
                .or_default()
                .push((process.pid, vpn.as_u32()));
        }
    }
    owners
}

pub fn write_frames(out: &mut dyn Write, sys: &System) -> Result<()> {
    for (pfn, users) in frame_owners(sys) {
        let users: Vec<String> = users
            .iter()
            .map(|(pid, vpn)| format!("{}:{}", pid, vpn))
            .collect();
        let tag = if users.len() > 1 { " shared" } else { "" };
        writeln!(out, "  pfn {:>4}{} <- {}", pfn, tag, users.join(" "))?;
    }
    Ok(())
}
