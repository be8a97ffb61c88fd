//! Demand-paged virtual memory simulator.
//!
//! A [`System`] holds one current process and a ready queue of the others.
//! Each process owns a two-level page table whose directories and frames are
//! created lazily by the page-fault handler. Switching to an unknown pid
//! forks the current process and shares its frames copy-on-write.

pub mod memory;
pub mod mmu;
pub mod observer;
pub mod stats;
pub mod system;
pub mod task;

pub use memory::{BumpFrameAllocator, FrameAllocator, PageTable, PhysicalMemory, PteDirectory};
pub use mmu::FaultResolution;
pub use observer::{NoopObserver, Observer};
pub use stats::FaultStats;
pub use system::{System, SystemConfig};
pub use task::{Pid, Process, ReadyQueue, SwitchOutcome};
pub use types::{AccessKind, Pfn, Pte, VmError, VmResult, Vpn};
