use types::{DEFAULT_FRAME_SIZE, VmResult};

use crate::memory::{FrameAllocator, PhysicalMemory};
use crate::observer::{NoopObserver, Observer};
use crate::stats::FaultStats;
use crate::task::{Pid, Process, ReadyQueue};

/// Sizing knobs for a [`System`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    /// Cap on physical frames; `None` lets memory grow with every fault.
    pub nr_frames: Option<usize>,
    /// Size of each frame in bytes.
    pub frame_size: usize,
    /// Pid of the process that is current at startup.
    pub init_pid: Pid,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            nr_frames: None,
            frame_size: DEFAULT_FRAME_SIZE,
            init_pid: 0,
        }
    }
}

/// Scheduler and memory context.
///
/// Owns the current process, the ready queue and physical memory. Every
/// operation goes through a `&mut System`, so independent instances never
/// see each other's state.
#[derive(Debug)]
pub struct System {
    config: SystemConfig,
    pub(crate) current: Process,
    pub(crate) ready: ReadyQueue,
    pub(crate) memory: PhysicalMemory,
    pub(crate) stats: FaultStats,
    pub(crate) observer: Box<dyn Observer>,
}

impl System {
    /// Fails when physical memory cannot be laid out for `config`.
    pub fn new(config: SystemConfig) -> VmResult<Self> {
        let memory = PhysicalMemory::new(config.nr_frames, config.frame_size)?;
        Ok(Self::with_memory(config, memory))
    }

    /// Build a system whose frames come from `allocator` instead of the
    /// default bump allocator.
    pub fn with_allocator(
        config: SystemConfig,
        allocator: Box<dyn FrameAllocator>,
    ) -> VmResult<Self> {
        let memory = PhysicalMemory::with_allocator(config.nr_frames, config.frame_size, allocator)?;
        Ok(Self::with_memory(config, memory))
    }

    fn with_memory(config: SystemConfig, memory: PhysicalMemory) -> Self {
        Self {
            config,
            current: Process::new(config.init_pid),
            ready: ReadyQueue::new(),
            memory,
            stats: FaultStats::default(),
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn Observer>) -> Box<dyn Observer> {
        std::mem::replace(&mut self.observer, observer)
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn current(&self) -> &Process {
        &self.current
    }

    pub fn current_pid(&self) -> Pid {
        self.current.pid
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready
    }

    pub fn memory(&self) -> &PhysicalMemory {
        &self.memory
    }

    pub fn stats(&self) -> &FaultStats {
        &self.stats
    }

    /// Look up a live process, current or queued.
    pub fn process(&self, pid: Pid) -> Option<&Process> {
        if self.current.pid == pid {
            Some(&self.current)
        } else {
            self.ready.get(pid)
        }
    }

    /// Every live process: current first, then the ready queue in order.
    pub fn processes(&self) -> impl Iterator<Item = &Process> + '_ {
        std::iter::once(&self.current).chain(self.ready.iter())
    }

    pub fn pids(&self) -> Vec<Pid> {
        self.processes().map(|p| p.pid).collect()
    }

    pub fn process_count(&self) -> usize {
        1 + self.ready.len()
    }
}
