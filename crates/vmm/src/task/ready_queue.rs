use std::collections::{HashMap, VecDeque};

use super::process::{Pid, Process};

/// Processes waiting to run, in activation order.
///
/// `order` keeps the round-robin sequence while `procs` gives keyed access
/// by pid, so membership checks do not walk the queue.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    order: VecDeque<Pid>,
    procs: HashMap<Pid, Process>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.procs.contains_key(&pid)
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.procs.get(&pid)
    }

    /// The process at the head of the queue.
    pub fn front(&self) -> Option<&Process> {
        let pid = self.order.front()?;
        self.procs.get(pid)
    }

    /// Move the head of the queue to the tail.
    pub fn rotate_left(&mut self) {
        if let Some(pid) = self.order.pop_front() {
            self.order.push_back(pid);
        }
    }

    /// Append `process` at the tail.
    ///
    /// A queued process with the same pid is unlinked and returned so the
    /// queue never holds a pid twice.
    pub fn push_back(&mut self, process: Process) -> Option<Process> {
        let pid = process.pid;
        let displaced = self.remove(pid);
        self.order.push_back(pid);
        self.procs.insert(pid, process);
        displaced
    }

    /// Unlink `pid` from wherever it sits in the queue.
    pub fn remove(&mut self, pid: Pid) -> Option<Process> {
        let process = self.procs.remove(&pid)?;
        if let Some(pos) = self.order.iter().position(|p| *p == pid) {
            self.order.remove(pos);
        }
        Some(process)
    }

    /// Pids in queue order, head first.
    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.order.iter().copied()
    }

    /// Processes in queue order, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Process> + '_ {
        self.order.iter().filter_map(|pid| self.procs.get(pid))
    }
}
