use std::mem;

use crate::system::System;

use super::process::Pid;

/// How a call to [`System::switch_process`] was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The pid was waiting in the ready queue and is now current.
    Activated,
    /// The pid was unknown; it was forked from the previous current process.
    Forked,
    /// The pid already belongs to the current process; nothing changed.
    AlreadyRunning,
}

impl System {
    /// Make `pid` the current process.
    ///
    /// A queued process is unlinked and activated. An unknown pid is forked
    /// from the current process, sharing all of its frames copy-on-write.
    /// Either way the previous current process is appended to the tail of
    /// the ready queue.
    pub fn switch_process(&mut self, pid: Pid) -> SwitchOutcome {
        let from = self.current.pid;
        if pid == from {
            self.observer.on_switch(from, pid, SwitchOutcome::AlreadyRunning);
            return SwitchOutcome::AlreadyRunning;
        }

        let (next, outcome) = match self.ready.remove(pid) {
            Some(process) => {
                self.stats.activations += 1;
                (process, SwitchOutcome::Activated)
            }
            None => {
                self.stats.forks += 1;
                (self.current.fork(pid), SwitchOutcome::Forked)
            }
        };

        let prev = mem::replace(&mut self.current, next);
        let displaced = self.ready.push_back(prev);
        debug_assert!(displaced.is_none(), "pid {} was both current and queued", from);

        self.observer.on_switch(from, pid, outcome);
        outcome
    }
}
