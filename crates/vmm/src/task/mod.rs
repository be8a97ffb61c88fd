// Process bookkeeping
// -------------------
// - `Process` owns its page table outright; nothing is shared between
//   processes except physical frames referenced by copy-on-write PTEs.
// - Exactly one process is current and lives outside the ready queue.
//   Every other live process sits in the queue exactly once.
// - `System::switch_process(pid)` either pulls `pid` out of the queue or
//   forks it from the current process. In both cases the previous current
//   process goes to the tail of the queue.

pub mod process;
pub mod ready_queue;
pub mod switch;

pub use process::{Pid, Process};
pub use ready_queue::ReadyQueue;
pub use switch::SwitchOutcome;
