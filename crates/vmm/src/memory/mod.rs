//! Page-table structures and simulated physical memory.

mod frame;
mod page_table;
mod pte;

pub use frame::{BumpFrameAllocator, FrameAllocator, PhysicalMemory};
pub use page_table::PageTable;
pub use pte::PteDirectory;
