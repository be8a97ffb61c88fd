#![no_std]

pub mod address;
pub use address::{Pfn, Vpn};

pub mod result;
pub use result::{VmError, VmResult};

pub mod mmu;
pub use mmu::*;
