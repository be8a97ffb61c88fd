use core::fmt;

/// Failures surfaced by translation and fault handling.
///
/// `Untranslatable` is ordinary control flow: it tells the driver to run the
/// fault handler and retry. The other variants are hard faults.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VmError {
    /// No directory, an invalid PTE, or a write against a read-only PTE.
    Untranslatable,
    /// The frame allocator has no frames left.
    OutOfMemory,
    /// The VPN lies outside the two-level address space.
    InvalidVpn(u32),
    /// A byte offset past the end of a frame.
    InvalidOffset(usize),
    /// Physical memory cannot be laid out with the requested geometry.
    InvalidConfig(&'static str),
}

impl VmError {
    /// True for failures the driver cannot recover from by retrying.
    pub fn is_hard_fault(&self) -> bool {
        !matches!(self, VmError::Untranslatable)
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::Untranslatable => write!(f, "unable to translate virtual page"),
            VmError::OutOfMemory => write!(f, "out of physical frames"),
            VmError::InvalidVpn(vpn) => write!(f, "virtual page {} is outside the address space", vpn),
            VmError::InvalidOffset(off) => write!(f, "offset {} is past the end of the frame", off),
            VmError::InvalidConfig(why) => write!(f, "invalid memory configuration: {}", why),
        }
    }
}

impl core::error::Error for VmError {}

pub type VmResult<T> = core::result::Result<T, VmError>;
