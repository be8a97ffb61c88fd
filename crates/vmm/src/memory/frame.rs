use std::fmt;
use std::ops::Range;

use types::{Pfn, VmError, VmResult};

/// Source of fresh physical frames.
///
/// Implementations only ever hand out frames that are not in use; there is
/// no free path, so a frame stays allocated once issued.
pub trait FrameAllocator: fmt::Debug {
    /// Next unused frame, or `None` once the pool is exhausted.
    fn alloc_frame(&mut self) -> Option<Pfn>;

    /// Number of frames handed out so far.
    fn allocated(&self) -> usize;
}

/// Bump allocator over `[start, limit)`.
#[derive(Debug, Clone, Copy)]
pub struct BumpFrameAllocator {
    start: u32,
    next: u32,
    limit: u32,
}

impl BumpFrameAllocator {
    pub const fn new(start: u32, limit: u32) -> Self {
        Self {
            start,
            next: start,
            limit,
        }
    }
}

impl FrameAllocator for BumpFrameAllocator {
    fn alloc_frame(&mut self) -> Option<Pfn> {
        if self.next >= self.limit {
            return None;
        }
        let pfn = self.next;
        self.next += 1;
        Some(Pfn(pfn))
    }

    fn allocated(&self) -> usize {
        (self.next - self.start) as usize
    }
}

/// Simulated physical memory: a byte backing split into frames, plus the
/// allocator that decides which frame comes next.
///
/// The backing grows as frames are handed out, so an unbounded memory only
/// costs what the simulation actually touches. With a `limit`, frames at or
/// past it are reported as exhaustion.
///
/// Frames are zeroed when handed out. Contents only matter for the byte
/// accessors and for the copy made on a copy-on-write upgrade.
#[derive(Debug)]
pub struct PhysicalMemory {
    frame_size: usize,
    limit: Option<usize>,
    backing: Vec<u8>,
    allocator: Box<dyn FrameAllocator>,
}

impl PhysicalMemory {
    /// Memory of `frame_size`-byte frames, capped at `limit` frames when
    /// given. Frames come from a bump allocator starting at pfn 0.
    pub fn new(limit: Option<usize>, frame_size: usize) -> VmResult<Self> {
        let cap = limit.map_or(u32::MAX, |n| u32::try_from(n).unwrap_or(u32::MAX));
        Self::with_allocator(limit, frame_size, Box::new(BumpFrameAllocator::new(0, cap)))
    }

    pub fn with_allocator(
        limit: Option<usize>,
        frame_size: usize,
        allocator: Box<dyn FrameAllocator>,
    ) -> VmResult<Self> {
        if frame_size == 0 {
            return Err(VmError::InvalidConfig("frame size must be greater than zero"));
        }
        if let Some(n) = limit {
            n.checked_mul(frame_size)
                .ok_or(VmError::InvalidConfig("frame limit times frame size overflows"))?;
        }
        Ok(Self {
            frame_size,
            limit,
            backing: Vec::new(),
            allocator,
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Maximum number of frames, or `None` when memory is unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn allocated(&self) -> usize {
        self.allocator.allocated()
    }

    fn span(&self, pfn: Pfn) -> Option<Range<usize>> {
        let start = pfn.as_usize().checked_mul(self.frame_size)?;
        let end = start.checked_add(self.frame_size)?;
        Some(start..end)
    }

    /// Byte range of a frame that has been handed out.
    fn frame_range(&self, pfn: Pfn) -> Option<Range<usize>> {
        self.span(pfn).filter(|range| range.end <= self.backing.len())
    }

    /// Take a fresh frame from the allocator and zero it, growing the
    /// backing to cover it.
    ///
    /// A frame past the limit, or one the host cannot back, is treated like
    /// exhaustion.
    pub fn alloc_zeroed(&mut self) -> VmResult<Pfn> {
        let pfn = self.allocator.alloc_frame().ok_or(VmError::OutOfMemory)?;
        if self.limit.is_some_and(|limit| pfn.as_usize() >= limit) {
            return Err(VmError::OutOfMemory);
        }
        let range = self.span(pfn).ok_or(VmError::OutOfMemory)?;
        if range.end > self.backing.len() {
            self.backing
                .try_reserve(range.end - self.backing.len())
                .map_err(|_| VmError::OutOfMemory)?;
            self.backing.resize(range.end, 0);
        }
        self.backing[range].fill(0);
        Ok(pfn)
    }

    /// Copy the full contents of `src` into `dst`.
    pub fn copy_frame(&mut self, src: Pfn, dst: Pfn) -> VmResult<()> {
        let from = self.frame_range(src).ok_or(VmError::OutOfMemory)?;
        let to = self.frame_range(dst).ok_or(VmError::OutOfMemory)?;
        if from != to {
            self.backing.copy_within(from, to.start);
        }
        Ok(())
    }

    pub fn frame(&self, pfn: Pfn) -> Option<&[u8]> {
        let range = self.frame_range(pfn)?;
        Some(&self.backing[range])
    }

    pub fn read_byte(&self, pfn: Pfn, offset: usize) -> VmResult<u8> {
        if offset >= self.frame_size {
            return Err(VmError::InvalidOffset(offset));
        }
        let range = self.frame_range(pfn).ok_or(VmError::OutOfMemory)?;
        Ok(self.backing[range.start + offset])
    }

    pub fn write_byte(&mut self, pfn: Pfn, offset: usize, value: u8) -> VmResult<()> {
        if offset >= self.frame_size {
            return Err(VmError::InvalidOffset(offset));
        }
        let range = self.frame_range(pfn).ok_or(VmError::OutOfMemory)?;
        self.backing[range.start + offset] = value;
        Ok(())
    }
}
