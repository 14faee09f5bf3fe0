//! Synchronization fence descriptors.
//!
//! Fences are the only cross-boundary concurrency primitive in this adapter:
//! an acquire fence signals "input buffer ready to read", a release fence
//! signals "output buffer free to reuse", and the stack-level retire fence
//! signals the previous frame's content may be discarded. The adapter never
//! waits on a fence; it only forwards ownership.

use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};

/// An owned synchronization fence descriptor.
///
/// Ownership is the close contract: moving a `Fence` transfers responsibility
/// for the underlying descriptor, and dropping it closes the descriptor
/// exactly once. The commit path takes acquire fences out of the caller's
/// layer slots and drops them after submission, whether or not the engine
/// accepted the stack.
#[derive(Debug)]
pub struct Fence(OwnedFd);

impl Fence {
    /// Returns the raw descriptor without giving up ownership.
    pub fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }

    /// Consumes the fence, handing the descriptor back to the caller.
    pub fn into_fd(self) -> OwnedFd {
        self.0
    }
}

impl From<OwnedFd> for Fence {
    fn from(fd: OwnedFd) -> Self {
        Self(fd)
    }
}

impl From<Fence> for OwnedFd {
    fn from(fence: Fence) -> Self {
        fence.0
    }
}

impl AsRawFd for Fence {
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}

impl IntoRawFd for Fence {
    fn into_raw_fd(self) -> RawFd {
        self.0.into_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn test_fence() -> Fence {
        Fence::from(OwnedFd::from(File::open("/dev/null").unwrap()))
    }

    #[test]
    fn test_fence_reports_raw_fd() {
        let fence = test_fence();
        assert!(fence.as_raw_fd() >= 0);
    }

    #[test]
    fn test_fence_round_trips_ownership() {
        let fence = test_fence();
        let raw = fence.as_raw_fd();
        let fd: OwnedFd = fence.into();
        assert_eq!(fd.as_raw_fd(), raw);
    }
}
