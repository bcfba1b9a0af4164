use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Ownership state of the host-writable staging buffer.
///
/// ```text
///   Writable --begin_write--> Unmapped --begin_remap--> InFlight
///      ^                         ^                          |
///      |                         +------ map failed --------+
///      +------------------------ map succeeded -------------+
/// ```
///
/// The host writes only in `Writable`. A tick that finds the buffer in any
/// other state skips its write, and the shader keeps reading the previous
/// frame's uniform contents.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum StagingState {
    /// Mapped for host writes.
    Writable = 0,
    /// Written and unmapped (or a remap failed); no map request is pending.
    Unmapped = 1,
    /// A map request is pending on the device.
    InFlight = 2,
}

impl StagingState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Writable,
            1 => Self::Unmapped,
            _ => Self::InFlight,
        }
    }
}

/// Shared state cell; the map callback holds a clone.
#[derive(Debug, Clone)]
pub struct StagingCell(Arc<AtomicU8>);

impl StagingCell {
    pub fn new(initial: StagingState) -> Self {
        Self(Arc::new(AtomicU8::new(initial as u8)))
    }

    pub fn state(&self) -> StagingState {
        StagingState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Claims the buffer for a host write. Returns `false` unless it was `Writable`.
    pub fn begin_write(&self) -> bool {
        self.transition(StagingState::Writable, StagingState::Unmapped)
    }

    /// Claims the right to issue a map request. Returns `false` unless it was `Unmapped`.
    pub fn begin_remap(&self) -> bool {
        self.transition(StagingState::Unmapped, StagingState::InFlight)
    }

    /// Records the outcome of a map request.
    pub fn finish_remap(&self, mapped: bool) {
        let next = if mapped {
            StagingState::Writable
        } else {
            StagingState::Unmapped
        };
        self.0.store(next as u8, Ordering::Release);
    }

    fn transition(&self, from: StagingState, to: StagingState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_remap_cycle() {
        let cell = StagingCell::new(StagingState::Writable);
        assert!(cell.begin_write());
        assert_eq!(cell.state(), StagingState::Unmapped);
        assert!(cell.begin_remap());
        assert_eq!(cell.state(), StagingState::InFlight);
        cell.finish_remap(true);
        assert_eq!(cell.state(), StagingState::Writable);
    }

    #[test]
    fn no_write_while_in_flight() {
        let cell = StagingCell::new(StagingState::Writable);
        assert!(cell.begin_write());
        assert!(cell.begin_remap());

        // next tick arrives before the map resolved
        assert!(!cell.begin_write());
        assert!(!cell.begin_remap());
        assert_eq!(cell.state(), StagingState::InFlight);
    }

    #[test]
    fn failed_remap_is_retried() {
        let cell = StagingCell::new(StagingState::Writable);
        assert!(cell.begin_write());
        assert!(cell.begin_remap());
        cell.finish_remap(false);

        assert_eq!(cell.state(), StagingState::Unmapped);
        assert!(!cell.begin_write());
        assert!(cell.begin_remap());
    }

    #[test]
    fn no_double_write_without_remap() {
        let cell = StagingCell::new(StagingState::Writable);
        assert!(cell.begin_write());
        assert!(!cell.begin_write());
    }

    #[test]
    fn callback_clone_shares_state() {
        let cell = StagingCell::new(StagingState::Unmapped);
        assert!(cell.begin_remap());
        let callback_side = cell.clone();
        std::thread::spawn(move || callback_side.finish_remap(true))
            .join()
            .unwrap();
        assert_eq!(cell.state(), StagingState::Writable);
    }
}
