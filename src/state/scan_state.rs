// ============================================================================
// SCAN STATE - QR pickup flow state machine and camera ownership
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::VerifyOutcome;

/// Pickup scanner flow. `Idle` means the modal is closed. Only the first
/// decode per scanning session moves the flow forward; later frames are
/// ignored until a manual restart.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanFlow {
    Idle,
    Scanning,
    Verifying,
    Result(VerifyOutcome),
}

impl ScanFlow {
    /// Gate for decode callbacks: decodes are only authoritative while
    /// actively scanning.
    pub fn accepts_decode(&self) -> bool {
        matches!(self, ScanFlow::Scanning)
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ScanFlow::Idle)
    }
}

/// Tracks whether the crate currently owns the camera stream. Acquire and
/// release are idempotent so every exit path can release unconditionally.
#[derive(Clone)]
pub struct CameraHandle {
    active: Rc<RefCell<bool>>,
}

impl CameraHandle {
    pub fn new() -> Self {
        Self {
            active: Rc::new(RefCell::new(false)),
        }
    }

    /// Returns true if the camera was actually acquired by this call.
    pub fn acquire(&self) -> bool {
        let mut active = self.active.borrow_mut();
        if *active {
            return false;
        }
        *active = true;
        true
    }

    /// Returns true if the camera was actually released by this call.
    pub fn release(&self) -> bool {
        let mut active = self.active.borrow_mut();
        if !*active {
            return false;
        }
        *active = false;
        true
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }
}

impl Default for CameraHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct ScanState {
    pub flow: Rc<RefCell<ScanFlow>>,
    pub camera: CameraHandle,
}

impl ScanState {
    pub fn new() -> Self {
        Self {
            flow: Rc::new(RefCell::new(ScanFlow::Idle)),
            camera: CameraHandle::new(),
        }
    }

    pub fn get_flow(&self) -> ScanFlow {
        self.flow.borrow().clone()
    }

    pub fn set_flow(&self, flow: ScanFlow) {
        *self.flow.borrow_mut() = flow;
    }

    /// First authoritative decode: leaves Scanning exactly once. Returns
    /// false for frames arriving after the session already decoded.
    pub fn take_decode(&self) -> bool {
        let mut flow = self.flow.borrow_mut();
        if !flow.accepts_decode() {
            return false;
        }
        *flow = ScanFlow::Verifying;
        true
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_decode_is_authoritative() {
        let scan = ScanState::new();
        scan.set_flow(ScanFlow::Scanning);
        assert!(scan.take_decode());
        assert_eq!(scan.get_flow(), ScanFlow::Verifying);
        // Frames keep arriving while verification is in flight
        assert!(!scan.take_decode());
        scan.set_flow(ScanFlow::Result(VerifyOutcome::Expired));
        assert!(!scan.take_decode());
        // Manual restart re-arms the gate
        scan.set_flow(ScanFlow::Scanning);
        assert!(scan.take_decode());
    }

    #[test]
    fn decode_ignored_when_idle() {
        let scan = ScanState::new();
        assert!(!scan.take_decode());
        assert_eq!(scan.get_flow(), ScanFlow::Idle);
    }

    #[test]
    fn camera_acquire_release_idempotent() {
        let camera = CameraHandle::new();
        assert!(camera.acquire());
        assert!(!camera.acquire());
        assert!(camera.is_active());
        assert!(camera.release());
        assert!(!camera.release());
        assert!(!camera.is_active());
    }
}
