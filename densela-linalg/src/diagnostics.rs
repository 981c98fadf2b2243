//! Process-wide switch for forwarding kernel diagnostics to `tracing`.
//!
//! Disabled by default: kernel failures then surface only as
//! [`LinalgError`](crate::LinalgError) values. When enabled, each failure
//! reported by the kernel is also emitted as a `warn` event before it is
//! translated.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::kernel::KernelError;

static FORWARD_KERNEL_DIAGNOSTICS: AtomicBool = AtomicBool::new(false);

/// Enable or disable forwarding. Returns the previous setting.
pub fn set_kernel_diagnostics(enabled: bool) -> bool {
    FORWARD_KERNEL_DIAGNOSTICS.swap(enabled, Ordering::SeqCst)
}

/// Current forwarding setting.
pub fn kernel_diagnostics_enabled() -> bool {
    FORWARD_KERNEL_DIAGNOSTICS.load(Ordering::SeqCst)
}

/// Scoped forwarding: restores the previous setting when dropped.
#[must_use = "forwarding is reverted as soon as the guard is dropped"]
#[derive(Debug)]
pub struct KernelDiagnostics {
    previous: bool,
}

impl KernelDiagnostics {
    /// Turn forwarding on until the guard drops.
    pub fn enable() -> Self {
        Self {
            previous: set_kernel_diagnostics(true),
        }
    }

    /// Turn forwarding off until the guard drops.
    pub fn disable() -> Self {
        Self {
            previous: set_kernel_diagnostics(false),
        }
    }
}

impl Drop for KernelDiagnostics {
    fn drop(&mut self) {
        set_kernel_diagnostics(self.previous);
    }
}

pub(crate) fn forward(err: &KernelError) {
    if kernel_diagnostics_enabled() {
        warn!(code = err.code(), "kernel: {}", err);
    }
}
