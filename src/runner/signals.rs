//! Signal forwarding while an external subcommand runs (unix only)
//!
//! The handler relays each signal to the child as it arrives, so the parent
//! can block in `wait` for the whole lifetime of the child.

use std::sync::atomic::{AtomicI32, Ordering};
use tracing::{debug, warn};

/// Signals relayed to the child
pub const FORWARDED_SIGNALS: [libc::c_int; 5] = [libc::SIGUSR1, libc::SIGUSR2, libc::SIGTERM, libc::SIGINT, libc::SIGHUP];

/// Pid of the running child, 0 when there is none
static CHILD: AtomicI32 = AtomicI32::new(0);

extern "C" fn forward(signal: libc::c_int) {
    let pid = CHILD.load(Ordering::SeqCst);
    if pid > 0 {
        // SAFETY: kill(2) is async-signal-safe.
        unsafe {
            libc::kill(pid, signal);
        }
    }
}

/// Relays signals to one child; the previous handlers come back on drop
pub struct Forwarder {
    previous: Vec<(libc::c_int, libc::sighandler_t)>,
}

impl Forwarder {
    pub fn install(pid: u32) -> Self {
        CHILD.store(pid as libc::pid_t, Ordering::SeqCst);
        let handler = forward as extern "C" fn(libc::c_int) as libc::sighandler_t;
        let previous = FORWARDED_SIGNALS
            .iter()
            // SAFETY: `forward` only reads an atomic and calls kill(2).
            .map(|&signal| (signal, unsafe { libc::signal(signal, handler) }))
            .inspect(|&(signal, previous)| {
                if previous == libc::SIG_ERR {
                    warn!(signal, "cannot install signal handler, signal will not be forwarded");
                }
            })
            .collect();
        debug!(pid, signals = ?FORWARDED_SIGNALS, "forwarding signals to child");
        Forwarder { previous }
    }
}

impl Drop for Forwarder {
    fn drop(&mut self) {
        for &(signal, handler) in &self.previous {
            if handler != libc::SIG_ERR {
                // SAFETY: restores the disposition that was in place before `install`.
                unsafe {
                    libc::signal(signal, handler);
                }
            }
        }
        CHILD.store(0, Ordering::SeqCst);
    }
}
