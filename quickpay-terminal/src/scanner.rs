//! Keyboard-backed scan device.
//!
//! A terminal has no camera, so "scanning" means the buyer pastes the QR
//! payload decoded by another app. The device only tracks whether a session
//! is open; the payload lines are read by the `pay` command.

use std::io;

use quickpay::ledger::ScanDevice;

/// A [`ScanDevice`] whose sessions are prompts for a pasted payload.
#[derive(Debug, Default)]
pub struct KeyboardScanner {
    active: bool,
    sessions: usize,
}

impl KeyboardScanner {
    /// Whether a session is open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Number of sessions opened so far.
    #[must_use]
    pub const fn sessions(&self) -> usize {
        self.sessions
    }
}

impl ScanDevice for KeyboardScanner {
    fn start(&mut self) -> io::Result<()> {
        if self.active {
            return Err(io::Error::new(
                io::ErrorKind::ResourceBusy,
                "a scan session is already open",
            ));
        }
        self.active = true;
        self.sessions += 1;
        tracing::debug!(session = self.sessions, "Scanner started");
        Ok(())
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            tracing::debug!(session = self.sessions, "Scanner stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_stop_pairs() {
        let mut scanner = KeyboardScanner::default();
        scanner.start().unwrap();
        assert!(scanner.is_active());
        assert_eq!(
            scanner.start().unwrap_err().kind(),
            io::ErrorKind::ResourceBusy
        );
        scanner.stop();
        assert!(!scanner.is_active());
        scanner.start().unwrap();
        assert_eq!(scanner.sessions(), 2);
    }
}
