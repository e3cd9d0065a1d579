use std::sync::atomic::{AtomicBool, Ordering};

use marketdeck_core::{Navigator, LOGIN_ROUTE};

/// Terminal stand-in for the `/login` route: tells the user to sign in again
/// and remembers that the session is gone so the process can exit.
#[derive(Debug)]
pub struct ConsoleNavigator {
    expired: AtomicBool,
    announce: bool,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self {
            expired: AtomicBool::new(false),
            announce: true,
        }
    }

    /// For commands that run without a session (login, register): a 401
    /// there means bad credentials, so no expiry notice is printed.
    pub fn quiet() -> Self {
        Self {
            expired: AtomicBool::new(false),
            announce: false,
        }
    }

    /// True when a session existed and a 401 ended it
    pub fn session_expired(&self) -> bool {
        self.announce && self.expired.load(Ordering::SeqCst)
    }
}

impl Default for ConsoleNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for ConsoleNavigator {
    fn go_to_login(&self) {
        // Several in-flight requests may all come back 401; tell the user once
        if !self.expired.swap(true, Ordering::SeqCst) && self.announce {
            eprintln!(
                "Session expired ({}). Run `marketdeck login` to sign in again.",
                LOGIN_ROUTE
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_expiry() {
        let navigator = ConsoleNavigator::new();
        assert!(!navigator.session_expired());
        navigator.go_to_login();
        navigator.go_to_login();
        assert!(navigator.session_expired());
    }

    #[test]
    fn test_quiet_navigator_never_reports_expiry() {
        let navigator = ConsoleNavigator::quiet();
        navigator.go_to_login();
        assert!(!navigator.session_expired());
    }
}
