/// Route of the login entry point.
pub const LOGIN_ROUTE: &str = "/login";

/// Capability to send the user back to the login entry point.
///
/// Implementations perform a hard reset: whatever in-memory state referred
/// to the expired session must not survive the navigation.
pub trait Navigator: Send + Sync {
    fn go_to_login(&self);
}

/// Navigator that does nothing, for embedding contexts without a login screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn go_to_login(&self) {}
}
