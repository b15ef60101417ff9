//! Behaviour switches baked into a launcher.

/// Token that disables waiting for the launched application.
pub const NONBLOCKING: &str = "nonblocking";
/// Token that stops the launched application from sharing our stdio.
pub const NOSTDREDIRECT: &str = "nostdredirect";

/// Every token the launcher understands.
pub const KNOWN_TOKENS: [&str; 2] = [NONBLOCKING, NOSTDREDIRECT];

/// Switches parsed from a comma-separated option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Wait for the child and return its exit code.
    pub blocking: bool,
    /// Bind the child's stdin, stdout and stderr to ours.
    pub std_redirect: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            blocking: true,
            std_redirect: true,
        }
    }
}

impl LaunchOptions {
    /// Parse a list such as `"nonblocking,nostdredirect"`.
    ///
    /// Tokens are compared exactly and case-sensitively. Empty tokens and
    /// tokens that are not in [`KNOWN_TOKENS`] are ignored, so this never fails.
    pub fn parse(flags: &str) -> Self {
        let mut options = Self::default();
        for token in tokens(flags) {
            match token {
                NONBLOCKING => options.blocking = false,
                NOSTDREDIRECT => options.std_redirect = false,
                other => tracing::debug!(token = other, "ignoring unknown launcher option"),
            }
        }
        options
    }
}

/// Non-empty tokens of a comma-separated list, in order.
pub fn tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').filter(|token| !token.is_empty())
}

/// Whether `token` changes launcher behaviour.
pub fn is_known(token: &str) -> bool {
    KNOWN_TOKENS.contains(&token)
}
