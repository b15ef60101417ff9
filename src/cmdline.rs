//! The command line handed to the launched application.

use std::ffi::{OsStr, OsString};
use std::process::Command;

/// Arguments forwarded to the launched application, in the order received.
///
/// Rendered as a single line each argument gets a leading space, with no
/// quoting or escaping: `["--flag", "value"]` becomes `" --flag value"`.
/// Callers have to pre-quote arguments that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The combined line, as passed to the child.
    pub fn line(&self) -> OsString {
        let mut line = OsString::new();
        for arg in &self.args {
            line.push(" ");
            line.push(arg);
        }
        line
    }

    /// The forwarded arguments, in order.
    pub fn args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsString::as_os_str)
    }

    /// Attach the line to `cmd`.
    ///
    /// Windows receives the line verbatim. Unix children take an argument
    /// vector, so each forwarded argument becomes one entry.
    pub fn apply(&self, cmd: &mut Command) {
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            for arg in self.args() {
                cmd.raw_arg(arg);
            }
        }
        #[cfg(not(windows))]
        cmd.args(self.args());
    }
}
