use crate::cmdline::CommandLine;
use crate::command::{self, ExitCode};
use crate::config::LauncherConfig;
use crate::env::Environment;
use crate::error::LaunchError;
use crate::options::LaunchOptions;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Starts the configured application and coordinates the launcher's exit.
///
/// Construction parses the options and prepares the child's environment;
/// [`Launcher::launch`] spawns the child and either waits for it or returns
/// straight away.
///
/// Example
/// ```no_run
/// use alias_launcher::{Launcher, LauncherConfig};
/// let config = LauncherConfig::new("/usr/bin/env", "", "GREETING=hello");
/// let code = Launcher::new(&config).unwrap().launch(["GREETING"]).unwrap();
/// assert_eq!(code, 0);
/// ```
#[derive(Debug)]
pub struct Launcher {
    target: PathBuf,
    options: LaunchOptions,
    env: Environment,
}

impl Launcher {
    /// Prepare a launch of `config.target`.
    ///
    /// A variable that cannot be set stops the injection of the remaining
    /// ones but does not fail the launch.
    pub fn new(config: &LauncherConfig) -> Result<Self, LaunchError> {
        if config.target.is_empty() {
            return Err(LaunchError::MissingTarget);
        }
        let options = LaunchOptions::parse(&config.options);
        let mut env = Environment::new();
        match env.inject(&config.env) {
            Ok(applied) => tracing::debug!(applied, "environment prepared"),
            Err(err) => tracing::warn!(%err, "stopped applying environment variables"),
        }
        Ok(Self {
            target: PathBuf::from(&config.target),
            options,
            env,
        })
    }

    /// Switches parsed from the configured option list.
    pub fn options(&self) -> LaunchOptions {
        self.options
    }

    /// Working directory and variables the child will start with.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    fn command(&self, line: &CommandLine) -> Command {
        let mut cmd = Command::new(&self.target);
        line.apply(&mut cmd);
        cmd.envs(self.env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&self.env.current_dir);
        if self.options.std_redirect {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        } else {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
        cmd
    }

    /// Spawn the application with `args` and wait for it when blocking.
    ///
    /// Returns the child's exit code in blocking mode and 0 otherwise. In
    /// non-blocking mode the child is left running on its own.
    pub fn launch<I, S>(self, args: I) -> Result<ExitCode, LaunchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let line = CommandLine::new(args);
        tracing::debug!(
            target_path = %self.target.display(),
            line = ?line.line(),
            blocking = self.options.blocking,
            std_redirect = self.options.std_redirect,
            "launching"
        );

        let mut child = self
            .command(&line)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                path: self.target.clone(),
                source,
            })?;

        if !self.options.blocking {
            tracing::debug!(
                pid = child.id(),
                "not waiting for the launched application"
            );
            return Ok(0);
        }

        let status = child.wait().map_err(LaunchError::Wait)?;
        Ok(command::exit_code(status))
    }
}
