//! A renameable front-end that launches one baked-in application.
//!
//! A launcher binary carries three configuration values fixed at build time:
//! the path of the application to start, a list of option flags and a list of
//! environment assignments. At run time it forwards its own arguments to that
//! application, optionally waits for it and hands back its exit code. Copies
//! of the launcher can be re-targeted without recompiling by patching the
//! configuration slots, see [`stamp`].
//!
//! The main entry point is [`Launcher`]. The public modules expose the pieces
//! of the launch sequence: [`options`], [`env`] and [`cmdline`].

pub mod cmdline;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod launcher;
pub mod logging;
pub mod options;
pub mod stamp;

pub use config::LauncherConfig;
pub use error::LaunchError;
pub use launcher::Launcher;
