use crate::options::tokens;
use std::env as stdenv;
use std::path::PathBuf;
use thiserror::Error;

/// Reason a variable could not be set for the launched application.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment variable with value `{value}` has an empty name")]
    EmptyName { value: String },
    #[error("environment variable `{name}` contains a NUL byte")]
    NulByte { name: String },
}

/// The environment the launched application starts in.
///
/// The environment contains:
/// - `vars`: variables set on top of the inherited process environment, in
///   the order they were applied.
/// - `current_dir`: the working directory captured when the launcher started.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Variables added or overridden for the child.
    pub vars: Vec<(String, String)>,
    /// The working directory for the child.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current working directory, with no variables set yet.
    ///
    /// Falls back to `.` when the working directory cannot be determined.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|err| {
            tracing::warn!(%err, "cannot determine the working directory, using `.`");
            PathBuf::from(".")
        });
        Self {
            vars: Vec::new(),
            current_dir,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override a variable, rejecting names the platform refuses.
    pub fn set_var(
        &mut self,
        key: impl Into<String>,
        val: impl Into<String>,
    ) -> Result<(), EnvError> {
        let (key, val): (String, String) = (key.into(), val.into());
        if key.is_empty() {
            return Err(EnvError::EmptyName { value: val });
        }
        if key.contains('\0') || val.contains('\0') {
            return Err(EnvError::NulByte { name: key });
        }
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = val,
            None => self.vars.push((key, val)),
        }
        Ok(())
    }

    /// Apply a comma-separated list of `KEY=VALUE` assignments.
    ///
    /// Each entry is split on its first `=`; entries without one are skipped.
    /// Stops at the first variable that cannot be set, leaving the entries
    /// before it applied and the ones after it untouched.
    pub fn inject(&mut self, assignments: &str) -> Result<usize, EnvError> {
        let mut applied = 0;
        for pair in tokens(assignments) {
            let Some((key, value)) = pair.split_once('=') else {
                tracing::debug!(entry = pair, "skipping environment entry without `=`");
                continue;
            };
            self.set_var(key, value)?;
            applied += 1;
        }
        Ok(applied)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env as stdenv;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    fn empty() -> Environment {
        Environment {
            vars: Vec::new(),
            current_dir: stdenv::current_dir().unwrap(),
        }
    }

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = empty();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE").unwrap();

        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_new_captures_working_directory() {
        let env = Environment::new();
        assert_eq!(env.current_dir, stdenv::current_dir().unwrap());
        assert!(env.vars.is_empty());
    }

    #[test]
    fn test_inject_pairs_in_order() {
        let mut env = empty();
        assert_eq!(env.inject("A=1,B=2"), Ok(2));
        assert_eq!(env.vars, vec![pair("A", "1"), pair("B", "2")]);
    }

    #[test]
    fn test_inject_skips_entries_without_equals() {
        let mut env = empty();
        assert_eq!(env.inject("MALFORMED,A=1,,B=2"), Ok(2));
        assert_eq!(env.get_var("A"), Some("1".into()));
        assert_eq!(env.get_var("B"), Some("2".into()));
        assert!(env.vars.iter().all(|(k, _)| k != "MALFORMED"));
    }

    #[test]
    fn test_inject_splits_on_first_equals() {
        let mut env = empty();
        env.inject("OPTS=a=b=c,EMPTY=").unwrap();
        assert_eq!(env.get_var("OPTS"), Some("a=b=c".into()));
        assert_eq!(env.get_var("EMPTY"), Some(String::new()));
    }

    #[test]
    fn test_inject_stops_at_rejected_variable() {
        let mut env = empty();
        let err = env.inject("A=1,=oops,B=2").unwrap_err();
        assert_eq!(
            err,
            EnvError::EmptyName {
                value: "oops".into()
            }
        );
        assert_eq!(env.vars, vec![pair("A", "1")]);
    }

    #[test]
    fn test_nul_bytes_are_rejected() {
        let mut env = empty();
        assert!(matches!(
            env.set_var("BAD", "a\0b"),
            Err(EnvError::NulByte { .. })
        ));
        assert!(env.vars.is_empty());
    }

    #[test]
    fn test_later_assignment_overrides() {
        let mut env = empty();
        env.inject("A=1,A=2").unwrap();
        assert_eq!(env.vars, vec![pair("A", "2")]);
    }
}
