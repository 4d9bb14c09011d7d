use std::{path::Path, process::Command};

use log::debug;

use crate::error::{Error, Result};

/// What an external program left behind once it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// The exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool { self.status == Some(0) }

    /// Returns stdout for a zero exit status, otherwise a
    /// `Error::BackendCommand` carrying the captured stderr.
    pub fn into_stdout(self, program: &str) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(Error::BackendCommand {
                program: program.to_owned(),
                status: self.status,
                stderr: self.stderr,
            })
        }
    }
}

/// The seam between release note generation and the `git` and `gh` binaries.
///
/// Implementors run `program` with `args` inside `cwd` and wait for it to exit.
/// A non-zero exit is *not* an error at this level, callers decide what it
/// means through `CommandOutput::into_stdout`.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput>;
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        debug!("Running `{} {}` in {:?}", program, args.join(" "), cwd);
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| Error::Spawn {
                program: program.to_owned(),
                source,
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
