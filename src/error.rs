use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

/// An enum for describing and handling the errors encountered while
/// collecting commits and pull requests, or writing release notes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("`{program}` exited with {}: {}", status_text(.status), .stderr.trim())]
    BackendCommand {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("could not parse {what} from output: {output:?}")]
    Parse { what: &'static str, output: String },

    #[error("failed to get data from `gh`: {0}")]
    DataSource(String),

    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "the configuration file already exists at {}. Use the '--force' option to overwrite the file",
        .0.display()
    )]
    ConfigExists(PathBuf),

    #[error("{0}")]
    Validation(String),

    #[error("fatal I/O error: {0}")]
    Io(#[from] io::Error),
}

fn status_text(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no exit status".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_command_display_trims_stderr() {
        let err = Error::BackendCommand {
            program: "git".into(),
            status: Some(128),
            stderr: "fatal: bad revision 'v9'\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "`git` exited with status 128: fatal: bad revision 'v9'"
        );
    }

    #[test]
    fn backend_command_without_status() {
        let err = Error::BackendCommand {
            program: "gh".into(),
            status: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "`gh` exited with no exit status: ");
    }

    #[test]
    fn parse_display_quotes_output() {
        let err = Error::Parse {
            what: "commit",
            output: "garbage".into(),
        };
        assert_eq!(
            err.to_string(),
            "could not parse commit from output: \"garbage\""
        );
    }
}
