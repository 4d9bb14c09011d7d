use std::{
    env,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Serialize;

use crate::{
    error::{Error, Result},
    runner::CommandRunner,
};

const GIT: &str = "git";

/// A ref resolved to the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitIdentity {
    /// The abbreviated hash (at least 7 chars)
    pub short_hash: String,
    /// The ref name as `git` reports it, used for ranges and compare links
    pub ref_name: String,
    /// The commit subject
    pub subject: String,
}

/// The short hashes reachable from the target but not the base, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRange {
    hashes: Vec<String>,
}

impl CommitRange {
    pub fn new(hashes: Vec<String>) -> Self { CommitRange { hashes } }

    pub fn hashes(&self) -> &[String] { &self.hashes }

    pub fn len(&self) -> usize { self.hashes.len() }

    pub fn is_empty(&self) -> bool { self.hashes.is_empty() }

    /// Whether `short_hash` names a commit in the range. `git` may abbreviate
    /// past 7 chars, so either side being a prefix of the other counts.
    pub fn contains(&self, short_hash: &str) -> bool {
        !short_hash.is_empty()
            && self
                .hashes
                .iter()
                .any(|h| h.starts_with(short_hash) || short_hash.starts_with(h.as_str()))
    }
}

/// Runs the `git` queries release notes are built from, inside one working
/// directory.
pub struct Git<'r> {
    runner: &'r dyn CommandRunner,
    work_dir: PathBuf,
}

impl<'r> Git<'r> {
    pub fn new<P: AsRef<Path>>(runner: &'r dyn CommandRunner, work_dir: P) -> Self {
        Git {
            runner,
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        self.runner
            .run(GIT, args, &self.work_dir)?
            .into_stdout(GIT)
    }

    /// Resolves a tag, branch or `HEAD` to the commit it points at.
    ///
    /// # Errors
    ///
    /// `Error::Validation` for a ref starting with `-`, which `git` would take
    /// as an option. `Error::BackendCommand` when `git log` fails (e.g. an
    /// unknown ref), and `Error::Parse` when its output isn't a
    /// `<hash> - <ref> - <subject>` line.
    pub fn resolve_ref(&self, input_ref: &str) -> Result<CommitIdentity> {
        if input_ref.starts_with('-') {
            return Err(Error::Validation(format!(
                "'{input_ref}' is not a valid ref"
            )));
        }
        debug!("Resolving ref {:?}", input_ref);
        let out = self.run(&["log", "--format=%h - %S - %s", "-1", input_ref])?;
        parse_commit_line(&out)
    }

    /// Lists the commits in `base..target` in chronological order.
    ///
    /// # Errors
    ///
    /// `Error::BackendCommand` when `git log` fails and `Error::Parse` for a
    /// line that doesn't start with a commit hash.
    pub fn commits_between(
        &self,
        base: &CommitIdentity,
        target: &CommitIdentity,
    ) -> Result<CommitRange> {
        let range = format!("{}..{}", base.ref_name, target.ref_name);
        debug!("Collecting commits in {}", range);
        let out = self.run(&["--no-pager", "log", &range, "--reverse", "--oneline"])?;
        let commits = parse_range(&out)?;
        debug!("Found {} commits in {}", commits.len(), range);
        Ok(commits)
    }

    /// All tags, most recently tagged first.
    pub fn tags(&self) -> Result<Vec<String>> {
        let out = self.run(&["tag", "--list", "--sort=-taggerdate"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToOwned::to_owned)
            .collect())
    }

    /// The top level directory of the working tree `work_dir` belongs to.
    pub fn toplevel(&self) -> Result<PathBuf> {
        let out = self.run(&["rev-parse", "--show-toplevel"])?;
        match out.trim() {
            "" => Err(Error::Parse {
                what: "repository root",
                output: out,
            }),
            root => Ok(PathBuf::from(root)),
        }
    }
}

/// Finds the top level of the repository containing `path`, or the current
/// directory when no path is given.
///
/// # Errors
///
/// `Error::Validation` when `path` is not an existing directory, and
/// `Error::BackendCommand` when it isn't inside a `git` working tree.
pub fn discover_root(runner: &dyn CommandRunner, path: Option<&Path>) -> Result<PathBuf> {
    let start = match path {
        Some(p) if p.is_dir() => p.to_path_buf(),
        Some(p) => {
            return Err(Error::Validation(format!(
                "the directory '{}' does not exist",
                p.display()
            )))
        }
        None => env::current_dir()?,
    };
    Git::new(runner, start).toplevel()
}

/// Parses the `%h - %S - %s` line printed by `git log -1`.
pub fn parse_commit_line(output: &str) -> Result<CommitIdentity> {
    let re = regex!(r"(?P<hash>[[:alnum:]]{7,}) - (?P<ref_name>.+?) - (?P<subject>.+)");
    match re.captures(output) {
        Some(caps) => Ok(CommitIdentity {
            short_hash: caps["hash"].to_owned(),
            ref_name: caps["ref_name"].to_owned(),
            subject: caps["subject"].trim_end().to_owned(),
        }),
        None => Err(Error::Parse {
            what: "commit",
            output: output.to_owned(),
        }),
    }
}

/// Parses `git log --oneline` output, one `<hash> <subject>` per line.
pub fn parse_range(output: &str) -> Result<CommitRange> {
    let re = regex!(r"^(?P<hash>[[:alnum:]]{7,})(?:\s|$)");
    let mut hashes = vec![];
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        match re.captures(line) {
            Some(caps) => hashes.push(caps["hash"].to_owned()),
            None => {
                return Err(Error::Parse {
                    what: "commit range",
                    output: line.to_owned(),
                })
            }
        }
    }
    Ok(CommitRange::new(hashes))
}
