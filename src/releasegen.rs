use std::path::{Path, PathBuf};

use log::debug;

use crate::{
    config::Config,
    error::Result,
    fmt::{FormatWriter, JsonWriter, MarkdownWriter, OutputFormat},
    git::{self, CommitIdentity, Git},
    github::{GitHub, PullRequest, RepoSlug},
    runner::CommandRunner,
    sectionmap::SectionMap,
};

/// The base struct used to set options and build release notes.
///
/// # Example
///
/// ```no_run
/// # use gh_releasegen::{ReleaseGen, SystemRunner};
/// let text = ReleaseGen::new("v1.0.0", "v1.1.0")
///     .exclude_overview(true)
///     .render(&SystemRunner)
///     .unwrap();
/// print!("{text}");
/// ```
#[derive(Debug, Clone)]
pub struct ReleaseGen {
    /// The ref the release is compared against (usually the previous tag)
    pub base_ref: String,
    /// The ref being released
    pub target_ref: String,
    /// Owner of the GitHub repository, when it isn't the local one's
    pub repo_owner: Option<String>,
    /// Name of the GitHub repository, when it isn't the local one's
    pub repo_name: Option<String>,
    /// Somewhere inside the local working copy (Defaults to the current
    /// directory)
    pub repo_path: Option<PathBuf>,
    /// Leave out the `## Overview` placeholder
    pub exclude_overview: bool,
    /// How many merged pull requests to ask `gh` for
    pub pr_limit: Option<u32>,
    /// Overrides the `.gh-releasegen.json` of the repository
    pub config: Option<Config>,
    pub out_format: OutputFormat,
}

/// Everything collected for one release, as handed to a `FormatWriter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub base: CommitIdentity,
    pub target: CommitIdentity,
    /// Web URL of the repository, without a trailing slash
    pub repo_url: String,
    pub sections: SectionMap,
}

impl ReleaseNotes {
    /// The markdown link comparing the two refs on GitHub
    pub fn compare_link(&self) -> String {
        let range = format!("{}...{}", self.base.ref_name, self.target.ref_name);
        format!("[`{range}`]({}/compare/{range})", self.repo_url)
    }
}

impl ReleaseGen {
    pub fn new<S: Into<String>>(base_ref: S, target_ref: S) -> Self {
        ReleaseGen {
            base_ref: base_ref.into(),
            target_ref: target_ref.into(),
            repo_owner: None,
            repo_name: None,
            repo_path: None,
            exclude_overview: false,
            pr_limit: None,
            config: None,
            out_format: OutputFormat::Markdown,
        }
    }

    pub fn repo_owner<S: Into<String>>(mut self, o: S) -> Self {
        self.repo_owner = Some(o.into());
        self
    }

    pub fn repo_name<S: Into<String>>(mut self, n: S) -> Self {
        self.repo_name = Some(n.into());
        self
    }

    pub fn repo_path<P: AsRef<Path>>(mut self, p: P) -> Self {
        self.repo_path = Some(p.as_ref().to_path_buf());
        self
    }

    pub fn exclude_overview(mut self, e: bool) -> Self {
        self.exclude_overview = e;
        self
    }

    pub fn pr_limit(mut self, l: u32) -> Self {
        self.pr_limit = Some(l);
        self
    }

    pub fn config(mut self, c: Config) -> Self {
        self.config = Some(c);
        self
    }

    pub fn output_format(mut self, f: OutputFormat) -> Self {
        self.out_format = f;
        self
    }

    /// Runs every `git` and `gh` query and categorizes the pull requests.
    ///
    /// Steps run one after another and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Any of the crate's errors, see `Error`.
    pub fn collect(&self, runner: &dyn CommandRunner) -> Result<ReleaseNotes> {
        let slug = RepoSlug::from_parts(self.repo_owner.as_deref(), self.repo_name.as_deref())?;
        let root = git::discover_root(runner, self.repo_path.as_deref())?;
        debug!("Repository root: {:?}", root);

        let config = match self.config {
            Some(ref cfg) => cfg.clone(),
            None => Config::from_repo(&root)?,
        };

        let git = Git::new(runner, &root);
        let base = git.resolve_ref(&self.base_ref)?;
        let target = git.resolve_ref(&self.target_ref)?;
        debug!("Comparing {:?} with {:?}", base, target);

        let github = GitHub::new(runner, &root, slug);
        let pull_requests: Vec<PullRequest> = github.merged_pull_requests(self.pr_limit)?;
        let range = git.commits_between(&base, &target)?;
        let repo_url = github.repo_url()?;

        Ok(ReleaseNotes {
            sections: SectionMap::from_pull_requests(&pull_requests, &range, &config),
            base,
            target,
            repo_url,
        })
    }

    /// Writes already collected release notes with the given writer
    pub fn write_release_notes_with<W: FormatWriter>(
        &self,
        notes: &ReleaseNotes,
        writer: &mut W,
    ) -> Result<()> {
        writer.write_release_notes(self, notes)
    }

    /// Collects and writes the release notes in `self.out_format`, returning
    /// the whole document. Nothing is returned unless every step succeeded.
    pub fn render(&self, runner: &dyn CommandRunner) -> Result<String> {
        let notes = self.collect(runner)?;
        let mut buf = Vec::with_capacity(1024);
        match self.out_format {
            OutputFormat::Markdown => {
                let mut writer = MarkdownWriter::new(&mut buf);
                self.write_release_notes_with(&notes, &mut writer)?;
            }
            OutputFormat::Json => {
                let mut writer = JsonWriter::new(&mut buf);
                self.write_release_notes_with(&notes, &mut writer)?;
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
