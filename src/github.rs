use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    runner::CommandRunner,
};

const GH: &str = "gh";

/// The fields requested from `gh pr list`
const PR_FIELDS: &str = "number,title,mergeCommit,author,labels";

/// A merged pull request as `gh pr list --json` reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: Author,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub merge_commit: Option<MergeCommit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Author {
    pub login: String,
    #[serde(default)]
    pub is_bot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MergeCommit {
    #[serde(default)]
    pub oid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoView {
    url: String,
}

impl PullRequest {
    /// The first 7 chars of the merge commit hash, if the pull request has one
    pub fn merge_commit_short_hash(&self) -> Option<&str> {
        let oid = self.merge_commit.as_ref()?.oid.as_deref()?;
        oid.get(..7).or(Some(oid)).filter(|h| !h.is_empty())
    }

    pub fn has_label(&self, name: &str) -> bool { self.labels.iter().any(|l| l.name == name) }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.name.as_str())
    }
}

/// An `<owner>/<repo>` pair naming a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    /// Builds a slug out of an optional owner and name. Both or neither must be
    /// given; neither means "the repository of the local working copy".
    ///
    /// # Errors
    ///
    /// `Error::Validation` when only one half is present.
    pub fn from_parts(owner: Option<&str>, name: Option<&str>) -> Result<Option<Self>> {
        match (owner, name) {
            (Some(owner), Some(name)) => Ok(Some(RepoSlug {
                owner: owner.to_owned(),
                name: name.to_owned(),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(Error::Validation(
                "a repository name is required when a repository owner is given".into(),
            )),
            (None, Some(_)) => Err(Error::Validation(
                "a repository owner is required when a repository name is given".into(),
            )),
        }
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Queries GitHub through the `gh` CLI, which owns authentication and network
/// access.
pub struct GitHub<'r> {
    runner: &'r dyn CommandRunner,
    work_dir: PathBuf,
    repo: Option<RepoSlug>,
}

impl<'r> GitHub<'r> {
    pub fn new<P: AsRef<Path>>(
        runner: &'r dyn CommandRunner,
        work_dir: P,
        repo: Option<RepoSlug>,
    ) -> Self {
        GitHub {
            runner,
            work_dir: work_dir.as_ref().to_path_buf(),
            repo,
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let out = self.runner.run(GH, args, &self.work_dir)?;
        if out.success() {
            Ok(out.stdout)
        } else {
            Err(Error::DataSource(format!(
                "`gh {}` failed: {}",
                args.join(" "),
                out.stderr.trim()
            )))
        }
    }

    /// Every merged pull request `gh` reports, up to `limit` when one is given
    /// (`gh` itself stops at 30 otherwise).
    ///
    /// # Errors
    ///
    /// `Error::DataSource` when `gh` fails or prints something that isn't the
    /// expected JSON array. Nothing is returned in that case.
    pub fn merged_pull_requests(&self, limit: Option<u32>) -> Result<Vec<PullRequest>> {
        let limit = limit.map(|l| l.to_string());
        let slug = self.repo.as_ref().map(ToString::to_string);

        let mut args = vec!["pr", "list", "--state", "merged", "--json", PR_FIELDS];
        if let Some(ref limit) = limit {
            args.extend(["--limit", limit.as_str()]);
        }
        if let Some(ref slug) = slug {
            args.extend(["--repo", slug.as_str()]);
        }

        let out = self.run(&args)?;
        let prs = parse_pull_requests(&out)?;
        debug!("gh reported {} merged pull requests", prs.len());
        for pr in prs.iter().filter(|pr| pr.merge_commit_short_hash().is_none()) {
            warn!("Pull request #{} has no merge commit, skipping it", pr.number);
        }
        Ok(prs)
    }

    /// The web URL of the repository, used for the compare link.
    pub fn repo_url(&self) -> Result<String> {
        let slug = self.repo.as_ref().map(ToString::to_string);
        let mut args = vec!["repo", "view", "--json", "url"];
        if let Some(ref slug) = slug {
            args.push(slug.as_str());
        }

        let out = self.run(&args)?;
        let view: RepoView = serde_json::from_str(&out)
            .map_err(|e| Error::DataSource(format!("unexpected `gh repo view` output: {e}")))?;
        Ok(view.url.trim_end_matches('/').to_owned())
    }
}

/// Parses the JSON array printed by `gh pr list --json`.
pub fn parse_pull_requests(json: &str) -> Result<Vec<PullRequest>> {
    serde_json::from_str(json)
        .map_err(|e| Error::DataSource(format!("unexpected `gh pr list` output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::canned::CannedRunner;

    const PR_LIST: &str = r#"[
      {
        "author": {"id": "MDQ6", "is_bot": false, "login": "octocat", "name": "Octo Cat"},
        "labels": [{"id": "LA_1", "name": "bug", "description": "", "color": "d73a4a"}],
        "mergeCommit": {"oid": "1112223aaaabbbbccccddddeeeeffff000011112"},
        "number": 12,
        "title": "Fix the thing"
      },
      {
        "author": {"is_bot": true, "login": "app/dependabot"},
        "labels": [],
        "mergeCommit": null,
        "number": 13,
        "title": "Bump serde from 1.0.1 to 1.0.2"
      }
    ]"#;

    #[test]
    fn parses_gh_pr_list() {
        let prs = parse_pull_requests(PR_LIST).unwrap();
        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].number, 12);
        assert_eq!(prs[0].author.login, "octocat");
        assert!(!prs[0].author.is_bot);
        assert!(prs[0].has_label("bug"));
        assert_eq!(prs[0].merge_commit_short_hash(), Some("1112223"));
        assert!(prs[1].author.is_bot);
        assert_eq!(prs[1].merge_commit_short_hash(), None);
    }

    #[test]
    fn malformed_json_is_data_source_error() {
        let res = parse_pull_requests("{\"not\": \"a list\"}");
        assert!(matches!(res, Err(Error::DataSource(_))), "{res:?}");
        assert!(matches!(parse_pull_requests(""), Err(Error::DataSource(_))));
    }

    #[test]
    fn short_hash_of_short_oid() {
        let pr = PullRequest {
            number: 1,
            title: "t".into(),
            author: Author {
                login: "a".into(),
                is_bot: false,
            },
            labels: vec![],
            merge_commit: Some(MergeCommit {
                oid: Some("abc".into()),
            }),
        };
        assert_eq!(pr.merge_commit_short_hash(), Some("abc"));
    }

    #[test]
    fn slug_needs_both_halves() {
        assert_eq!(RepoSlug::from_parts(None, None).unwrap(), None);
        let slug = RepoSlug::from_parts(Some("octo"), Some("hello")).unwrap().unwrap();
        assert_eq!(slug.to_string(), "octo/hello");
        assert!(matches!(
            RepoSlug::from_parts(Some("octo"), None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            RepoSlug::from_parts(None, Some("hello")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn pr_list_scoped_to_repo_with_limit() {
        let runner = CannedRunner::new().ok(
            "gh pr list --state merged --json number,title,mergeCommit,author,labels --limit 50 --repo octo/hello",
            PR_LIST,
        );
        let slug = RepoSlug::from_parts(Some("octo"), Some("hello")).unwrap();
        let gh = GitHub::new(&runner, "/repo", slug);
        assert_eq!(gh.merged_pull_requests(Some(50)).unwrap().len(), 2);
    }

    #[test]
    fn pr_list_failure_is_data_source_error() {
        let runner = CannedRunner::new().fail(
            "gh pr list --state merged --json number,title,mergeCommit,author,labels",
            "gh: To get started with GitHub CLI, please run:  gh auth login",
        );
        let gh = GitHub::new(&runner, "/repo", None);
        match gh.merged_pull_requests(None) {
            Err(Error::DataSource(msg)) => assert!(msg.contains("gh auth login"), "{msg}"),
            other => panic!("expected DataSource, got {other:?}"),
        }
    }

    #[test]
    fn repo_url_from_view() {
        let runner = CannedRunner::new().ok(
            "gh repo view --json url",
            "{\"url\":\"https://github.com/octo/hello\"}\n",
        );
        let gh = GitHub::new(&runner, "/repo", None);
        assert_eq!(gh.repo_url().unwrap(), "https://github.com/octo/hello");
    }

    #[test]
    fn repo_url_for_slug() {
        let runner = CannedRunner::new().ok(
            "gh repo view --json url octo/hello",
            "{\"url\":\"https://github.com/octo/hello/\"}",
        );
        let slug = RepoSlug::from_parts(Some("octo"), Some("hello")).unwrap();
        let gh = GitHub::new(&runner, "/repo", slug);
        assert_eq!(gh.repo_url().unwrap(), "https://github.com/octo/hello");
    }
}
