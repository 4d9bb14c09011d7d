use log::debug;
use serde::Serialize;
use strum::Display;

use crate::{
    config::{Config, ProjectLabel},
    git::CommitRange,
    github::PullRequest,
};

/// The login dependabot opens its pull requests under
pub const DEPENDENCY_BOT_LOGIN: &str = "app/dependabot";

/// The section a pull request is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[strum(serialize = "✍️ What's Changed")]
    FeatureOrEnhancement,
    #[strum(serialize = "🪳 Bug Fixes")]
    BugFix,
    #[strum(serialize = "🧹 Maintenance")]
    Maintenance,
    #[strum(serialize = "⛓️ Dependency updates")]
    DependencyUpdate,
}

impl Category {
    /// Picks the section `pr` is listed under among features and bug fixes,
    /// or `None` for pull requests by bots other than dependabot.
    ///
    /// Dependabot wins over labels. A bug label makes a bug fix. Without one,
    /// a maintenance label keeps the pull request out of the features and
    /// gives `Maintenance`. Bug fixes with a maintenance label are listed
    /// under maintenance as well, see `SectionMap::from_pull_requests`.
    pub fn of(pr: &PullRequest, config: &Config) -> Option<Category> {
        if pr.author.login == DEPENDENCY_BOT_LOGIN {
            return Some(Category::DependencyUpdate);
        }
        if pr.author.is_bot {
            return None;
        }

        let labels = &config.labels;
        if pr.label_names().any(|l| labels.is_bug(l)) {
            Some(Category::BugFix)
        } else if pr.label_names().any(|l| labels.is_maintenance(l)) {
            Some(Category::Maintenance)
        } else {
            Some(Category::FeatureOrEnhancement)
        }
    }
}

/// Which pull requests a `ChangeGroup` holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupScope {
    /// Project labels are off, everything is in one group
    All,
    /// Pull requests carrying this project's label
    Project(ProjectLabel),
    /// Pull requests carrying none of the configured project labels
    Other,
}

impl GroupScope {
    /// The subsection heading, if the group gets one
    pub fn heading(&self) -> Option<&str> {
        match self {
            GroupScope::All => None,
            GroupScope::Project(p) => Some(&p.name),
            GroupScope::Other => Some("Other"),
        }
    }

    fn admits(&self, pr: &PullRequest, config: &Config) -> bool {
        match self {
            GroupScope::All => true,
            GroupScope::Project(p) => pr.has_label(&p.label),
            GroupScope::Other => !pr
                .label_names()
                .any(|l| config.separate_project_label.is_project_label(l)),
        }
    }
}

/// Features and bug fixes for one scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeGroup {
    pub scope: GroupScope,
    pub changes: Vec<PullRequest>,
    pub bug_fixes: Vec<PullRequest>,
}

impl ChangeGroup {
    pub fn is_empty(&self) -> bool { self.changes.is_empty() && self.bug_fixes.is_empty() }
}

/// The categorized pull requests of a release, ready to be written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionMap {
    /// One group when project labels are off, otherwise one per project
    /// followed by `Other`
    pub groups: Vec<ChangeGroup>,
    pub maintenance: Vec<PullRequest>,
    pub dependency_updates: Vec<PullRequest>,
}

impl SectionMap {
    /// Keeps the pull requests merged inside `range` and sorts them into
    /// sections, each ordered by pull request number.
    pub fn from_pull_requests(
        pull_requests: &[PullRequest],
        range: &CommitRange,
        config: &Config,
    ) -> SectionMap {
        let mut in_range: Vec<&PullRequest> = pull_requests
            .iter()
            .filter(|pr| {
                pr.merge_commit_short_hash()
                    .is_some_and(|hash| range.contains(hash))
            })
            .collect();
        in_range.sort_by_key(|pr| pr.number);
        debug!(
            "{} of {} merged pull requests fall in the commit range",
            in_range.len(),
            pull_requests.len()
        );

        let mut sm = SectionMap::default();
        let mut changes = vec![];
        let mut bug_fixes = vec![];
        for pr in in_range {
            match Category::of(pr, config) {
                Some(Category::FeatureOrEnhancement) => changes.push(pr),
                Some(Category::BugFix) => {
                    if pr.label_names().any(|l| config.labels.is_maintenance(l)) {
                        sm.maintenance.push(pr.clone());
                    }
                    bug_fixes.push(pr);
                }
                Some(Category::Maintenance) => sm.maintenance.push(pr.clone()),
                Some(Category::DependencyUpdate) => sm.dependency_updates.push(pr.clone()),
                None => debug!("Leaving out #{} by bot {}", pr.number, pr.author.login),
            }
        }

        let projects = &config.separate_project_label;
        let scopes: Vec<GroupScope> = if projects.enable {
            projects
                .project_labels
                .iter()
                .cloned()
                .map(GroupScope::Project)
                .chain(Some(GroupScope::Other))
                .collect()
        } else {
            vec![GroupScope::All]
        };

        sm.groups = scopes
            .into_iter()
            .map(|scope| {
                let pick = |prs: &[&PullRequest]| -> Vec<PullRequest> {
                    prs.iter()
                        .filter(|pr| scope.admits(pr, config))
                        .map(|pr| (*pr).clone())
                        .collect()
                };
                ChangeGroup {
                    changes: pick(&changes),
                    bug_fixes: pick(&bug_fixes),
                    scope,
                }
            })
            .collect();

        sm
    }

    /// Whether no pull request made it into any section
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(ChangeGroup::is_empty)
            && self.maintenance.is_empty()
            && self.dependency_updates.is_empty()
    }
}
