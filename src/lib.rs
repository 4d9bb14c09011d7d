//! Builds GitHub release notes from the pull requests merged between two refs.
//!
//! Commits come from `git`, pull requests from the `gh` CLI. Pull requests
//! whose merge commit lies in `base..target` are sorted into sections by their
//! labels and author, then written as Markdown (or JSON).
//!
//! ```no_run
//! # use gh_releasegen::{ReleaseGen, SystemRunner};
//! let text = ReleaseGen::new("v1.0.0", "HEAD").render(&SystemRunner).unwrap();
//! println!("{text}");
//! ```

#[macro_use]
mod macros;
pub mod config;
pub mod error;
pub mod fmt;
pub mod git;
pub mod github;
mod releasegen;
pub mod runner;
mod sectionmap;
mod title;

pub use config::{Config, ProjectLabel};
pub use error::{Error, Result};
pub use releasegen::{ReleaseGen, ReleaseNotes};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use sectionmap::{Category, ChangeGroup, GroupScope, SectionMap, DEPENDENCY_BOT_LOGIN};
pub use title::prettify_dependency_title;

/// The config file looked for at the repository root
pub const DEFAULT_CONFIG_FILE: &str = ".gh-releasegen.json";
