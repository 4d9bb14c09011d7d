use std::io;

use crate::{
    error::Result,
    fmt::FormatWriter,
    github::PullRequest,
    releasegen::ReleaseNotes,
    sectionmap::{Category, ChangeGroup},
    title::prettify_dependency_title,
    ReleaseGen,
};

/// Wraps a `std::io::Write` object to write release notes as the Markdown
/// GitHub expects in a release body
///
/// # Example
///
/// ```no_run
/// # use gh_releasegen::{ReleaseGen, SystemRunner, fmt::MarkdownWriter};
/// let release = ReleaseGen::new("v1.0.0", "HEAD");
/// let notes = release.collect(&SystemRunner).unwrap();
///
/// let out = std::io::stdout();
/// let mut out = out.lock();
/// let mut writer = MarkdownWriter::new(&mut out);
/// release.write_release_notes_with(&notes, &mut writer).unwrap();
/// ```
pub struct MarkdownWriter<'a>(&'a mut dyn io::Write);

impl<'a> MarkdownWriter<'a> {
    /// Creates a new instance of the `MarkdownWriter` struct using a
    /// `std::io::Write` object.
    pub fn new<T: io::Write + 'a>(writer: &'a mut T) -> MarkdownWriter<'a> {
        MarkdownWriter(writer)
    }

    fn write_overview(&mut self) -> Result<()> {
        write!(
            self.0,
            "## Overview\n\nAdd an overview of the changes here...\n\n"
        )
        .map_err(Into::into)
    }

    fn write_group(&mut self, group: &ChangeGroup) -> Result<()> {
        if group.is_empty() {
            return Ok(());
        }

        let level = match group.scope.heading() {
            Some(heading) => {
                write!(self.0, "### {heading}\n\n")?;
                "####"
            }
            None => "###",
        };
        self.write_section(level, Category::FeatureOrEnhancement, &group.changes)?;
        self.write_section(level, Category::BugFix, &group.bug_fixes)
    }

    /// Writes a particular section of the release notes
    fn write_section(
        &mut self,
        level: &str,
        category: Category,
        entries: &[PullRequest],
    ) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        write!(self.0, "{level} {category}\n\n")?;
        for pr in entries {
            if category == Category::DependencyUpdate {
                let login = pr.author.login.trim_start_matches("app/");
                writeln!(
                    self.0,
                    "* {} by @{login} in #{}",
                    prettify_dependency_title(&pr.title),
                    pr.number
                )?;
            } else {
                writeln!(
                    self.0,
                    "* {} by @{} in #{}",
                    pr.title, pr.author.login, pr.number
                )?;
            }
        }
        writeln!(self.0).map_err(Into::into)
    }
}

impl<'a> FormatWriter for MarkdownWriter<'a> {
    fn write_release_notes(&mut self, options: &ReleaseGen, notes: &ReleaseNotes) -> Result<()> {
        if !options.exclude_overview {
            self.write_overview()?;
        }

        let sections = &notes.sections;
        for group in &sections.groups {
            self.write_group(group)?;
        }
        self.write_section("###", Category::Maintenance, &sections.maintenance)?;
        self.write_section(
            "###",
            Category::DependencyUpdate,
            &sections.dependency_updates,
        )?;

        writeln!(self.0, "**Full Changelog**: {}", notes.compare_link())?;
        self.0.flush().map_err(Into::into)
    }
}
