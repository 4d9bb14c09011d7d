use std::io;

use serde::Serialize;

use crate::{
    error::Result,
    fmt::FormatWriter,
    git::CommitIdentity,
    releasegen::ReleaseNotes,
    sectionmap::SectionMap,
    ReleaseGen,
};

/// Wraps a `std::io::Write` object to write release notes as JSON, for
/// scripts that post-process them
///
/// # Example
///
/// ```no_run
/// # use gh_releasegen::{ReleaseGen, SystemRunner, fmt::JsonWriter};
/// let release = ReleaseGen::new("v1.0.0", "HEAD");
/// let notes = release.collect(&SystemRunner).unwrap();
///
/// let mut file = std::fs::File::create("release.json").unwrap();
/// let mut writer = JsonWriter::new(&mut file);
/// release.write_release_notes_with(&notes, &mut writer).unwrap();
/// ```
pub struct JsonWriter<'a>(&'a mut dyn io::Write);

#[derive(Serialize)]
struct JsonRelease<'n> {
    base: &'n CommitIdentity,
    target: &'n CommitIdentity,
    repo_url: &'n str,
    compare_url: String,
    overview: bool,
    sections: &'n SectionMap,
}

impl<'a> JsonWriter<'a> {
    pub fn new<T: io::Write>(writer: &'a mut T) -> JsonWriter<'a> { JsonWriter(writer) }
}

impl<'a> FormatWriter for JsonWriter<'a> {
    fn write_release_notes(&mut self, options: &ReleaseGen, notes: &ReleaseNotes) -> Result<()> {
        let release = JsonRelease {
            base: &notes.base,
            target: &notes.target,
            repo_url: &notes.repo_url,
            compare_url: format!(
                "{}/compare/{}...{}",
                notes.repo_url, notes.base.ref_name, notes.target.ref_name
            ),
            overview: !options.exclude_overview,
            sections: &notes.sections,
        };
        serde_json::to_writer_pretty(&mut self.0, &release).map_err(io::Error::from)?;
        writeln!(self.0)?;
        self.0.flush().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::sectionmap::{tests::pr, ChangeGroup, GroupScope};

    #[test]
    fn writes_sections_as_json() {
        let notes = ReleaseNotes {
            base: CommitIdentity {
                short_hash: "abc1234".into(),
                ref_name: "v1.0.0".into(),
                subject: "Release 1.0.0".into(),
            },
            target: CommitIdentity {
                short_hash: "def5678".into(),
                ref_name: "v1.1.0".into(),
                subject: "Release 1.1.0".into(),
            },
            repo_url: "https://github.com/octo/hello".into(),
            sections: SectionMap {
                groups: vec![ChangeGroup {
                    scope: GroupScope::All,
                    changes: vec![pr(7, "octocat", &["docs"], Some("1111111"))],
                    bug_fixes: vec![],
                }],
                ..SectionMap::default()
            },
        };

        let mut buf = vec![];
        JsonWriter::new(&mut buf)
            .write_release_notes(&ReleaseGen::new("v1.0.0", "v1.1.0"), &notes)
            .unwrap();
        let json: Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(json["base"]["short_hash"], "abc1234");
        assert_eq!(
            json["compare_url"],
            "https://github.com/octo/hello/compare/v1.0.0...v1.1.0"
        );
        assert_eq!(json["overview"], true);
        assert_eq!(json["sections"]["groups"][0]["scope"]["kind"], "all");
        assert_eq!(json["sections"]["groups"][0]["changes"][0]["number"], 7);
        assert_eq!(
            json["sections"]["groups"][0]["changes"][0]["labels"][0]["name"],
            "docs"
        );
        assert_eq!(json["sections"]["maintenance"], Value::Array(vec![]));
    }
}
