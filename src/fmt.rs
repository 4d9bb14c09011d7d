mod json_writer;
mod md_writer;

use strum::{Display, EnumString};

pub use self::{json_writer::JsonWriter, md_writer::MarkdownWriter};
use crate::{error::Result, releasegen::ReleaseNotes, ReleaseGen};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Markdown,
}

/// A trait that allows writing the results of a release note run in an
/// arbitrary format. The single required function `write_release_notes()`
/// accepts the resolved refs and the `SectionMap`, which can be thought of as
/// the release's "AST" of sorts.
///
/// Two implementors are provided, `MarkdownWriter` for the text pasted into
/// a GitHub release and `JsonWriter` for scripting.
pub trait FormatWriter {
    fn write_release_notes(&mut self, options: &ReleaseGen, notes: &ReleaseNotes) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("Markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "markdown");
    }
}
