//! Dependency bump titles, as opened by dependabot, read better with the
//! package name and versions marked up.

use std::borrow::Cow;

use regex::Captures;

/// Rewrites `Bump <name> from <old> to <new>[ in <path>]` so the dependency
/// name is bold and the versions (and path) are inline code. Anything else
/// passes through untouched.
///
/// # Example
///
/// ```
/// # use gh_releasegen::prettify_dependency_title;
/// assert_eq!(
///     prettify_dependency_title("Bump lodash from 4.17.20 to 4.17.21 in /app"),
///     "Bump **lodash** from `4.17.20` to `4.17.21` in `/app`"
/// );
/// ```
pub fn prettify_dependency_title(title: &str) -> Cow<'_, str> {
    let re = regex!(
        r"Bump (?P<name>.+?) from (?P<from>.+?) to (?P<to>.+?)(?:$| in (?P<path>.+))"
    );
    re.replace_all(title, |caps: &Captures| {
        let mut out = format!(
            "Bump **{}** from `{}` to `{}`",
            &caps["name"], &caps["from"], &caps["to"]
        );
        if let Some(path) = caps.name("path") {
            out.push_str(&format!(" in `{}`", path.as_str()));
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_project_path() {
        assert_eq!(
            prettify_dependency_title("Bump lodash from 4.17.20 to 4.17.21 in /app"),
            "Bump **lodash** from `4.17.20` to `4.17.21` in `/app`"
        );
    }

    #[test]
    fn without_project_path() {
        assert_eq!(
            prettify_dependency_title("Bump serde from 1.0.143 to 1.0.188"),
            "Bump **serde** from `1.0.143` to `1.0.188`"
        );
    }

    #[test]
    fn keeps_surrounding_text() {
        assert_eq!(
            prettify_dependency_title("chore(deps): Bump actions/checkout from 3 to 4"),
            "chore(deps): Bump **actions/checkout** from `3` to `4`"
        );
    }

    #[test]
    fn versions_inside_name_are_left_alone() {
        // a naive replace of "1" would also touch "v1-utils"
        assert_eq!(
            prettify_dependency_title("Bump v1-utils from 1 to 2"),
            "Bump **v1-utils** from `1` to `2`"
        );
    }

    #[test]
    fn unrelated_titles_pass_through() {
        for title in [
            "Add release notes command",
            "bump lodash from 1 to 2",
            "Bump lodash to 4.17.21",
            "",
        ] {
            assert!(matches!(prettify_dependency_title(title), Cow::Borrowed(t) if t == title));
        }
    }

    #[test]
    fn rewritten_text_without_raw_pattern_is_stable() {
        let title = "Update **lodash** to `4.17.21`";
        assert_eq!(prettify_dependency_title(title), title);
    }
}
