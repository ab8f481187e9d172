//! Item locator parsing.
//!
//! Two forms are accepted:
//! - compact: `owner/name#42` (the name may itself contain `/`)
//! - web address: anything containing `/owner/name/items/42`, with or
//!   without a scheme or host in front

use std::sync::LazyLock;

use regex::Regex;
use rollup_shared::{Container, Reference, Result, RollupError};

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches the whole of `namespace/name#id`.
static COMPACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^/#]+)/([^#]+)#(\d+)$").expect("compact reference regex"));

/// Matches `/namespace/name/items/id` anywhere in the input.
static WEB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([^/]+)/([^/]+)/items/(\d+)").expect("web reference regex")
});

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolve a human-supplied locator. `None` means the text is not a
/// reference in either accepted form.
pub fn resolve(text: &str) -> Option<Reference> {
    capture(&COMPACT_RE, text).or_else(|| capture(&WEB_RE, text))
}

/// Like [`resolve`], but reports rejection as [`RollupError::InvalidReference`].
pub fn parse(text: &str) -> Result<Reference> {
    resolve(text).ok_or_else(|| RollupError::InvalidReference {
        input: text.to_string(),
    })
}

fn capture(re: &Regex, text: &str) -> Option<Reference> {
    let caps = re.captures(text)?;
    // Digits that overflow u64 are not a usable id.
    let id = caps[3].parse::<u64>().ok()?;
    Some(Reference::new(Container::new(&caps[1], &caps[2]), id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(ns: &str, name: &str, id: u64) -> Reference {
        Reference::new(Container::new(ns, name), id)
    }

    #[test]
    fn compact_form() {
        assert_eq!(resolve("octo/widgets#12"), Some(reference("octo", "widgets", 12)));
    }

    #[test]
    fn compact_id_zero_is_valid() {
        assert_eq!(resolve("owner/repo#0"), Some(reference("owner", "repo", 0)));
    }

    #[test]
    fn compact_name_may_contain_slashes() {
        assert_eq!(
            resolve("group/sub/project#3"),
            Some(reference("group", "sub/project", 3))
        );
    }

    #[test]
    fn web_form_with_any_scheme() {
        let expected = Some(reference("octo", "widgets", 77));
        assert_eq!(resolve("https://tracker.example.com/octo/widgets/items/77"), expected);
        assert_eq!(resolve("http://tracker.example.com/octo/widgets/items/77"), expected);
        assert_eq!(resolve("tracker.example.com/octo/widgets/items/77"), expected);
        assert_eq!(
            resolve("https://tracker.example.com/octo/widgets/items/77#comment-5"),
            expected
        );
    }

    #[test]
    fn compact_form_takes_precedence() {
        // Matches both shapes; the compact reading wins.
        assert_eq!(
            resolve("a/b/items/5#9"),
            Some(reference("a", "b/items/5", 9))
        );
    }

    #[test]
    fn rejects_everything_else() {
        for input in [
            "",
            "octo/widgets",
            "octo/widgets#",
            "octo/widgets#abc",
            "#12",
            "/widgets#12",
            "octo#12",
            "octo/widgets#12 ",
            "https://tracker.example.com/octo/widgets/pulls/77",
            "https://tracker.example.com/octo/widgets/items/",
            "octo/widgets#99999999999999999999999",
        ] {
            assert_eq!(resolve(input), None, "expected {input:?} to be rejected");
        }
    }

    #[test]
    fn case_sensitive() {
        assert_eq!(resolve("Octo/Widgets#1"), Some(reference("Octo", "Widgets", 1)));
        assert_eq!(resolve("https://x.io/octo/widgets/Items/1"), None);
    }

    #[test]
    fn parse_reports_invalid_input() {
        let err = parse("not a reference").unwrap_err();
        assert!(matches!(err, RollupError::InvalidReference { .. }));
        assert!(err.to_string().contains("not a reference"));
        assert_eq!(parse("a/b#1").unwrap(), reference("a", "b", 1));
    }
}
