//! Pure, lexical path helpers.
//!
//! Nothing in this module touches the inode tree. In particular,
//! [`clean`] never resolves a `name/..` pair: `.` and `..` are real
//! entries at every directory, so their meaning is only known once a
//! path is resolved against a node. Resolution lives in the inode layer.

/// The path separator. No other separator is recognized.
pub const SEPARATOR: char = '/';

/// The name under which every directory can reach itself.
pub const SELF_ENTRY: &str = ".";

/// The name under which every directory can reach its parent.
pub const PARENT_ENTRY: &str = "..";

/// Returns whether `path` is absolute, i.e. starts with a separator.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Returns whether `path` is relative.
pub fn is_relative(path: &str) -> bool {
    !is_absolute(path)
}

/// Lexically simplifies `path`.
///
/// Runs of separators collapse to one, `.` segments are dropped, and
/// leading `..` segments of an *absolute* path are dropped (`/..` is
/// `/`). A trailing separator is preserved, because it marks that the
/// path must name a directory. `..` segments are otherwise kept as-is.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let absolute = is_absolute(path);

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | SELF_ENTRY => continue,
            PARENT_ENTRY if absolute && segments.is_empty() => continue,
            _ => segments.push(segment),
        }
    }

    let mut cleaned = String::with_capacity(path.len());
    if absolute {
        cleaned.push(SEPARATOR);
    }
    cleaned.push_str(&segments.join("/"));
    if !segments.is_empty() && path.ends_with(SEPARATOR) {
        cleaned.push(SEPARATOR);
    }
    cleaned
}

/// Joins `parts` with the separator, then cleans the result.
pub fn join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = parts
        .into_iter()
        .map(|part| part.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("/");
    clean(&joined)
}

/// A path split into the entry it names and the path of the directory
/// holding that entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    /// The final entry the path names. `.` for the empty path and for `/`.
    pub entry: String,
    /// Everything before the entry. `.` when the path has no separator,
    /// `/` when the entry sits directly under the root.
    pub parent: String,
    /// Set when the original path ended with a separator; the named
    /// entry must then be a directory.
    pub must_be_dir: bool,
    /// Whether the original path was relative.
    pub is_relative: bool,
}

/// Splits `path` into a [`PathInfo`].
///
/// The empty path names `.` relative to `.`; `/` names `.` relative to
/// `/`. Both are necessarily directories. Everything else splits at the
/// last separator after shaving any trailing separators off.
pub fn parse(path: &str) -> PathInfo {
    if path.is_empty() {
        return PathInfo {
            entry: SELF_ENTRY.to_string(),
            parent: SELF_ENTRY.to_string(),
            must_be_dir: true,
            is_relative: true,
        };
    }

    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        // Nothing but separators: the root.
        return PathInfo {
            entry: SELF_ENTRY.to_string(),
            parent: SEPARATOR.to_string(),
            must_be_dir: true,
            is_relative: false,
        };
    }

    let must_be_dir = trimmed.len() != path.len();
    let is_relative = is_relative(path);
    match trimmed.rsplit_once(SEPARATOR) {
        Some((parent, entry)) => PathInfo {
            entry: entry.to_string(),
            parent: if parent.is_empty() {
                SEPARATOR.to_string()
            } else {
                parent.to_string()
            },
            must_be_dir,
            is_relative,
        },
        None => PathInfo {
            entry: trimmed.to_string(),
            parent: SELF_ENTRY.to_string(),
            must_be_dir,
            is_relative,
        },
    }
}

#[cfg(test)]
mod test_path {
    use super::*;

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("/"));
        assert!(is_absolute("/a/b"));
        assert!(!is_absolute(""));
        assert!(!is_absolute("a/b"));
        assert!(!is_absolute("./a"));
        assert!(is_relative("a/b"));
        assert!(!is_relative("/a/b"));
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("/"), "/");
        assert_eq!(clean("//"), "/");
        assert_eq!(clean("/a/b"), "/a/b");
        assert_eq!(clean("a//b"), "a/b");
        assert_eq!(clean("a/./b"), "a/b");
        assert_eq!(clean("./a"), "a");
        assert_eq!(clean("a/b/"), "a/b/");
        assert_eq!(clean("a/b///"), "a/b/");
        assert_eq!(clean("/.."), "/");
        assert_eq!(clean("/../../a"), "/a");
        assert_eq!(clean("/../../../../a/b"), "/a/b");
        // `..` is only dropped at the front of an absolute path.
        assert_eq!(clean("a/../b"), "a/../b");
        assert_eq!(clean("/a/../b"), "/a/../b");
        assert_eq!(clean(".."), "..");
        assert_eq!(clean("../../a"), "../../a");
    }

    #[test]
    fn test_clean_is_idempotent() {
        for path in [
            "",
            "/",
            "a/b/",
            "/../a//b/./c",
            "../..//x",
            "a/../b",
            "///foo/////bar/../fizz///.///buzz/",
        ] {
            let once = clean(path);
            assert_eq!(clean(&once), once, "clean({path:?}) is a fixed point");
        }
    }

    #[test]
    fn test_join() {
        assert_eq!(join::<_, &str>([]), "");
        assert_eq!(join([""]), "");
        assert_eq!(join(["/"]), "/");
        assert_eq!(join(["foo", "bar"]), "foo/bar");
        assert_eq!(join(["foo", "bar/"]), "foo/bar/");
        assert_eq!(join(["/foo", "bar"]), "/foo/bar");
        assert_eq!(join(["/foo", "bar/"]), "/foo/bar/");
        assert_eq!(join(["a/", ".", "b"]), "a/b");
        assert_eq!(join(["/../../../../a/b"]), "/a/b");
        assert_eq!(join(["a/../b"]), "a/../b");
        assert_eq!(join(["/", ".."]), "/");
        assert_eq!(
            join(["///foo/////", "//bar", "../fizz///.///buzz/"]),
            "/foo/bar/../fizz/buzz/",
        );
    }

    #[test]
    fn test_parse_special_cases() {
        assert_eq!(
            parse(""),
            PathInfo {
                entry: ".".to_string(),
                parent: ".".to_string(),
                must_be_dir: true,
                is_relative: true,
            },
        );
        assert_eq!(
            parse("/"),
            PathInfo {
                entry: ".".to_string(),
                parent: "/".to_string(),
                must_be_dir: true,
                is_relative: false,
            },
        );
    }

    #[test]
    fn test_parse() {
        let info = parse("a");
        assert_eq!(info.entry, "a");
        assert_eq!(info.parent, ".");
        assert!(!info.must_be_dir);
        assert!(info.is_relative);

        let info = parse("a/b/c");
        assert_eq!(info.entry, "c");
        assert_eq!(info.parent, "a/b");
        assert!(!info.must_be_dir);
        assert!(info.is_relative);

        let info = parse("/a");
        assert_eq!(info.entry, "a");
        assert_eq!(info.parent, "/");
        assert!(!info.must_be_dir);
        assert!(!info.is_relative);

        let info = parse("/a/b");
        assert_eq!(info.entry, "b");
        assert_eq!(info.parent, "/a");
        assert!(!info.must_be_dir);
        assert!(!info.is_relative);

        let info = parse("a/b/");
        assert_eq!(info.entry, "b");
        assert_eq!(info.parent, "a");
        assert!(info.must_be_dir);
        assert!(info.is_relative);

        let info = parse("../c");
        assert_eq!(info.entry, "c");
        assert_eq!(info.parent, "..");
        assert!(info.is_relative);
    }

    #[test]
    fn test_parse_of_join_recovers_parts() {
        for (parent, entry) in [("a/b", "c"), ("/a", "b"), ("a", "x"), ("..", "y")] {
            let info = parse(&join([parent, entry]));
            assert_eq!(info.entry, entry);
            assert_eq!(info.parent, clean(parent));
        }
    }
}
