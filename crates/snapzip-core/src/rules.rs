//! Exclusion rules for directory snapshots.
//!
//! Rules are plain immutable data: a set of directory names, a set of file
//! names and a set of extensions. Built-in defaults are always present;
//! additions are unioned in and never replace them.

use std::collections::BTreeSet;

/// Directory names excluded by default.
pub const DEFAULT_EXCLUDED_DIRECTORIES: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    ".turbo",
    ".cache",
    "dist",
    "build",
    "__pycache__",
    ".pytest_cache",
    ".venv",
    "venv",
];

/// File names excluded by default.
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Extensions excluded by default, each with its leading dot.
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[".log", ".tmp", ".swp"];

/// Exclusion rules applied to every entry of an archiving run.
///
/// # Examples
///
/// ```
/// use snapzip_core::ExclusionRules;
///
/// let rules = ExclusionRules::default()
///     .with_file_names(["secrets.json"])
///     .with_extensions(["bak"]);
///
/// assert!(rules.excludes_directory("node_modules"));
/// assert!(rules.excludes_file_name("secrets.json"));
/// assert!(rules.excludes_extension(".bak"));
/// assert!(rules.excludes_extension(".log"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    directory_names: BTreeSet<String>,
    file_names: BTreeSet<String>,
    extensions: BTreeSet<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            directory_names: to_set(DEFAULT_EXCLUDED_DIRECTORIES),
            file_names: to_set(DEFAULT_EXCLUDED_FILES),
            extensions: to_set(DEFAULT_EXCLUDED_EXTENSIONS),
        }
    }
}

impl ExclusionRules {
    /// Creates rules holding only the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds directory names to exclude. Blank names are ignored.
    #[must_use]
    pub fn with_directory_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.directory_names.extend(clean_names(names));
        self
    }

    /// Adds file names to exclude. Blank names are ignored.
    #[must_use]
    pub fn with_file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.file_names.extend(clean_names(names));
        self
    }

    /// Adds extensions to exclude, normalized to a single leading dot.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions.extend(
            extensions
                .into_iter()
                .filter_map(|ext| normalize_extension(ext.as_ref())),
        );
        self
    }

    /// Excluded directory names.
    pub const fn directory_names(&self) -> &BTreeSet<String> {
        &self.directory_names
    }

    /// Excluded file names.
    pub const fn file_names(&self) -> &BTreeSet<String> {
        &self.file_names
    }

    /// Excluded extensions, each with its leading dot.
    pub const fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    /// Returns `true` if a directory with this base name is pruned.
    #[must_use]
    pub fn excludes_directory(&self, name: &str) -> bool {
        self.directory_names.contains(name)
    }

    /// Returns `true` if a file with this base name is skipped.
    #[must_use]
    pub fn excludes_file_name(&self, name: &str) -> bool {
        self.file_names.contains(name)
    }

    /// Returns `true` if files with this suffix (leading dot included) are
    /// skipped.
    #[must_use]
    pub fn excludes_extension(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }
}

/// Splits a comma-separated list into trimmed, non-empty items.
///
/// # Examples
///
/// ```
/// use snapzip_core::rules::parse_list;
///
/// assert_eq!(parse_list(" target, .idea ,,"), vec!["target", ".idea"]);
/// assert!(parse_list("").is_empty());
/// ```
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes an extension to carry exactly one leading dot.
///
/// Returns `None` for blank input.
///
/// # Examples
///
/// ```
/// use snapzip_core::rules::normalize_extension;
///
/// assert_eq!(normalize_extension("log").as_deref(), Some(".log"));
/// assert_eq!(normalize_extension(".log").as_deref(), Some(".log"));
/// assert_eq!(normalize_extension(" .. "), None);
/// ```
#[must_use]
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{trimmed}"))
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn clean_names<I, S>(names: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().filter_map(|name| {
        let name = name.as_ref().trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduced() {
        let rules = ExclusionRules::default();
        for dir in [
            "node_modules",
            ".git",
            ".next",
            ".turbo",
            "dist",
            "build",
            "__pycache__",
            "venv",
        ] {
            assert!(rules.excludes_directory(dir), "{dir} should be excluded");
        }
        assert!(rules.excludes_file_name(".DS_Store"));
        assert!(rules.excludes_file_name("Thumbs.db"));
        assert!(rules.excludes_extension(".log"));
        assert!(rules.excludes_extension(".tmp"));
        assert!(rules.excludes_extension(".swp"));
    }

    #[test]
    fn test_additions_keep_defaults() {
        let rules = ExclusionRules::default()
            .with_directory_names(["target"])
            .with_file_names(["secrets.json"])
            .with_extensions([".bak"]);

        assert!(rules.excludes_directory("target"));
        assert!(rules.excludes_directory("node_modules"));
        assert!(rules.excludes_file_name("secrets.json"));
        assert!(rules.excludes_file_name(".DS_Store"));
        assert!(rules.excludes_extension(".bak"));
        assert!(rules.excludes_extension(".log"));
        assert_eq!(
            rules.directory_names().len(),
            DEFAULT_EXCLUDED_DIRECTORIES.len() + 1
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let rules = ExclusionRules::default();
        assert!(!rules.excludes_directory("Node_Modules"));
        assert!(!rules.excludes_file_name(".ds_store"));
        assert!(!rules.excludes_extension(".LOG"));
    }

    #[test]
    fn test_blank_additions_ignored() {
        let rules = ExclusionRules::default()
            .with_directory_names(["", "  "])
            .with_extensions(["", "."]);
        assert_eq!(rules, ExclusionRules::default());
    }

    #[test]
    fn test_extension_normalization() {
        let rules = ExclusionRules::default().with_extensions(["bak", ".orig", " ..old "]);
        assert!(rules.excludes_extension(".bak"));
        assert!(rules.excludes_extension(".orig"));
        assert!(rules.excludes_extension(".old"));
        assert!(!rules.excludes_extension("bak"));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_list(" a , ,b "), vec!["a", "b"]);
        assert!(parse_list(" , ").is_empty());
    }
}
