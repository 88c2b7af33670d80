//! Path classification for file-change statistics.
//!
//! Maps a repository path to a coarse kind. Rules are ordered: build output
//! and binary artifacts are excluded first, then tests, then source, then
//! documentation. Anything else is [`FileKind::Other`].

/// Coarse classification of a changed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Build output, vendored code, and binary artifacts, excluded everywhere.
    Ignored,
    /// Test code.
    Test,
    /// Production source code and build definitions.
    Source,
    /// Documentation and examples.
    Doc,
    /// Anything that matched no rule.
    Other,
}

const IGNORED_DIRS: &[&str] = &[
    "/build/",
    "/dist/",
    "/out/",
    "/third-party/",
    "/third_party/",
    "/vendor/",
    "/.git/",
    "/node_modules/",
    "/target/",
    "/bin/",
    "/obj/",
];

const IGNORED_EXTS: &[&str] = &[
    ".lock", ".exe", ".dll", ".so", ".dylib", ".a", ".jar", ".war", ".ear", ".zip", ".tar", ".gz",
    ".bz2", ".xz", ".7z", ".rar", ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".pdf",
];

const TEST_DIRS: &[&str] = &["/test/", "/tests/", "/unittests/", "/it/", "/e2e/"];

const TEST_SUFFIXES: &[&str] = &[
    "_test.c", "_test.cc", "_test.cpp", "_test.cxx", ".test.c", ".test.cc", ".test.cpp",
    ".test.cxx", ".test.py", ".test.js", ".test.ts", ".spec.c", ".spec.cc", ".spec.cpp",
    ".spec.cxx", ".spec.js", ".spec.ts",
];

const SOURCE_DIRS: &[&str] = &["/src/", "/source/", "/app/", "/lib/", "/include/"];

const SOURCE_EXTS: &[&str] = &[
    ".c", ".cc", ".cpp", ".cxx", ".h", ".hh", ".hpp", ".inl", ".go", ".rs", ".java", ".cs", ".m",
    ".mm", ".swift", ".kt", ".ts", ".tsx", ".js", ".jsx", ".sh", ".py", ".rb", ".php", ".pl",
    ".lua", ".sql", ".cmake", ".yml", ".yaml",
];

const SOURCE_FILES: &[&str] = &["CMakeLists.txt", "Makefile", "makefile", "GNUmakefile"];

const DOC_DIRS: &[&str] = &["/doc/", "/docs/", "/documentation/", "/examples/"];

const DOC_EXTS: &[&str] = &[".md", ".markdown", ".mkd", ".rst", ".adoc", ".txt"];

/// Classify a path by the first matching rule.
pub fn classify_path(path: &str) -> FileKind {
    if IGNORED_DIRS.iter().any(|dir| path.contains(dir))
        || IGNORED_EXTS.iter().any(|ext| path.ends_with(ext))
    {
        return FileKind::Ignored;
    }

    if TEST_DIRS.iter().any(|dir| path.contains(dir))
        || TEST_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
    {
        return FileKind::Test;
    }

    if SOURCE_DIRS.iter().any(|dir| path.contains(dir))
        || SOURCE_EXTS.iter().any(|ext| path.ends_with(ext))
        || SOURCE_FILES.iter().any(|name| path.ends_with(name))
    {
        return FileKind::Source;
    }

    if DOC_DIRS.iter().any(|dir| path.contains(dir))
        || DOC_EXTS.iter().any(|ext| path.ends_with(ext))
    {
        return FileKind::Doc;
    }

    FileKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_output_is_ignored() {
        assert_eq!(classify_path("project/build/main.o"), FileKind::Ignored);
        assert_eq!(classify_path("a/node_modules/x/index.js"), FileKind::Ignored);
        assert_eq!(classify_path("assets/logo.png"), FileKind::Ignored);
        assert_eq!(classify_path("Cargo.lock"), FileKind::Ignored);
    }

    #[test]
    fn ignored_wins_over_source() {
        // A source extension inside a vendored tree stays ignored.
        assert_eq!(classify_path("x/vendor/lib/util.c"), FileKind::Ignored);
    }

    #[test]
    fn test_paths() {
        assert_eq!(classify_path("src/tests/check.c"), FileKind::Test);
        assert_eq!(classify_path("pkg/foo_test.cpp"), FileKind::Test);
        assert_eq!(classify_path("web/app.spec.ts"), FileKind::Test);
        assert_eq!(classify_path("mod/thing.test.py"), FileKind::Test);
    }

    #[test]
    fn source_paths() {
        assert_eq!(classify_path("src/main.cpp"), FileKind::Source);
        assert_eq!(classify_path("tool.rs"), FileKind::Source);
        assert_eq!(classify_path("CMakeLists.txt"), FileKind::Source);
        assert_eq!(classify_path("ci/deploy.yml"), FileKind::Source);
    }

    #[test]
    fn doc_paths() {
        assert_eq!(classify_path("README.md"), FileKind::Doc);
        assert_eq!(classify_path("guide/docs/intro.html"), FileKind::Doc);
        assert_eq!(classify_path("NOTES.txt"), FileKind::Doc);
    }

    #[test]
    fn unmatched_is_other() {
        assert_eq!(classify_path("LICENSE"), FileKind::Other);
        assert_eq!(classify_path("data/samples.bin"), FileKind::Other);
    }

    #[test]
    fn directory_markers_need_enclosing_separators() {
        // Top-level "tests/" has no leading separator, so only the filename
        // suffix rules can catch it.
        assert_eq!(classify_path("tests/feature_test.cpp"), FileKind::Test);
        assert_eq!(classify_path("tests/data.csv"), FileKind::Other);
    }
}
