/// Fixed extension → language table.
///
/// Deliberately small and best-effort: the aggregate reports volume for the
/// languages a dashboard cares about, not a full linguist-style census.
/// Extensions outside this table contribute nothing to language totals.
const LANGUAGE_BY_EXTENSION: &[(&str, &str)] = &[
    ("c", "C"),
    ("cpp", "C++"),
    ("go", "Go"),
    ("java", "Java"),
    ("js", "JavaScript"),
    ("py", "Python"),
    ("rb", "Ruby"),
    ("rs", "Rust"),
    ("sh", "Shell"),
    ("ts", "TypeScript"),
];

/// Map a file extension (no leading dot, any case) to its language label.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    let normalized = extension.to_ascii_lowercase();
    LANGUAGE_BY_EXTENSION
        .iter()
        .find(|(ext, _)| *ext == normalized)
        .map(|(_, language)| *language)
}
