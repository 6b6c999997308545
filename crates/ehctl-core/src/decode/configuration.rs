// ── `copy {running,startup}-configuration display` ──

/// Tidy a configuration dump: right-trim every line and drop blank ones.
/// Comments and line order are kept.
pub fn decode_configuration(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
