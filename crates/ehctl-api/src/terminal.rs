// ── Terminal output screening ──
//
// The EH CLI never signals failure out of band: errors arrive as ordinary
// text in the response. These patterns classify a response before any
// decoder sees it. A banner only counts at the start of a line, so the same
// words inside a configuration dump or a description field pass through.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, excerpt};

/// Banners meaning "this one command failed".
static REJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)^\s*% ?Error",
        r"(?m)^\s*% ?Bad secret",
        r"(?m)^\s*(?:%\s*)?invalid input",
    ]
    .into_iter()
    .map(build)
    .collect()
});

/// Banners meaning the session itself is gone.
static SESSION_LOSS_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![build(r"(?m)^\s*(?:%\s*)?connection timed out")]);

fn build(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("static terminal pattern must compile")
}

/// Classify a raw response for `command`.
///
/// Returns the response unchanged when it carries no error banner.
pub fn screen(command: &str, output: String) -> Result<String, Error> {
    if SESSION_LOSS_PATTERNS.iter().any(|re| re.is_match(&output)) {
        return Err(Error::ConnectionLost {
            reason: excerpt(output.trim()),
        });
    }
    if REJECTION_PATTERNS.iter().any(|re| re.is_match(&output)) {
        return Err(Error::CommandRejected {
            command: command.to_owned(),
            output: excerpt(output.trim()),
        });
    }
    Ok(output)
}
