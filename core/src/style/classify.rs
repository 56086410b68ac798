/// Visual treatment for one line of test output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Pass,
    Skip,
    Fail,
    Plain,
}

const NO_TEST_FILES: &str = "[no test files]";

/// Classify a raw output line. Returns `None` when the line should be dropped
/// (a `[no test files]` line with `skip_no_tests` enabled).
///
/// Matching runs against the trimmed text; callers render the original line.
pub fn classify(line: &str, skip_no_tests: bool) -> Option<Style> {
    let trimmed = line.trim();

    if trimmed.contains(NO_TEST_FILES) {
        return if skip_no_tests {
            None
        } else {
            Some(Style::Plain)
        };
    }

    let style = if trimmed.starts_with("--- PASS")
        || trimmed.starts_with("ok")
        || trimmed.starts_with("PASS")
    {
        Style::Pass
    } else if trimmed.starts_with("--- SKIP") {
        Style::Skip
    } else if trimmed.starts_with("--- FAIL") || trimmed.starts_with("FAIL") {
        Style::Fail
    } else {
        Style::Plain
    };
    Some(style)
}
