/// One sample input and, optionally, the output it must produce.
///
/// `expected == None` means there is no oracle: the program's output is only shown.
/// `expected == Some("\n")` means the program must print nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub given: String,
    pub expected: Option<String>,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        given: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            given: given.into(),
            expected: Some(expected.into()),
        }
    }

    pub fn just_show(name: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            given: given.into(),
            expected: None,
        }
    }
}

/// Strips every trailing line break and appends exactly one `\n`.
///
/// Sample blocks on the contest site always end with a single newline,
/// so stored inputs and outputs are normalized to that shape when loaded.
pub fn terminate_with_newline(s: &str) -> String {
    let mut s = strip_trailing_newlines(s).to_owned();
    s.push('\n');
    s
}

pub fn strip_trailing_newlines(s: &str) -> &str {
    s.trim_end_matches(|c| c == '\n' || c == '\r')
}
