use serde::{Deserialize, Serialize};

use super::{result::TestStatus, runner::RunOutcome};

/// How the expected output is compared with the actual output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareMode {
    /// Trailing whitespace (including trailing newlines) on both sides is ignored.
    #[default]
    TrimTrailing,
    /// Byte-for-byte equality.
    Exact,
}

impl CompareMode {
    pub fn matches(self, expected: &str, actual: &str) -> bool {
        use CompareMode::*;
        match self {
            TrimTrailing => expected.trim_end() == actual.trim_end(),
            Exact => expected == actual,
        }
    }
}

/// Status and fields decided for one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgement {
    pub status: TestStatus,
    pub actual: String,
    pub error: String,
    pub expected: Option<String>,
}

pub fn classify(outcome: &RunOutcome, expected: Option<&str>) -> Judgement {
    classify_with(CompareMode::default(), outcome, expected)
}

/// First match wins:
/// non-zero exit is `ERROR` even when stdout is right,
/// then a missing oracle is `JUSTSHOW`,
/// then the comparison decides between `AC` and `WA`.
pub fn classify_with(mode: CompareMode, outcome: &RunOutcome, expected: Option<&str>) -> Judgement {
    let actual = outcome.stdout.clone();

    if outcome.exit_code != 0 {
        return Judgement {
            status: TestStatus::ERROR,
            actual,
            error: outcome.stderr.clone(),
            expected: None,
        };
    }

    let Some(expected) = expected else {
        return Judgement {
            status: TestStatus::JUSTSHOW,
            actual,
            error: String::new(),
            expected: None,
        };
    };

    if mode.matches(expected, &outcome.stdout) {
        Judgement {
            status: TestStatus::AC,
            actual,
            error: String::new(),
            expected: None,
        }
    } else {
        Judgement {
            status: TestStatus::WA,
            actual,
            error: String::new(),
            expected: Some(expected.to_owned()),
        }
    }
}
