use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{validate_suite, Error, Result, SuiteStore};
use crate::testing::{strip_trailing_newlines, terminate_with_newline, TestCase};

/// On-disk shape of one testcase.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    name: String,
    input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
}

impl From<Record> for TestCase {
    fn from(r: Record) -> Self {
        TestCase {
            name: r.name,
            given: terminate_with_newline(&r.input),
            expected: r.expected.as_deref().map(terminate_with_newline),
        }
    }
}

impl From<&TestCase> for Record {
    fn from(t: &TestCase) -> Self {
        Record {
            name: t.name.clone(),
            input: strip_trailing_newlines(&t.given).to_owned(),
            expected: t
                .expected
                .as_deref()
                .map(|s| strip_trailing_newlines(s).to_owned()),
        }
    }
}

/// Testcases kept as a YAML sequence of `{name, input, expected?}`.
///
/// Trailing newlines are stripped when writing and exactly one `\n` is
/// restored when reading, so multi-line samples are stored as literal blocks.
#[derive(Debug, Clone)]
pub struct YamlSuiteStore {
    path: PathBuf,
}

impl YamlSuiteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl SuiteStore for YamlSuiteStore {
    fn read(&self) -> Result<Vec<TestCase>> {
        let yaml = fsutil::read_to_string(&self.path).map_err(Error::Read)?;
        if yaml.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<Record> =
            serde_yaml::from_str(&yaml).map_err(|e| Error::Parse(self.location(), e))?;
        let testcases: Vec<TestCase> = records.into_iter().map(TestCase::from).collect();
        validate_suite(&self.location(), &testcases)?;

        log::debug!("Loaded {} testcases from {:?}", testcases.len(), self.path);
        Ok(testcases)
    }

    fn write(&self, testcases: &[TestCase]) -> Result<()> {
        validate_suite(&self.location(), testcases)?;
        let records: Vec<Record> = testcases.iter().map(Record::from).collect();
        let yaml =
            serde_yaml::to_string(&records).map_err(|e| Error::Serialize(self.location(), e))?;
        fsutil::write_with_mkdir(&self.path, yaml).map_err(Error::Write)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn store_in(dir: &Path) -> YamlSuiteStore {
        YamlSuiteStore::new(dir.join("testcases.yaml"))
    }

    #[test]
    fn round_trip_normalizes_trailing_newlines() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let written = vec![
            TestCase::new("case-1", "3\n1 2 3", "6\n\n"),
            TestCase::new("case-2", "0\n", "\n"),
            TestCase::just_show("mine", "100000\n"),
        ];
        store.write(&written).unwrap();

        let read = store.read().unwrap();
        assert_eq!(
            read,
            vec![
                TestCase::new("case-1", "3\n1 2 3\n", "6\n"),
                TestCase::new("case-2", "0\n", "\n"),
                TestCase::just_show("mine", "100000\n"),
            ]
        );
    }

    #[test]
    fn multi_line_strings_are_literal_blocks() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        store
            .write(&[TestCase::new("case-1", "2\n1 2\n", "3\n")])
            .unwrap();

        let yaml = fsutil::read_to_string(store.path()).unwrap();
        assert!(yaml.contains("input: |"), "{}", yaml);
        assert!(!yaml.contains("\\n"), "{}", yaml);
    }

    #[test]
    fn absent_expected_is_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        store.write(&[TestCase::just_show("mine", "1\n")]).unwrap();

        let yaml = fsutil::read_to_string(store.path()).unwrap();
        assert!(!yaml.contains("expected"), "{}", yaml);
    }

    #[test]
    fn reads_handwritten_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        fsutil::write(
            store.path(),
            "- name: case-1\n  input: |\n    2\n    1 2\n  expected: |\n    3\n- name: mine\n  input: '5'\n",
        )
        .unwrap();

        assert_eq!(
            store.read().unwrap(),
            vec![
                TestCase::new("case-1", "2\n1 2\n", "3\n"),
                TestCase::just_show("mine", "5\n"),
            ]
        );
    }

    #[test]
    fn empty_file_is_empty_suite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        fsutil::write(store.path(), "").unwrap();
        assert!(store.read().unwrap().is_empty());

        store.write(&[]).unwrap();
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn duplicated_names_are_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        fsutil::write(
            store.path(),
            "- name: a\n  input: '1'\n- name: a\n  input: '2'\n",
        )
        .unwrap();
        assert!(matches!(store.read(), Err(Error::Invalid(..))));

        let dup = [TestCase::just_show("a", "1\n"), TestCase::just_show("a", "2\n")];
        assert!(matches!(store.write(&dup), Err(Error::Invalid(..))));
    }

    #[test]
    fn empty_name_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        fsutil::write(store.path(), "- name: ''\n  input: '1'\n").unwrap();
        assert!(matches!(store.read(), Err(Error::Invalid(..))));
    }

    #[test]
    fn missing_file_is_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(store_in(tmp.path()).read().unwrap_err().is_not_found());
    }
}
