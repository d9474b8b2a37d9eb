use std::{io::Write, time::Duration};

use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use strum::IntoEnumIterator;

use crate::{
    style,
    testing::{strip_trailing_newlines, TestCase, TestResult, TestStatus},
};

const NAME_WIDTH: usize = 15;
const STATUS_WIDTH: usize = 8;
const BLOCK_PREFIX: &str = "       > ";
const DEFAULT_SEPARATOR_WIDTH: usize = 60;

/// Renders per-case reports while the suite runs, then the summary.
///
/// Output depends only on the given results and the options,
/// except for the spinner which is drawn on stderr.
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
    use_spinner: bool,
    separator_width: usize,
    spinner: Option<ProgressBar>,
}

impl<W: Write> Reporter<W> {
    /// Plain output without spinner.
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: false,
            use_spinner: false,
            separator_width: DEFAULT_SEPARATOR_WIDTH,
            spinner: None,
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn spinner(mut self, enabled: bool) -> Self {
        self.use_spinner = enabled;
        self
    }

    pub fn separator_width(mut self, width: usize) -> Self {
        self.separator_width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn case_started(&mut self, t: &TestCase) -> std::io::Result<()> {
        let msg = format!("executing {} ...", t.name);
        if self.use_spinner {
            let spinner = ProgressBar::new_spinner().with_message(msg);
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                spinner.set_style(style);
            }
            spinner.enable_steady_tick(Duration::from_millis(80));
            self.spinner = Some(spinner);
            Ok(())
        } else {
            writeln!(self.out, "{}", msg)
        }
    }

    pub fn case_finished(&mut self, res: &TestResult) -> std::io::Result<()> {
        self.abort();

        let separator = self.paint(&"-".repeat(self.separator_width), Color::BrightBlack);
        writeln!(self.out, "{}", separator)?;

        let name = format!("{:<width$.width$}", res.name, width = NAME_WIDTH);
        let name = self.paint(&name, Color::BrightYellow);
        let tag = self.tag(res.status);
        let pad = " ".repeat(STATUS_WIDTH.saturating_sub(res.status.to_string().len()));
        writeln!(
            self.out,
            "{} {}{} [{}ms]",
            name,
            tag,
            pad,
            res.execution_time.as_millis(),
        )?;

        use TestStatus::*;
        match res.status {
            AC => {}
            WA => {
                self.heading("expected:")?;
                self.block(res.expected.as_deref().unwrap_or_default())?;
                self.heading("but got:")?;
                self.block(&res.actual)?;
            }
            JUSTSHOW => {
                self.heading("output:")?;
                self.block(&res.actual)?;
            }
            ERROR => {
                if let Some(code) = res.exit_code {
                    self.heading(&format!("exit code: {}", code))?;
                }
                self.heading("stderr:")?;
                self.block(&res.error)?;
            }
            TIMEOUT | SPAWNERR => {
                self.block(&res.error)?;
            }
        }
        self.out.flush()
    }

    /// Clears the spinner of the running case, if any.
    /// Called when the suite stops before the case is reported.
    pub fn abort(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_spinning(&self) -> bool {
        self.spinner.is_some()
    }

    pub fn summary(&mut self, results: &[TestResult]) -> std::io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(self.separator_width))?;
        let title = self.paint("SUMMARY:", Color::Cyan);
        writeln!(self.out, "{}", title)?;
        for res in results {
            let tag = self.tag(res.status);
            writeln!(
                self.out,
                "{:<width$.width$} : {}",
                res.name,
                tag,
                width = NAME_WIDTH
            )?;
        }
        let tally = self.tally(results);
        writeln!(self.out, "{}", tally)?;
        self.out.flush()
    }

    fn tally(&self, results: &[TestResult]) -> String {
        let count = |s: TestStatus| results.iter().filter(|r| r.status == s).count();

        let num_shown = count(TestStatus::JUSTSHOW);
        let num_judged = results.len() - num_shown;
        let num_passed = results.iter().filter(|r| r.status.is_passed()).count();
        let num_failed = num_judged - num_passed;

        let shown_note = if num_shown > 0 {
            format!(" ({} shown without expected output)", num_shown)
        } else {
            String::new()
        };

        if num_judged == 0 {
            return if num_shown == 0 {
                "No testcases were run".to_owned()
            } else {
                format!("{} tests shown without expected output", num_shown)
            };
        }

        if num_failed == 0 {
            let msg = format!("All {} tests passed ✨", num_judged);
            return format!("{}{}", self.paint(&msg, Color::Green), shown_note);
        }

        let msg = if num_passed > 0 {
            format!("{}/{} tests failed 💣", num_failed, num_judged)
        } else {
            format!("All {} tests failed 💀", num_judged)
        };
        let detail = TestStatus::iter()
            .filter(|s| s.is_failed())
            .map(|s| (s, count(s)))
            .filter(|&(_, n)| n > 0)
            .map(|(s, n)| format!("{} x{}", self.tag(s), n))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{} ({}){}",
            self.paint(&msg, Color::BrightRed),
            detail,
            shown_note
        )
    }

    fn tag(&self, status: TestStatus) -> String {
        if self.color {
            style::status_icon(status).to_string()
        } else {
            status.to_string()
        }
    }

    fn paint(&self, s: &str, color: Color) -> String {
        if self.color {
            s.color(color).to_string()
        } else {
            s.to_owned()
        }
    }

    fn heading(&mut self, s: &str) -> std::io::Result<()> {
        let s = self.paint(s, Color::Cyan);
        writeln!(self.out, "{}", s)
    }

    /// Output made of line breaks only is shown as `<EMPTY>`.
    fn block(&mut self, text: &str) -> std::io::Result<()> {
        if strip_trailing_newlines(text).is_empty() {
            let empty = self.paint("<EMPTY>", Color::Magenta);
            return writeln!(self.out, "{}{}", BLOCK_PREFIX, empty);
        }
        for line in text.lines() {
            writeln!(self.out, "{}{}", BLOCK_PREFIX, line)?;
        }
        Ok(())
    }
}
