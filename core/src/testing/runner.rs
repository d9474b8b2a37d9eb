use std::{
    io,
    path::PathBuf,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::Command,
    time::Instant,
};

/// What one finished run of a program left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub execution_time: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to spawn '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Time limit exceeded ({}ms)", .0.as_millis())]
    TimedOut(Duration),

    #[error("Failed to communicate with subprocess")]
    Communicate(#[source] io::Error),
}

impl RunError {
    fn spawn(argv: &[String], source: io::Error) -> Self {
        RunError::Spawn {
            program: argv.first().cloned().unwrap_or_default(),
            source,
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the build command with inherited stdio.
    /// Returns whether it exited successfully.
    async fn build(&self, argv: &[String]) -> Result<bool, RunError>;

    /// Runs the program with `stdin` fed to its standard input.
    /// A non-zero exit is a normal outcome, not an error.
    async fn run(&self, argv: &[String], stdin: &str) -> Result<RunOutcome, RunError>;
}

/// Runs argv-style commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    time_limit: Option<Duration>,
    current_dir: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// On timeout only the direct child is killed.
    /// Processes it spawned itself (e.g. through `sh -c`) are left running,
    /// but their open pipes do not delay the result.
    pub fn time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn get_time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    fn command(&self, argv: &[String]) -> Result<Command, RunError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(RunError::spawn(
                argv,
                io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
            ));
        };
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn build(&self, argv: &[String]) -> Result<bool, RunError> {
        if argv.is_empty() {
            log::debug!("Build command is empty; nothing to build");
            return Ok(true);
        }

        let status = self
            .command(argv)?
            .status()
            .await
            .map_err(|e| RunError::spawn(argv, e))?;

        log::debug!("Build finished: {}", status);
        Ok(status.success())
    }

    async fn run(&self, argv: &[String], stdin: &str) -> Result<RunOutcome, RunError> {
        let mut proc = self
            .command(argv)?
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunError::spawn(argv, e))?;

        let broken = |what: &str| {
            RunError::Communicate(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("Failed to open {}", what),
            ))
        };
        let mut child_stdin = proc.stdin.take().ok_or_else(|| broken("stdin"))?;
        let mut child_stdout = proc.stdout.take().ok_or_else(|| broken("stdout"))?;
        let mut child_stderr = proc.stderr.take().ok_or_else(|| broken("stderr"))?;

        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let start_at = Instant::now();
        let res = {
            let feed_stdin = async move {
                let res = child_stdin.write_all(stdin.as_bytes()).await;
                drop(child_stdin); // the child sees EOF only after this
                match res {
                    // the program exited without reading all of its input
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    res => res,
                }
            };
            let communicate = async {
                tokio::try_join!(
                    feed_stdin,
                    child_stdout.read_to_end(&mut stdout_buf),
                    child_stderr.read_to_end(&mut stderr_buf),
                    proc.wait(),
                )
            };
            match self.time_limit {
                Some(limit) => tokio::time::timeout(limit, communicate)
                    .await
                    .map_err(|_| limit),
                None => Ok(communicate.await),
            }
        };
        let execution_time = start_at.elapsed();

        let exit_status = match res {
            Err(limit) => {
                proc.kill()
                    .await
                    .unwrap_or_else(|e| log::warn!("Failed to kill timed-out process: {:#}", e));
                return Err(RunError::TimedOut(limit));
            }
            Ok(Err(e)) => return Err(RunError::Communicate(e)),
            Ok(Ok((_, _, _, exit_status))) => exit_status,
        };

        Ok(RunOutcome {
            exit_code: exit_code_of(exit_status),
            stdout: String::from_utf8_lossy(&stdout_buf).into(),
            stderr: String::from_utf8_lossy(&stderr_buf).into(),
            execution_time,
        })
    }
}

/// Processes killed by a signal are reported as `128 + signo`, the way shells do.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

/// Renders argv for log lines and messages.
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("'{}'", arg)
            } else {
                arg.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    struct X {
        input: &'static str,
        script: &'static str,
        want_exit_code: i32,
        want_stdout: &'static str,
        want_stderr: &'static str,
    }

    async fn run_test(x: X) {
        let r = CommandRunner::new().time_limit(Some(Duration::from_secs(10)));
        let res = dbg!(r.run(&sh(x.script), x.input).await).unwrap();
        assert_eq!(res.exit_code, x.want_exit_code);
        assert_eq!(res.stdout, x.want_stdout);
        assert_eq!(res.stderr, x.want_stderr);
    }

    #[tokio::test]
    async fn should_capture_stdout() {
        run_test(X {
            input: "123\n",
            script: r#"read x; echo "hello_$x""#,
            want_exit_code: 0,
            want_stdout: "hello_123\n",
            want_stderr: "",
        })
        .await;
    }

    #[tokio::test]
    async fn should_succeed_even_if_stdin_is_not_read() {
        run_test(X {
            input: "123\n",
            script: "echo hello_123",
            want_exit_code: 0,
            want_stdout: "hello_123\n",
            want_stderr: "",
        })
        .await;
    }

    #[tokio::test]
    async fn should_capture_stderr_separately() {
        run_test(X {
            input: "",
            script: "echo out; echo err 1>&2",
            want_exit_code: 0,
            want_stdout: "out\n",
            want_stderr: "err\n",
        })
        .await;
    }

    #[tokio::test]
    async fn non_zero_exit_is_not_an_error() {
        run_test(X {
            input: "123\n",
            script: "echo hello_123; exit 42",
            want_exit_code: 42,
            want_stdout: "hello_123\n",
            want_stderr: "",
        })
        .await;
    }

    #[tokio::test]
    async fn large_input_and_output_do_not_deadlock() {
        let input = "0123456789\n".repeat(100_000);
        let r = CommandRunner::new().time_limit(Some(Duration::from_secs(30)));
        let res = r.run(&["cat".to_owned()], &input).await.unwrap();
        assert_eq!(res.exit_code, 0);
        assert_eq!(res.stdout.len(), input.len());
    }

    #[tokio::test]
    async fn should_time_out() {
        let r = CommandRunner::new().time_limit(Some(Duration::from_millis(300)));
        let res = r.run(&sh("sleep 5"), "").await;
        assert!(matches!(res, Err(RunError::TimedOut(d)) if d == Duration::from_millis(300)));
    }

    #[tokio::test]
    async fn time_out_does_not_wait_for_grandchildren() {
        let r = CommandRunner::new().time_limit(Some(Duration::from_millis(300)));
        let start = std::time::Instant::now();
        let res = r.run(&sh("sleep 5; echo done"), "").await;
        assert!(matches!(res, Err(RunError::TimedOut(_))));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn killed_by_signal_reports_128_plus_signo() {
        let r = CommandRunner::new().time_limit(Some(Duration::from_secs(10)));
        let res = r.run(&sh("echo partial; kill -9 $$"), "").await.unwrap();
        assert_eq!(res.exit_code, 137);
        assert_eq!(res.stdout, "partial\n");

        let j = crate::testing::classify(&res, Some("partial\n"));
        assert_eq!(j.status, crate::testing::TestStatus::ERROR);
    }

    #[tokio::test]
    async fn missing_executable_is_spawn_error() {
        let r = CommandRunner::new();
        let argv = vec!["./definitely-not-existing-program".to_owned()];
        let res = r.run(&argv, "").await;
        assert!(matches!(res, Err(RunError::Spawn { program, .. }) if program == argv[0]));
    }

    #[tokio::test]
    async fn build_reports_exit_status() {
        let r = CommandRunner::new();
        assert!(r.build(&sh("exit 0")).await.unwrap());
        assert!(!r.build(&sh("exit 3")).await.unwrap());
    }

    #[tokio::test]
    async fn empty_build_command_is_noop_success() {
        assert!(CommandRunner::new().build(&[]).await.unwrap());
    }

    #[tokio::test]
    async fn runs_in_current_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fsutil::write(tmp.path().join("answer.txt"), "7\n").unwrap();
        let r = CommandRunner::new().current_dir(tmp.path());
        let res = r.run(&sh("cat answer.txt"), "").await.unwrap();
        assert_eq!(res.stdout, "7\n");
    }

    #[test]
    fn display_command_quotes_args_with_spaces() {
        let argv: Vec<String> = ["g++", "-o", "main", "my main.cpp"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(display_command(&argv), "g++ -o main 'my main.cpp'");
    }
}
