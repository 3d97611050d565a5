//! Shell command execution with either inherited (interactive) or captured
//! output. Generator commands are legitimate shell strings - pipes, flags,
//! `--` separators - so they run through `sh -c` as a single string. The
//! caller is responsible for never substituting unvalidated input into them.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound for non-interactive installs.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Captured stderr is truncated to this many characters for display.
const STDERR_TAIL: usize = 500;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct RunRequest<'a> {
    pub command: &'a str,
    pub cwd: &'a Path,
    /// Stream the child's stdio straight to the terminal. No timeout applies:
    /// the generator may legitimately wait on keystrokes.
    pub interactive: bool,
    /// Only honored on the captured (non-interactive) path.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failed {
        exit_code: Option<i32>,
        stderr_tail: String,
    },
    TimedOut {
        after: Duration,
    },
    /// The command could not be launched at all.
    Error(String),
}

impl RunOutcome {
    pub fn ok(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

/// Seam for tests: installers talk to a `Runner`, production uses
/// [`ShellRunner`].
pub trait Runner {
    fn run(&self, req: &RunRequest) -> RunOutcome;
}

pub struct ShellRunner;

impl Runner for ShellRunner {
    fn run(&self, req: &RunRequest) -> RunOutcome {
        if req.interactive {
            run_inherited(req)
        } else {
            run_captured(req)
        }
    }
}

fn run_inherited(req: &RunRequest) -> RunOutcome {
    let status = Command::new("sh")
        .arg("-c")
        .arg(req.command)
        .current_dir(req.cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();

    match status {
        Ok(status) if status.success() => RunOutcome::Success,
        Ok(status) => RunOutcome::Failed {
            exit_code: status.code(),
            stderr_tail: String::new(),
        },
        Err(e) => RunOutcome::Error(format!("failed to launch `{}`: {}", req.command, e)),
    }
}

fn run_captured(req: &RunRequest) -> RunOutcome {
    let mut child = match Command::new("sh")
        .arg("-c")
        .arg(req.command)
        .current_dir(req.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return RunOutcome::Error(format!("failed to launch `{}`: {}", req.command, e)),
    };

    // Drain both pipes on threads so the child can't block on a full buffer.
    let stdout_pipe = child.stdout.take();
    let stdout_reader = thread::spawn(move || drain(stdout_pipe));
    let stderr_pipe = child.stderr.take();
    let stderr_reader = thread::spawn(move || drain(stderr_pipe));

    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let _ = stdout_reader.join();
                let stderr = stderr_reader.join().unwrap_or_default();
                return if status.success() {
                    RunOutcome::Success
                } else {
                    RunOutcome::Failed {
                        exit_code: status.code(),
                        stderr_tail: tail(&stderr),
                    }
                };
            }
            Ok(None) => {
                if started.elapsed() >= req.timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_reader.join();
                    let _ = stderr_reader.join();
                    return RunOutcome::TimedOut { after: req.timeout };
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                return RunOutcome::Error(format!("failed to wait on `{}`: {}", req.command, e));
            }
        }
    }
}

fn drain(pipe: Option<impl Read>) -> String {
    let mut buf = String::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_string(&mut buf);
    }
    buf
}

fn tail(s: &str) -> String {
    let trimmed = s.trim_end();
    let count = trimmed.chars().count();
    if count <= STDERR_TAIL {
        trimmed.to_string()
    } else {
        trimmed.chars().skip(count - STDERR_TAIL).collect()
    }
}
