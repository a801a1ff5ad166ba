//! External process helpers for the build pipeline.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::{Error, Result};

/// Render a command line for messages.
pub fn display_command(command: &[String]) -> String {
    command.join(" ")
}

fn command_for(command: &[String], cwd: &Path) -> Result<Command> {
    let (program, args) = command.split_first().ok_or_else(|| Error::Command {
        command: String::new(),
        message: "empty command line".to_string(),
    })?;
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(cwd);
    Ok(cmd)
}

/// Run `command` in `cwd` with inherited stdio and extra environment
/// variables, waiting for it to finish.
///
/// A non-zero exit status is an error.
pub fn run_command(command: &[String], cwd: &Path, envs: &[(&str, &str)]) -> Result<()> {
    let mut cmd = command_for(command, cwd)?;
    for (key, value) in envs {
        cmd.env(key, value);
    }
    debug!("Running: {}", display_command(command));

    let status = cmd.status().map_err(|e| Error::Command {
        command: display_command(command),
        message: e.to_string(),
    })?;

    if !status.success() {
        return Err(Error::Command {
            command: display_command(command),
            message: match status.code() {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            },
        });
    }
    Ok(())
}

/// Returns `true` if `program --version` runs and exits successfully.
pub fn tool_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// How long a stopped background process gets to exit before it is killed.
const STOP_GRACE_PERIOD: Duration = Duration::from_secs(3);

/// A long-running background process that is killed when dropped.
///
/// On unix the process leads its own process group, and stopping it
/// signals the whole group so that servers started by a wrapper
/// (`npm` running `vite preview`) go down with it.
#[derive(Debug)]
pub struct BackgroundProcess {
    label: String,
    child: Option<Child>,
}

impl BackgroundProcess {
    /// Start `command` in `cwd` without waiting for it.
    pub fn spawn(command: &[String], cwd: &Path, envs: &[(&str, &str)]) -> Result<Self> {
        let mut cmd = command_for(command, cwd)?;
        for (key, value) in envs {
            cmd.env(key, value);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        let child = cmd
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| Error::Command {
                command: display_command(command),
                message: e.to_string(),
            })?;
        debug!("Started {} (pid {})", display_command(command), child.id());
        Ok(Self {
            label: display_command(command),
            child: Some(child),
        })
    }

    /// Whether the process has not been stopped yet.
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Terminate the process and everything it started, then reap it.
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if self.is_running() {
            if let Some(child) = self.child.as_mut() {
                terminate(child, &self.label);
            }
        } else if self.child.is_some() {
            debug!("{} already exited", self.label);
        }

        if let Some(mut child) = self.child.take() {
            signal_group(&child, GroupSignal::Kill);
            if let Err(e) = child.kill() {
                debug!("{} already exited: {}", self.label, e);
            }
            if let Err(e) = child.wait() {
                warn!("Failed to reap {}: {}", self.label, e);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum GroupSignal {
    Terminate,
    Kill,
}

/// Ask the process group to terminate, waiting up to the grace period for
/// the leader to exit.
fn terminate(child: &mut Child, label: &str) {
    signal_group(child, GroupSignal::Terminate);
    let start = Instant::now();
    while start.elapsed() < STOP_GRACE_PERIOD {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(e) => {
                warn!("Failed to poll {}: {}", label, e);
                return;
            }
        }
    }
    debug!("{} ignored SIGTERM", label);
}

#[cfg(unix)]
fn signal_group(child: &Child, signal: GroupSignal) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let signal = match signal {
        GroupSignal::Terminate => Signal::SIGTERM,
        GroupSignal::Kill => Signal::SIGKILL,
    };
    // The group is gone once every member has exited.
    let _ = killpg(Pid::from_raw(child.id() as i32), signal);
}

#[cfg(not(unix))]
fn signal_group(_child: &Child, _signal: GroupSignal) {}

impl Drop for BackgroundProcess {
    fn drop(&mut self) {
        self.stop();
    }
}
