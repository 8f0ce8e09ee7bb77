//! Host abstraction over subprocesses and the process table.
//!
//! `Host` trait with two impls:
//! - `NativeHost`: `tokio::process` with a hard timeout, sysinfo for the
//!   process table and resource usage
//! - `MockHost`: recorded invocations and scripted failures (in `mock.rs`)
//!
//! Nothing here shells out through `sh -c`; command lines are argv vectors.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use sysinfo::{Disks, Pid, Signal, System};
use tokio::process::Command;

use crate::error::{SystemError, SystemResult};
use crate::types::{CommandOutput, Invocation, OsKind, ProcessEntry, SystemSnapshot};

/// Trait for host implementations.
#[async_trait]
pub trait Host: Send + Sync {
    /// Platform the commands are built for.
    fn os(&self) -> OsKind;

    /// Run a program to completion. Non-zero exit is an error.
    async fn run(&self, invocation: &Invocation) -> SystemResult<CommandOutput>;

    /// Start a program and return immediately, stdio detached.
    async fn spawn_detached(&self, invocation: &Invocation) -> SystemResult<()>;

    /// Snapshot of running processes.
    async fn processes(&self) -> SystemResult<Vec<ProcessEntry>>;

    /// Ask a process to exit. `Ok(false)` means the signal was refused.
    async fn terminate(&self, pid: u32) -> SystemResult<bool>;

    /// Current resource usage.
    async fn snapshot(&self) -> SystemResult<SystemSnapshot>;

    async fn create_dir_all(&self, path: &Path) -> SystemResult<()>;

    /// Try each candidate in order and return the first success.
    ///
    /// The error of the last candidate is returned when all fail.
    async fn run_first(&self, candidates: &[Invocation]) -> SystemResult<CommandOutput> {
        let mut last_err = SystemError::NoCandidates;
        for candidate in candidates {
            match self.run(candidate).await {
                Ok(output) => return Ok(output),
                Err(e) => {
                    tracing::debug!(command = %candidate, error = %e, "candidate failed, trying next");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}

// ── Native host ─────────────────────────────────────────────────

/// Host backed by the real operating system.
pub struct NativeHost {
    os: OsKind,
    timeout: Duration,
}

impl NativeHost {
    pub fn new(timeout: Duration) -> Self {
        Self {
            os: OsKind::current(),
            timeout,
        }
    }
}

impl Default for NativeHost {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl Host for NativeHost {
    fn os(&self) -> OsKind {
        self.os
    }

    async fn run(&self, invocation: &Invocation) -> SystemResult<CommandOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(SystemError::Spawn {
                    program: invocation.program.clone(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(SystemError::Timeout {
                    program: invocation.program.clone(),
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(SystemError::ExitStatus {
                program: invocation.program.clone(),
                code: result.code,
                stderr: result.stderr.trim().to_string(),
            });
        }
        Ok(result)
    }

    async fn spawn_detached(&self, invocation: &Invocation) -> SystemResult<()> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| ())
            .map_err(|e| SystemError::Spawn {
                program: invocation.program.clone(),
                reason: e.to_string(),
            })
    }

    async fn processes(&self) -> SystemResult<Vec<ProcessEntry>> {
        tokio::task::spawn_blocking(|| {
            let sys = System::new_all();
            sys.processes()
                .iter()
                .map(|(pid, proc_)| ProcessEntry {
                    pid: pid.as_u32(),
                    name: proc_.name().to_string_lossy().into_owned(),
                    exe: proc_.exe().map(|p| p.display().to_string()),
                })
                .collect()
        })
        .await
        .map_err(|e| SystemError::Other(format!("process scan task failed: {e}")))
    }

    async fn terminate(&self, pid: u32) -> SystemResult<bool> {
        tokio::task::spawn_blocking(move || -> SystemResult<bool> {
            let sys = System::new_all();
            let proc_ = sys
                .process(Pid::from_u32(pid))
                .ok_or(SystemError::ProcessNotFound { pid })?;
            // SIGTERM where the platform has it, hard kill otherwise
            Ok(proc_.kill_with(Signal::Term).unwrap_or_else(|| proc_.kill()))
        })
        .await
        .map_err(|e| SystemError::Other(format!("terminate task failed: {e}")))?
    }

    async fn snapshot(&self) -> SystemResult<SystemSnapshot> {
        tokio::task::spawn_blocking(|| {
            let mut sys = System::new_all();
            // CPU usage needs two samples
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            sys.refresh_cpu_all();

            let disks = Disks::new_with_refreshed_list();
            let (disk_used, disk_total) = disks.iter().fold((0u64, 0u64), |(used, total), disk| {
                (
                    used + disk.total_space().saturating_sub(disk.available_space()),
                    total + disk.total_space(),
                )
            });

            SystemSnapshot {
                os_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
                os_release: System::kernel_version()
                    .or_else(System::os_version)
                    .unwrap_or_default(),
                cpu_cores: sys.cpus().len(),
                cpu_usage_percent: sys.global_cpu_usage(),
                memory_total_bytes: sys.total_memory(),
                memory_used_bytes: sys.used_memory(),
                disk_total_bytes: disk_total,
                disk_used_bytes: disk_used,
            }
        })
        .await
        .map_err(|e| SystemError::Other(format!("snapshot task failed: {e}")))
    }

    async fn create_dir_all(&self, path: &Path) -> SystemResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| SystemError::Io(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHost;

    #[tokio::test]
    async fn run_first_returns_first_success() {
        let host = MockHost::new(OsKind::Linux);
        host.fail_program("amixer");

        let out = host
            .run_first(&[
                Invocation::new("amixer", ["set", "Master", "mute"]),
                Invocation::new("pactl", ["set-sink-mute", "@DEFAULT_SINK@", "1"]),
                Invocation::new("never", Vec::<String>::new()),
            ])
            .await;

        assert!(out.is_ok());
        assert_eq!(host.programs_run(), vec!["amixer", "pactl"]);
    }

    #[tokio::test]
    async fn run_first_surfaces_last_error() {
        let host = MockHost::new(OsKind::Linux);
        host.fail_program("amixer");
        host.fail_program("pactl");

        let err = host
            .run_first(&[
                Invocation::new("amixer", ["set", "Master", "mute"]),
                Invocation::new("pactl", ["set-sink-mute", "@DEFAULT_SINK@", "1"]),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, SystemError::ExitStatus { ref program, .. } if program == "pactl"));
    }

    #[tokio::test]
    async fn run_first_with_no_candidates() {
        let host = MockHost::new(OsKind::Other);
        let err = host.run_first(&[]).await.unwrap_err();
        assert!(matches!(err, SystemError::NoCandidates));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn native_run_reports_exit_status() {
        let host = NativeHost::default();
        let ok = host.run(&Invocation::new("true", Vec::<String>::new())).await;
        assert!(ok.is_ok());

        let err = host
            .run(&Invocation::new("false", Vec::<String>::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, SystemError::ExitStatus { .. }));
    }

    #[tokio::test]
    async fn native_run_missing_program_is_spawn_error() {
        let host = NativeHost::default();
        let err = host
            .run(&Invocation::new("vox-definitely-not-a-program", Vec::<String>::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, SystemError::Spawn { .. }));
    }
}
