//! Mock host for testing.
//!
//! Records every invocation and lets tests script failures, the process
//! table, and the resource snapshot. Nothing touches the real machine.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{SystemError, SystemResult};
use crate::host::Host;
use crate::types::{CommandOutput, Invocation, OsKind, ProcessEntry, SystemSnapshot};

/// Mock host with recorded invocations and scripted state.
pub struct MockHost {
    os: OsKind,
    /// Every `run` and `spawn_detached` call, in order.
    invocations: Mutex<Vec<Invocation>>,
    /// Programs whose invocations fail.
    failing: Mutex<HashSet<String>>,
    processes: Mutex<Vec<ProcessEntry>>,
    /// PIDs whose termination is refused (permission denied).
    protected: Mutex<HashSet<u32>>,
    terminated: Mutex<Vec<u32>>,
    snapshot: Mutex<Option<SystemSnapshot>>,
    created_dirs: Mutex<Vec<PathBuf>>,
}

impl MockHost {
    /// Create a mock for the given platform with an empty process table.
    pub fn new(os: OsKind) -> Self {
        Self {
            os,
            invocations: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            processes: Mutex::new(Vec::new()),
            protected: Mutex::new(HashSet::new()),
            terminated: Mutex::new(Vec::new()),
            snapshot: Mutex::new(Some(sample_snapshot())),
            created_dirs: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock pre-loaded with a process table.
    pub fn with_processes(os: OsKind, processes: Vec<ProcessEntry>) -> Self {
        let host = Self::new(os);
        *host.processes.lock().unwrap() = processes;
        host
    }

    /// Make every invocation of `program` fail with a non-zero exit.
    pub fn fail_program(&self, program: &str) {
        self.failing.lock().unwrap().insert(program.to_string());
    }

    /// Refuse termination of `pid`.
    pub fn protect_pid(&self, pid: u32) {
        self.protected.lock().unwrap().insert(pid);
    }

    /// Make `snapshot` fail.
    pub fn clear_snapshot(&self) {
        *self.snapshot.lock().unwrap() = None;
    }

    /// Copies of every recorded invocation.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Program names of every recorded invocation.
    pub fn programs_run(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.program.clone())
            .collect()
    }

    /// The most recent invocation, if any.
    pub fn last_invocation(&self) -> Option<Invocation> {
        self.invocations.lock().unwrap().last().cloned()
    }

    /// PIDs that were terminated successfully.
    pub fn terminated(&self) -> Vec<u32> {
        self.terminated.lock().unwrap().clone()
    }

    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.created_dirs.lock().unwrap().clone()
    }

    fn record(&self, invocation: &Invocation) -> bool {
        self.invocations.lock().unwrap().push(invocation.clone());
        !self.failing.lock().unwrap().contains(&invocation.program)
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new(OsKind::Linux)
    }
}

/// A plausible snapshot: 4 cores, 25% memory, 50% disk.
pub fn sample_snapshot() -> SystemSnapshot {
    SystemSnapshot {
        os_name: "Linux".into(),
        os_release: "6.8.0".into(),
        cpu_cores: 4,
        cpu_usage_percent: 12.5,
        memory_total_bytes: 16 * 1024 * 1024 * 1024,
        memory_used_bytes: 4 * 1024 * 1024 * 1024,
        disk_total_bytes: 512 * 1024 * 1024 * 1024,
        disk_used_bytes: 256 * 1024 * 1024 * 1024,
    }
}

#[async_trait]
impl Host for MockHost {
    fn os(&self) -> OsKind {
        self.os
    }

    async fn run(&self, invocation: &Invocation) -> SystemResult<CommandOutput> {
        if self.record(invocation) {
            Ok(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            })
        } else {
            Err(SystemError::ExitStatus {
                program: invocation.program.clone(),
                code: Some(1),
                stderr: "mock failure".into(),
            })
        }
    }

    async fn spawn_detached(&self, invocation: &Invocation) -> SystemResult<()> {
        if self.record(invocation) {
            Ok(())
        } else {
            Err(SystemError::Spawn {
                program: invocation.program.clone(),
                reason: "No such file or directory (os error 2)".into(),
            })
        }
    }

    async fn processes(&self) -> SystemResult<Vec<ProcessEntry>> {
        Ok(self.processes.lock().unwrap().clone())
    }

    async fn terminate(&self, pid: u32) -> SystemResult<bool> {
        let mut processes = self.processes.lock().unwrap();
        let Some(pos) = processes.iter().position(|p| p.pid == pid) else {
            return Err(SystemError::ProcessNotFound { pid });
        };
        if self.protected.lock().unwrap().contains(&pid) {
            return Ok(false);
        }
        processes.remove(pos);
        self.terminated.lock().unwrap().push(pid);
        Ok(true)
    }

    async fn snapshot(&self) -> SystemResult<SystemSnapshot> {
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| SystemError::Other("snapshot unavailable".into()))
    }

    async fn create_dir_all(&self, path: &Path) -> SystemResult<()> {
        self.created_dirs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}
