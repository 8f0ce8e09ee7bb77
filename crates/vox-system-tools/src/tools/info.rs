//! Tool: host resource summary and process listing.

use vox_protocol::ActionResult;

use crate::host::Host;
use crate::types::bytes_to_gb;

/// How many process names are read out loud.
const SPOKEN_PROCESS_COUNT: usize = 10;

pub async fn system_info(host: &dyn Host) -> ActionResult {
    let snap = match host.snapshot().await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "system snapshot failed");
            return ActionResult::failure("I couldn't retrieve system information.", e.to_string());
        }
    };

    let summary = format!(
        "System: {} {}. CPU usage: {:.1}%, Memory usage: {:.1}%, Disk usage: {:.1}%",
        snap.os_name,
        snap.os_release,
        snap.cpu_usage_percent,
        snap.memory_usage_percent(),
        snap.disk_usage_percent(),
    );
    let data = serde_json::json!({
        "system": snap.os_name,
        "release": snap.os_release,
        "cpu_cores": snap.cpu_cores,
        "cpu_usage": format!("{:.1}%", snap.cpu_usage_percent),
        "memory_total": format!("{:.1} GB", bytes_to_gb(snap.memory_total_bytes)),
        "memory_used": format!("{:.1}%", snap.memory_usage_percent()),
        "disk_total": format!("{:.1} GB", bytes_to_gb(snap.disk_total_bytes)),
        "disk_used": format!("{:.1}%", snap.disk_usage_percent()),
    });
    ActionResult::success(summary).with_data(data)
}

/// List running processes sorted case-insensitively by name.
pub async fn list_processes(host: &dyn Host) -> ActionResult {
    let mut processes = match host.processes().await {
        Ok(p) => p,
        Err(e) => {
            return ActionResult::failure("I couldn't list running processes.", e.to_string());
        }
    };
    processes.sort_by_key(|p| p.name.to_lowercase());

    let names: Vec<&str> = processes
        .iter()
        .take(SPOKEN_PROCESS_COUNT)
        .map(|p| p.name.as_str())
        .collect();
    let summary = format!(
        "Found {} running processes. Some common ones: {}...",
        processes.len(),
        names.join(", ")
    );

    let rows: Vec<serde_json::Value> = processes
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.name,
                "pid": p.pid,
                "exe": p.exe.as_deref().unwrap_or("N/A"),
            })
        })
        .collect();
    ActionResult::success(summary).with_data(serde_json::json!({ "processes": rows }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHost;
    use crate::types::{OsKind, ProcessEntry};

    #[tokio::test]
    async fn summary_includes_usage() {
        let host = MockHost::default();
        let result = system_info(&host).await;
        assert!(result.success);
        assert_eq!(
            result.summary,
            "System: Linux 6.8.0. CPU usage: 12.5%, Memory usage: 25.0%, Disk usage: 50.0%"
        );
        let data = result.data.unwrap();
        assert_eq!(data["cpu_cores"], 4);
        assert_eq!(data["memory_total"], "16.0 GB");
    }

    #[tokio::test]
    async fn snapshot_failure() {
        let host = MockHost::default();
        host.clear_snapshot();
        let result = system_info(&host).await;
        assert!(!result.success);
        assert_eq!(result.summary, "I couldn't retrieve system information.");
    }

    #[tokio::test]
    async fn processes_sorted_case_insensitively() {
        let host = MockHost::with_processes(
            OsKind::Linux,
            vec![
                ProcessEntry::new(3, "zsh"),
                ProcessEntry::new(1, "Xorg"),
                ProcessEntry {
                    pid: 2,
                    name: "bash".into(),
                    exe: Some("/usr/bin/bash".into()),
                },
            ],
        );
        let result = list_processes(&host).await;
        assert!(result.success);
        assert_eq!(
            result.summary,
            "Found 3 running processes. Some common ones: bash, Xorg, zsh..."
        );
        let data = result.data.unwrap();
        assert_eq!(data["processes"][0]["exe"], "/usr/bin/bash");
        assert_eq!(data["processes"][1]["exe"], "N/A");
    }

    #[tokio::test]
    async fn only_ten_names_are_spoken() {
        let processes = (0..15)
            .map(|i| ProcessEntry::new(i, &format!("proc{i:02}")))
            .collect();
        let host = MockHost::with_processes(OsKind::Linux, processes);
        let result = list_processes(&host).await;
        assert!(result.summary.starts_with("Found 15 running processes."));
        assert!(result.summary.contains("proc09..."));
        assert!(!result.summary.contains("proc10"));
        assert_eq!(result.data.unwrap()["processes"].as_array().unwrap().len(), 15);
    }
}
