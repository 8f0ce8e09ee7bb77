//! `SystemController`: one entry point per system intent over a shared host.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use vox_protocol::{ActionResult, EntityAction};

use crate::host::{Host, NativeHost};
use crate::tools::{apps, clock, info, media, screenshot, volume};

/// System tool settings (the `[system]` table of the agent config).
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Where screenshots are written. Created on first use.
    #[serde(default = "default_screenshots_dir")]
    pub screenshots_dir: PathBuf,
    /// Upper bound for any single external command.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_screenshots_dir() -> PathBuf {
    PathBuf::from("screenshots")
}
fn default_command_timeout_secs() -> u64 {
    10
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            screenshots_dir: default_screenshots_dir(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

/// Desktop control facade used by the agent's handlers.
#[derive(Clone)]
pub struct SystemController {
    host: Arc<dyn Host>,
    config: SystemConfig,
}

impl SystemController {
    pub fn new(host: Arc<dyn Host>, config: SystemConfig) -> Self {
        Self { host, config }
    }

    /// Controller over the real machine.
    pub fn native(config: SystemConfig) -> Self {
        let host = NativeHost::new(Duration::from_secs(config.command_timeout_secs));
        Self::new(Arc::new(host), config)
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    pub async fn open_app(&self, app_name: &str) -> ActionResult {
        apps::open_app(self.host(), app_name).await
    }

    pub async fn close_app(&self, app_name: &str) -> ActionResult {
        apps::close_app(self.host(), app_name).await
    }

    pub async fn control_volume(
        &self,
        action: Option<EntityAction>,
        level: Option<u32>,
    ) -> ActionResult {
        volume::control_volume(self.host(), action, level).await
    }

    pub async fn control_media(
        &self,
        action: Option<EntityAction>,
        query: Option<&str>,
    ) -> ActionResult {
        media::control_media(self.host(), action, query).await
    }

    pub async fn take_screenshot(&self) -> ActionResult {
        let now = chrono::Local::now().naive_local();
        screenshot::take_screenshot(self.host(), &self.config.screenshots_dir, now).await
    }

    pub async fn system_info(&self) -> ActionResult {
        info::system_info(self.host()).await
    }

    pub async fn list_processes(&self) -> ActionResult {
        info::list_processes(self.host()).await
    }

    pub fn current_time(&self) -> ActionResult {
        clock::current_time(chrono::Local::now().naive_local())
    }

    pub fn current_date(&self) -> ActionResult {
        clock::current_date(chrono::Local::now().naive_local())
    }
}
