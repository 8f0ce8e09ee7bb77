//! Desktop control tools for Vox.
//!
//! Everything that touches the operating system goes through the `Host`
//! trait: `NativeHost` runs real subprocesses and reads the process table
//! via sysinfo, `MockHost` records calls for tests. The tool functions in
//! `tools/` turn a host into user-facing `ActionResult`s, and
//! `SystemController` bundles them behind one handle for the agent.

pub mod controller;
pub mod error;
pub mod host;
pub mod mock;
pub mod tools;
pub mod types;

pub use controller::{SystemConfig, SystemController};
pub use error::{SystemError, SystemResult};
pub use host::{Host, NativeHost};
pub use mock::MockHost;
pub use types::{CommandOutput, Invocation, OsKind, ProcessEntry, SystemSnapshot};
