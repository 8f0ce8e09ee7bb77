//! One module per desktop capability. Each public function takes a `Host`
//! and folds every failure into an `ActionResult` with its own summary.

pub mod apps;
pub mod clock;
pub mod info;
pub mod media;
pub mod screenshot;
pub mod volume;
