pub mod entities;
pub mod intent;
pub mod result;

pub use entities::*;
pub use intent::*;
pub use result::*;
