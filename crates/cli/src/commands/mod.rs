pub mod check;
pub mod config;
pub mod runs;
pub mod util;
pub mod verify;

pub use check::*;
pub use config::*;
pub use runs::*;
pub use util::*;
pub use verify::*;
