pub mod common;
pub mod messages;

pub use common::*;
pub use messages::*;
