//! Shared data models for the gateway

mod discovery;
mod frame;
mod platform;
mod publish;
mod reading;

pub use discovery::*;
pub use frame::*;
pub use platform::*;
pub use publish::*;
pub use reading::*;
