//! HTTP request handlers for the gateway API

pub mod analyze;
pub mod bus;
pub mod discovery;
pub mod elicit;
pub mod metadata;
pub mod publish;
pub mod samples;
