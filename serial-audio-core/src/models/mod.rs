pub mod channel;
pub mod config;
pub mod error;
pub mod recording_result;
pub mod state;
