pub mod byte_source;
pub mod channel_store;
pub mod device_discovery;
pub mod recorder_delegate;
pub mod sample_sink;
