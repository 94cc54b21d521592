pub mod buffer_controller;
pub mod recorder;
