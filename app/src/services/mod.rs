pub mod batch;
pub mod font;
pub mod log_buffer;
pub mod preview;
