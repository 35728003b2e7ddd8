pub mod cleanup;
pub mod logs;
