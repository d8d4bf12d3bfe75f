pub mod logs;
pub mod transfer;
