pub mod handlers;
pub mod storage;
pub mod upload;
