pub mod backend;
pub mod stream;
pub mod file_picker;
pub mod storage;
