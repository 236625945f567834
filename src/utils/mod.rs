pub mod format;
pub mod qr_ffi;
pub mod storage;
