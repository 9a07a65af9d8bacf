pub mod access;
pub mod format;
pub mod sort;
