pub mod analysis;
pub mod file;
