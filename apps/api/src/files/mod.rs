// Upload storage: two flat directories of timestamped files, one per category.

pub mod handlers;
pub mod samples;
pub mod store;
