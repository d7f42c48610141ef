pub mod posts;
pub mod profile;
