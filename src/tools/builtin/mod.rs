//! Built-in lookup tools backed by static in-crate datasets.

pub mod credentials;
pub mod jobs;
pub mod skills;
