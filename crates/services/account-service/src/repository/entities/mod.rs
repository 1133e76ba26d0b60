//! Storage representations of domain aggregates.

pub mod user;

pub use user::UserRecord;
