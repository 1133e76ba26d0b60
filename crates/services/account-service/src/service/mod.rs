//! Application services.

mod account_service;
mod locks;

pub use account_service::{AccountManager, AccountService};
