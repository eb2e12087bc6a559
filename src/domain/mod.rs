//! Domain types: accounts, amounts, credentials and the storage port.

pub mod account;
pub mod credential;
pub mod ports;
