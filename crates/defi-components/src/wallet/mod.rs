//! Wallet components

pub mod balance;
pub mod connector;

pub use balance::WalletBalance;
pub use connector::WalletConnector;
