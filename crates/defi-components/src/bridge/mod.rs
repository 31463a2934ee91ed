//! Bridge components

pub mod transfer;

pub use transfer::BridgeTransfer;
