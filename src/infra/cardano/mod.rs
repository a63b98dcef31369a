pub mod client;

pub use client::{AddressBalance, CardanoClient, TxInfo};
