pub mod tracker;

pub use tracker::{PollSummary, TxTracker};
