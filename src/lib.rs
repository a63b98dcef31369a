pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::database_service::DatabaseService;
pub use crypto::hashing::note_fingerprint;
pub use domain::chain::TxTracker;
pub use domain::model::{Note, NoteTag, TxStatus, User, WalletSession};
pub use infra::cardano::CardanoClient;
