//! Domain model definitions: users, notes, wallet sessions, and the
//! chain-transaction records backing proof-of-existence tracking.

pub mod note;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use note::{Note, NoteTag};
pub use transaction::{ChainTransaction, TxStatus};
pub use user::{PublicUser, User};
pub use wallet::WalletSession;
