pub mod auth;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod auth;
    pub mod common;
    pub mod health;
    pub mod notes;
    pub mod transactions;
    pub mod wallets;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
