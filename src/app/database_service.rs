//! The persistence service.
//!
//! This module is the single owner of the PostgreSQL schema and every query
//! the API runs. It is responsible for:
//! 1.  Account storage (`users`) with unique usernames.
//! 2.  Note storage (`notes`), always scoped to the owning user.
//! 3.  Wallet-session storage (`wallet_sessions`), keyed by address.
//! 4.  Proof-of-existence tracking (`chain_transactions`): every tx hash a
//!     note records is tracked from `pending` to `completed`/`failed`.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::domain::model::{ChainTransaction, Note, NoteTag, TxStatus, User, WalletSession};
use crate::infra::config;

/// The main service that manages database interaction.
pub struct DatabaseService {
    pool: PgPool,
}

impl DatabaseService {
    /// Canonical column list for note selects; `Note::from_row` expects
    /// exactly these columns.
    const NOTE_COLUMNS: &'static str =
        "id, user_id, title, content, tag, pinned, transaction_id, created_at, updated_at";

    const TX_COLUMNS: &'static str = "tx_hash, note_id, status, recorded_at, confirmed_at";

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates a new instance of the DatabaseService and connects to the
    /// database named by `DATABASE_URL`.
    pub async fn new() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();
        Self::new_with_url(&config::database_url()).await
    }

    /// Connects to an explicit database URL (used by tests).
    pub async fn new_with_url(database_url: &str) -> Result<Self, anyhow::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                cardano_address TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notes (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                tag TEXT NOT NULL DEFAULT 'No Tag',
                pinned BOOLEAN NOT NULL DEFAULT FALSE,
                transaction_id TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS notes_user_created_idx
             ON notes (user_id, created_at DESC)",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS wallet_sessions (
                id BIGSERIAL PRIMARY KEY,
                wallet_type TEXT NOT NULL,
                wallet_address TEXT NOT NULL UNIQUE,
                connected_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chain_transactions (
                tx_hash TEXT PRIMARY KEY,
                note_id BIGINT NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
                status TEXT NOT NULL DEFAULT 'pending',
                recorded_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                confirmed_at TIMESTAMPTZ
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS chain_transactions_status_idx
             ON chain_transactions (status, recorded_at)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    // --- users ---

    /// Inserts a new user and returns its id. The username must already have
    /// been checked for availability; a concurrent duplicate still fails on
    /// the unique index.
    pub async fn create_user(
        &self,
        name: &str,
        username: &str,
        password_hash: &str,
        cardano_address: &str,
    ) -> Result<i64, anyhow::Error> {
        let row = sqlx::query(
            "INSERT INTO users (name, username, password_hash, cardano_address)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(name)
        .bind(username)
        .bind(password_hash)
        .bind(cardano_address)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("id")?)
    }

    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, anyhow::Error> {
        let row = sqlx::query(
            "SELECT id, name, username, password_hash, cardano_address, created_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| User::from_row(&r)).transpose().map_err(Into::into)
    }

    // --- notes ---

    /// The caller's notes, newest first.
    pub async fn list_notes(&self, user_id: i64) -> Result<Vec<Note>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM notes WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            Self::NOTE_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| Note::from_row(r).map_err(Into::into))
            .collect()
    }

    pub async fn get_note(
        &self,
        user_id: i64,
        note_id: i64,
    ) -> Result<Option<Note>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM notes WHERE id = $1 AND user_id = $2",
            Self::NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| Note::from_row(&r)).transpose().map_err(Into::into)
    }

    /// Inserts a note. When `transaction_id` is present, the hash is also
    /// recorded as a pending chain transaction in the same SQL transaction,
    /// so a note can never reference an untracked hash.
    pub async fn create_note(
        &self,
        user_id: i64,
        title: &str,
        content: &str,
        tag: NoteTag,
        transaction_id: Option<&str>,
    ) -> Result<Note, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO notes (user_id, title, content, tag, transaction_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            Self::NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(title)
            .bind(content)
            .bind(tag.as_str())
            .bind(transaction_id)
            .fetch_one(&mut *transaction)
            .await?;
        let note = Note::from_row(&row)?;

        if let Some(tx_hash) = transaction_id {
            sqlx::query(
                "INSERT INTO chain_transactions (tx_hash, note_id)
                 VALUES ($1, $2)
                 ON CONFLICT (tx_hash) DO NOTHING",
            )
            .bind(tx_hash)
            .bind(note.id)
            .execute(&mut *transaction)
            .await?;
        }

        transaction.commit().await?;
        Ok(note)
    }

    /// Last-write-wins full update of an owned note. `attach_transaction_id`
    /// only ever fills an empty `transaction_id` slot (callers enforce the
    /// append-only rule); passing `None` leaves any existing hash in place.
    /// Returns `None` when the note does not exist or belongs to someone else.
    pub async fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        title: &str,
        content: &str,
        tag: NoteTag,
        pinned: bool,
        attach_transaction_id: Option<&str>,
    ) -> Result<Option<Note>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let sql = format!(
            "UPDATE notes
             SET title = $1, content = $2, tag = $3, pinned = $4,
                 transaction_id = COALESCE($5, transaction_id),
                 updated_at = now()
             WHERE id = $6 AND user_id = $7
             RETURNING {}",
            Self::NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(title)
            .bind(content)
            .bind(tag.as_str())
            .bind(pinned)
            .bind(attach_transaction_id)
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(&mut *transaction)
            .await?;

        let note = match row {
            Some(r) => Note::from_row(&r)?,
            None => {
                transaction.rollback().await?;
                return Ok(None);
            }
        };

        if let Some(tx_hash) = attach_transaction_id {
            sqlx::query(
                "INSERT INTO chain_transactions (tx_hash, note_id)
                 VALUES ($1, $2)
                 ON CONFLICT (tx_hash) DO NOTHING",
            )
            .bind(tx_hash)
            .bind(note.id)
            .execute(&mut *transaction)
            .await?;
        }

        transaction.commit().await?;
        Ok(Some(note))
    }

    /// Deletes an owned note. Returns false when nothing matched.
    pub async fn delete_note(&self, user_id: i64, note_id: i64) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- wallet sessions ---

    /// Upserts a wallet session: reconnecting an address refreshes its type
    /// and timestamp rather than erroring.
    pub async fn connect_wallet(
        &self,
        wallet_type: &str,
        wallet_address: &str,
    ) -> Result<WalletSession, anyhow::Error> {
        let row = sqlx::query(
            "INSERT INTO wallet_sessions (wallet_type, wallet_address)
             VALUES ($1, $2)
             ON CONFLICT (wallet_address) DO UPDATE
             SET wallet_type = EXCLUDED.wallet_type, connected_at = now()
             RETURNING id, wallet_type, wallet_address, connected_at",
        )
        .bind(wallet_type)
        .bind(wallet_address)
        .fetch_one(&self.pool)
        .await?;
        WalletSession::from_row(&row).map_err(Into::into)
    }

    /// Removes a wallet session. Returns false when the address was unknown.
    pub async fn disconnect_wallet(&self, wallet_address: &str) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM wallet_sessions WHERE wallet_address = $1")
            .bind(wallet_address)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- chain transactions ---

    pub async fn transaction_status(
        &self,
        tx_hash: &str,
    ) -> Result<Option<ChainTransaction>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM chain_transactions WHERE tx_hash = $1",
            Self::TX_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(tx_hash)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| ChainTransaction::from_row(&r))
            .transpose()
            .map_err(Into::into)
    }

    /// Oldest-first batch of transactions still awaiting confirmation.
    pub async fn pending_transactions(
        &self,
        limit: i64,
    ) -> Result<Vec<ChainTransaction>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM chain_transactions
             WHERE status = 'pending'
             ORDER BY recorded_at ASC
             LIMIT $1",
            Self::TX_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| ChainTransaction::from_row(r).map_err(Into::into))
            .collect()
    }

    pub async fn mark_transaction(
        &self,
        tx_hash: &str,
        status: TxStatus,
        confirmed_at: Option<DateTime<Utc>>,
    ) -> Result<(), anyhow::Error> {
        sqlx::query(
            "UPDATE chain_transactions
             SET status = $1, confirmed_at = $2
             WHERE tx_hash = $3",
        )
        .bind(status.as_str())
        .bind(confirmed_at)
        .bind(tx_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fails every pending transaction recorded before `cutoff`.
    /// Returns the number of rows updated.
    pub async fn expire_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, anyhow::Error> {
        let result = sqlx::query(
            "UPDATE chain_transactions
             SET status = 'failed'
             WHERE status = 'pending' AND recorded_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
