use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use utoipa::ToSchema;

/// The fixed set of note categories. Anything unrecognized in storage
/// normalizes to `NoTag` rather than failing a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum NoteTag {
    #[serde(rename = "To-Do")]
    ToDo,
    Reminder,
    Work,
    School,
    #[default]
    #[serde(rename = "No Tag")]
    NoTag,
}

impl NoteTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTag::ToDo => "To-Do",
            NoteTag::Reminder => "Reminder",
            NoteTag::Work => "Work",
            NoteTag::School => "School",
            NoteTag::NoTag => "No Tag",
        }
    }

    /// Parses a stored tag value, defaulting unknown values to `NoTag`.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "To-Do" => NoteTag::ToDo,
            "Reminder" => NoteTag::Reminder,
            "Work" => NoteTag::Work,
            "School" => NoteTag::School,
            _ => NoteTag::NoTag,
        }
    }
}

/// A user-owned note. `transaction_id` is the hash of the Cardano
/// transaction the owner's wallet submitted to timestamp this note, if any.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
    pub pinned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Builds a `Note` from a row selected with the canonical column list
    /// (see `DatabaseService::NOTE_COLUMNS`).
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let tag: String = row.try_get("tag")?;
        Ok(Note {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            tag: NoteTag::from_db_str(&tag),
            pinned: row.try_get("pinned")?,
            transaction_id: row.try_get("transaction_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_through_db_strings() {
        for tag in [
            NoteTag::ToDo,
            NoteTag::Reminder,
            NoteTag::Work,
            NoteTag::School,
            NoteTag::NoTag,
        ] {
            assert_eq!(NoteTag::from_db_str(tag.as_str()), tag);
        }
    }

    #[test]
    fn unknown_stored_tag_normalizes() {
        assert_eq!(NoteTag::from_db_str("Groceries"), NoteTag::NoTag);
        assert_eq!(NoteTag::from_db_str(""), NoteTag::NoTag);
    }

    #[test]
    fn tag_serde_uses_display_names() {
        assert_eq!(
            serde_json::to_string(&NoteTag::ToDo).unwrap(),
            "\"To-Do\""
        );
        assert_eq!(
            serde_json::from_str::<NoteTag>("\"No Tag\"").unwrap(),
            NoteTag::NoTag
        );
        assert_eq!(
            serde_json::from_str::<NoteTag>("\"Work\"").unwrap(),
            NoteTag::Work
        );
    }
}
