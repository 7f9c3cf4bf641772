//! Chat session storage.
//!
//! One JSON file per session, grouped by task category. `SessionStore` is
//! the seam the chat layer talks to; `FileSessionStore` is the local-disk
//! implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::task::TaskCategory;

/// A chat message within a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

impl StoredMessage {
    pub fn now(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            timestamp: Utc::now().format("%H:%M").to_string(),
        }
    }
}

/// A saved conversation session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub owner: String,
    pub category: TaskCategory,
    pub title: String,
    pub messages: Vec<StoredMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(owner: &str, category: TaskCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            category,
            title: "New conversation".to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn add_message(&mut self, msg: StoredMessage) {
        if self.title == "New conversation" && msg.role == "user" {
            self.title = msg
                .content
                .chars()
                .take(40)
                .collect::<String>()
                .trim()
                .to_string();
            if msg.content.chars().count() > 40 {
                self.title.push_str("...");
            }
        }
        self.messages.push(msg);
        self.updated_at = Utc::now();
    }

    fn filename(&self) -> String {
        format!("{}.json", self.id)
    }
}

/// Session store error types
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {id}")]
    NotFound { id: String },

    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Store contract for chat sessions.
///
/// Listings are ordered most-recently-updated first.
pub trait SessionStore: Send + Sync {
    fn create(&mut self, owner: &str, category: TaskCategory) -> Result<ChatSession, SessionError>;
    fn get(&self, id: &str) -> Result<ChatSession, SessionError>;
    fn list(&self) -> Vec<ChatSession>;
    fn delete(&mut self, id: &str) -> Result<(), SessionError>;
    fn append_message(&mut self, id: &str, msg: StoredMessage) -> Result<(), SessionError>;
}

/// Sessions persisted as pretty-printed JSON files, one per session, under
/// a per-category subdirectory.
pub struct FileSessionStore {
    base_path: PathBuf,
    sessions: Vec<ChatSession>,
}

impl FileSessionStore {
    /// Store rooted at the platform data dir (falls back to ./sessions).
    pub fn open_default() -> Result<Self, SessionError> {
        let base = directories::ProjectDirs::from("com.local", "Chorus", "Chorus")
            .map(|p| p.data_dir().join("sessions"))
            .unwrap_or_else(|| PathBuf::from("./sessions"));
        Self::open(base)
    }

    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let mut store = Self {
            base_path: base_path.into(),
            sessions: Vec::new(),
        };
        store.load_all()?;
        Ok(store)
    }

    fn category_dir(&self, category: TaskCategory) -> Result<PathBuf, SessionError> {
        let dir = self.base_path.join(category.as_str());
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn load_all(&mut self) -> Result<(), SessionError> {
        for category in TaskCategory::all() {
            let dir = self.category_dir(*category)?;
            for entry in fs::read_dir(&dir)?.flatten() {
                let content = match fs::read_to_string(entry.path()) {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::warn!("skipping unreadable session file {:?}: {}", entry.path(), e);
                        continue;
                    }
                };
                match serde_json::from_str::<ChatSession>(&content) {
                    Ok(session) => self.sessions.push(session),
                    Err(e) => {
                        tracing::warn!("skipping corrupt session file {:?}: {}", entry.path(), e);
                    }
                }
            }
        }
        self.sort();
        Ok(())
    }

    fn sort(&mut self) {
        self.sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }

    fn save(&self, session: &ChatSession) -> Result<(), SessionError> {
        let path = self.category_dir(session.category)?.join(session.filename());
        let json = serde_json::to_string_pretty(session)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn create(&mut self, owner: &str, category: TaskCategory) -> Result<ChatSession, SessionError> {
        let session = ChatSession::new(owner, category);
        self.save(&session)?;
        tracing::debug!("created session {} ({})", session.id, category.as_str());
        self.sessions.insert(0, session.clone());
        Ok(session)
    }

    fn get(&self, id: &str) -> Result<ChatSession, SessionError> {
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound { id: id.to_string() })
    }

    fn list(&self) -> Vec<ChatSession> {
        self.sessions.clone()
    }

    fn delete(&mut self, id: &str) -> Result<(), SessionError> {
        let pos = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SessionError::NotFound { id: id.to_string() })?;
        let session = self.sessions.remove(pos);
        let path = self.category_dir(session.category)?.join(session.filename());
        fs::remove_file(path)?;
        Ok(())
    }

    fn append_message(&mut self, id: &str, msg: StoredMessage) -> Result<(), SessionError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SessionError::NotFound { id: id.to_string() })?;
        session.add_message(msg);
        let snapshot = session.clone();
        self.save(&snapshot)?;
        self.sort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> StoredMessage {
        StoredMessage::now("user", content)
    }

    #[test]
    fn test_title_from_first_user_message() {
        let mut session = ChatSession::new("sam", TaskCategory::Chat);
        session.add_message(StoredMessage::now("assistant", "Hi! What can I do for you?"));
        assert_eq!(session.title, "New conversation");

        session.add_message(user("plan a weekend trip to the coast"));
        assert_eq!(session.title, "plan a weekend trip to the coast");
    }

    #[test]
    fn test_long_title_is_truncated() {
        let mut session = ChatSession::new("sam", TaskCategory::Research);
        session.add_message(user(
            "compare the three most popular static site generators in detail",
        ));
        assert!(session.title.ends_with("..."));
        assert!(session.title.chars().count() <= 43);
    }

    #[test]
    fn test_create_append_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let id = {
            let mut store = FileSessionStore::open(dir.path()).unwrap();
            let session = store.create("sam", TaskCategory::Code).unwrap();
            store
                .append_message(&session.id, user("write a sort function"))
                .unwrap();
            store
                .append_message(&session.id, StoredMessage::now("assistant", "Sure."))
                .unwrap();
            session.id
        };

        let store = FileSessionStore::open(dir.path()).unwrap();
        let session = store.get(&id).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].content, "write a sort function");
        assert_eq!(session.title, "write a sort function");
        assert_eq!(session.category, TaskCategory::Code);
    }

    #[test]
    fn test_delete_removes_session_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::open(dir.path()).unwrap();
        let session = store.create("sam", TaskCategory::Chat).unwrap();

        store.delete(&session.id).unwrap();
        assert!(matches!(
            store.get(&session.id),
            Err(SessionError::NotFound { .. })
        ));

        let store = FileSessionStore::open(dir.path()).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_list_orders_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::open(dir.path()).unwrap();
        let first = store.create("sam", TaskCategory::Chat).unwrap();
        let second = store.create("sam", TaskCategory::Chat).unwrap();

        store
            .append_message(&first.id, user("bump this one"))
            .unwrap();

        let listed = store.list();
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.get("nope"),
            Err(SessionError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete("nope"),
            Err(SessionError::NotFound { .. })
        ));
    }
}
