use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use teloxide::types::ChatId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::session::QuizSession;

pub type SessionHandle = Arc<AsyncMutex<QuizSession>>;
pub type SessionGuard = OwnedMutexGuard<QuizSession>;

/// Owns every chat's [`QuizSession`].
///
/// Each chat gets its own async mutex, so work on one chat is serialized while
/// different chats never wait on each other. The outer map lock is only held for
/// lookups and is never held across an `.await`.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<ChatId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chat's session handle, creating an empty session if needed.
    pub fn get_or_create(&self, id: ChatId) -> SessionHandle {
        self.map()
            .entry(id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(QuizSession::new())))
            .clone()
    }

    /// Waits for exclusive access to the chat's current session.
    ///
    /// If the entry was removed or replaced while waiting, the lock is retried on
    /// whatever the registry now holds for `id`.
    pub async fn lock(&self, id: ChatId) -> SessionGuard {
        loop {
            let handle = self.get_or_create(id);
            let guard = handle.clone().lock_owned().await;
            if self.is_current(id, &handle) {
                return guard;
            }
            log::debug!("Session for chat {} changed while waiting, retrying", id.0);
        }
    }

    /// Replaces the chat's session with a fresh empty one once in-flight work on it
    /// has finished.
    pub async fn reset(&self, id: ChatId) {
        let mut session = self.lock(id).await;
        *session = QuizSession::new();
        log::info!("Session for chat {} reset to {}", id.0, session.id());
    }

    pub fn remove(&self, id: ChatId) -> bool {
        self.map().remove(&id).is_some()
    }

    pub fn contains(&self, id: ChatId) -> bool {
        self.map().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    fn is_current(&self, id: ChatId, handle: &SessionHandle) -> bool {
        self.map()
            .get(&id)
            .is_some_and(|current| Arc::ptr_eq(current, handle))
    }

    fn map(&self) -> MutexGuard<'_, HashMap<ChatId, SessionHandle>> {
        // Entries are swapped whole, so a poisoned map is still consistent.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
