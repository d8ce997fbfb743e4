use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{ChatTranscript, DomainError, Role};

/// A [`ChatTranscript`] behind a single async lock, for sessions reachable
/// from more than one task.
///
/// Every operation takes the lock for its whole duration, so a render or
/// snapshot always sees a complete prefix of the appends.
#[derive(Clone, Default)]
pub struct SharedTranscript {
    inner: Arc<Mutex<ChatTranscript>>,
}

impl SharedTranscript {
    pub fn new(transcript: ChatTranscript) -> Self {
        Self {
            inner: Arc::new(Mutex::new(transcript)),
        }
    }

    pub async fn append(&self, role: Role, text: impl Into<String>) -> Result<(), DomainError> {
        self.inner.lock().await.append(role, text)
    }

    pub async fn append_system(&self, text: impl Into<String>) -> Result<(), DomainError> {
        self.append(Role::System, text).await
    }

    pub async fn append_user(&self, text: impl Into<String>) -> Result<(), DomainError> {
        self.append(Role::User, text).await
    }

    pub async fn append_assistant(&self, text: impl Into<String>) -> Result<(), DomainError> {
        self.append(Role::Assistant, text).await
    }

    pub async fn render(&self) -> String {
        self.inner.lock().await.render()
    }

    pub async fn snapshot(&self) -> ChatTranscript {
        self.inner.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Hold the lock across several operations, e.g. a full chat turn.
    pub async fn lock(&self) -> MutexGuard<'_, ChatTranscript> {
        self.inner.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concurrent_appends_are_all_recorded() {
        let shared = SharedTranscript::new(ChatTranscript::with_system("sys").unwrap());

        let mut handles = Vec::new();
        for i in 0..16 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                shared.append_user(format!("message {i}")).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = shared.snapshot().await;
        assert_eq!(snapshot.len(), 17);
        assert!(snapshot.turns().next().unwrap().is_system());
        assert_eq!(shared.render().await, snapshot.render());
    }

    #[tokio::test]
    async fn test_render_sees_whole_turns() {
        let shared = SharedTranscript::default();
        assert!(shared.is_empty().await);

        shared.append_user("<hi>").await.unwrap();
        shared.append_assistant("hello").await.unwrap();

        let parsed = ChatTranscript::parse(&shared.render().await).unwrap();
        assert_eq!(parsed, shared.snapshot().await);
        assert_eq!(shared.len().await, 2);
    }

    #[tokio::test]
    async fn test_rejected_append_leaves_state_unchanged() {
        let shared = SharedTranscript::default();

        assert!(shared.append_system("").await.is_err());
        assert!(shared.is_empty().await);
    }
}
