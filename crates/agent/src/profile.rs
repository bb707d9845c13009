//! In-memory profile store
//!
//! The default `ProfileStore` backend: a concurrent map, nothing persisted.
//! Production deployments swap in a durable implementation without touching
//! the agent.

use async_trait::async_trait;
use dashmap::DashMap;

use krishi_agent_core::{ProfileStore, Result, UserProfile};

/// `ProfileStore` over a concurrent in-memory map
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<String, UserProfile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.get(user_id).map(|p| p.clone()))
    }

    async fn set(&self, profile: UserProfile) -> Result<()> {
        self.profiles.insert(profile.user_id.clone(), profile);
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<()> {
        self.profiles.remove(user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_agent_core::Language;

    #[tokio::test]
    async fn test_round_trip() {
        let store = InMemoryProfileStore::new();
        assert!(store.get("u1").await.unwrap().is_none());

        let mut profile = UserProfile::new("u1");
        profile.name = Some("Ravi".into());
        profile.preferred_language = Some(Language::Hindi);
        profile.default_location = Some("Karnal".into());
        store.set(profile).await.unwrap();

        let loaded = store.get("u1").await.unwrap().unwrap();
        assert_eq!(loaded.name.as_deref(), Some("Ravi"));
        assert_eq!(loaded.default_location.as_deref(), Some("Karnal"));

        store.delete("u1").await.unwrap();
        assert!(store.get("u1").await.unwrap().is_none());
    }
}
