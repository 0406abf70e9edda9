// Channel Actions
// Copyright (C) 2025 Throneless Tech

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::action::ChannelAction;
use crate::error::{ChannelActionError, Result};
use crate::store::{ChannelActionStore, GetChannelActionOptions};

#[derive(Default)]
struct Inner {
    /// In creation order.
    actions: Vec<ChannelAction>,
    viewed: Vec<(String, String)>,
}

/// A [`ChannelActionStore`] held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of viewed markers recorded for the pair, duplicates included.
    pub async fn viewed_count(&self, user_id: &str, channel_id: &str) -> usize {
        self.inner
            .read()
            .await
            .viewed
            .iter()
            .filter(|(u, c)| u == user_id && c == channel_id)
            .count()
    }
}

#[async_trait]
impl ChannelActionStore for MemoryStore {
    async fn create(&self, mut action: ChannelAction) -> Result<String> {
        if !action.id.is_empty() {
            return Err(ChannelActionError::Invalid("ID should be empty".to_owned()));
        }
        let id = uuid::Uuid::new_v4().to_string();
        action.id = id.clone();
        self.inner.write().await.actions.push(action);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<ChannelAction> {
        self.inner
            .read()
            .await
            .actions
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| ChannelActionError::NotFound(id.to_owned()))
    }

    async fn get_channel_actions(
        &self,
        channel_id: &str,
        options: &GetChannelActionOptions,
    ) -> Result<Vec<ChannelAction>> {
        Ok(self
            .inner
            .read()
            .await
            .actions
            .iter()
            .filter(|a| a.channel_id == channel_id && !a.is_deleted() && options.matches(a))
            .cloned()
            .collect())
    }

    async fn update(&self, action: ChannelAction) -> Result<()> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.actions.iter_mut().find(|a| a.id == action.id) else {
            return Err(ChannelActionError::NotFound(action.id));
        };
        *existing = action;
        Ok(())
    }

    async fn has_viewed_channel(&self, user_id: &str, channel_id: &str) -> Result<bool> {
        Ok(self
            .inner
            .read()
            .await
            .viewed
            .iter()
            .any(|(u, c)| u == user_id && c == channel_id))
    }

    async fn set_viewed_channel(&self, user_id: &str, channel_id: &str) -> Result<()> {
        self.inner
            .write()
            .await
            .viewed
            .push((user_id.to_owned(), channel_id.to_owned()));
        Ok(())
    }

    async fn set_multiple_viewed_channel(
        &self,
        user_ids: &[String],
        channel_id: &str,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        for user_id in user_ids {
            inner.viewed.push((user_id.clone(), channel_id.to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{
        ActionType, CategorizeChannelPayload, Payload, PromptRunPlaybookPayload, TriggerType,
        WelcomeMessagePayload,
    };

    fn welcome(channel_id: &str) -> ChannelAction {
        ChannelAction::new(
            channel_id,
            TriggerType::NEW_MEMBER_JOINS,
            Payload::WelcomeMessage(WelcomeMessagePayload {
                message: "hello".into(),
            }),
        )
    }

    fn categorize(channel_id: &str) -> ChannelAction {
        ChannelAction::new(
            channel_id,
            TriggerType::NEW_MEMBER_JOINS,
            Payload::CategorizeChannel(CategorizeChannelPayload {
                category_name: "Incidents".into(),
            }),
        )
    }

    fn prompt(channel_id: &str) -> ChannelAction {
        ChannelAction::new(
            channel_id,
            TriggerType::KEYWORDS_POSTED,
            Payload::PromptRunPlaybook(PromptRunPlaybookPayload {
                keywords: vec!["bug".into()],
                playbook_id: "P1".into(),
            }),
        )
    }

    #[tokio::test]
    async fn it_should_assign_ids_on_create() {
        let store = MemoryStore::new();
        let id = store.create(welcome("C")).await.unwrap();
        let action = store.get(&id).await.unwrap();
        assert_eq!(action.id, id);

        let mut preset = welcome("C");
        preset.id = "mine".into();
        assert!(matches!(
            store.create(preset).await,
            Err(ChannelActionError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn it_should_filter_channel_actions() {
        let store = MemoryStore::new();
        store.create(welcome("C")).await.unwrap();
        store.create(categorize("C")).await.unwrap();
        store.create(prompt("C")).await.unwrap();
        store.create(welcome("other")).await.unwrap();

        let all = store
            .get_channel_actions("C", &GetChannelActionOptions::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let welcomes = store
            .get_channel_actions(
                "C",
                &GetChannelActionOptions {
                    action_type: ActionType::WelcomeMessage,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(welcomes.len(), 1);
        assert_eq!(welcomes[0].action_type, ActionType::WelcomeMessage);

        let joins = store
            .get_channel_actions(
                "C",
                &GetChannelActionOptions {
                    trigger_type: TriggerType::NEW_MEMBER_JOINS,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(joins.len(), 2);

        let none = store
            .get_channel_actions(
                "C",
                &GetChannelActionOptions {
                    action_type: ActionType::PromptRunPlaybook,
                    trigger_type: TriggerType::NEW_MEMBER_JOINS,
                },
            )
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn it_should_list_in_creation_order() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(store.create(welcome("C")).await.unwrap());
        }

        let listed: Vec<String> = store
            .get_channel_actions("C", &GetChannelActionOptions::default())
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn it_should_hide_deleted_actions_from_listings_only() {
        let store = MemoryStore::new();
        let id = store.create(welcome("C")).await.unwrap();

        let mut action = store.get(&id).await.unwrap();
        action.delete_at = 1_700_000_000_000;
        store.update(action).await.unwrap();

        let listed = store
            .get_channel_actions("C", &GetChannelActionOptions::default())
            .await
            .unwrap();
        assert!(listed.is_empty());
        assert!(store.get(&id).await.unwrap().is_deleted());
    }

    #[tokio::test]
    async fn it_should_reject_updates_of_missing_actions() {
        let store = MemoryStore::new();
        let mut action = welcome("C");
        action.id = "missing".into();
        assert!(matches!(
            store.update(action).await,
            Err(ChannelActionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn it_should_record_viewed_channels() {
        let store = MemoryStore::new();
        assert!(!store.has_viewed_channel("U1", "C").await.unwrap());

        store
            .set_multiple_viewed_channel(&["U1".into(), "U2".into()], "C")
            .await
            .unwrap();
        assert!(store.has_viewed_channel("U1", "C").await.unwrap());
        assert!(store.has_viewed_channel("U2", "C").await.unwrap());
        assert!(!store.has_viewed_channel("U3", "C").await.unwrap());

        store.set_viewed_channel("U1", "C").await.unwrap();
        assert_eq!(store.viewed_count("U1", "C").await, 2);
    }
}
