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

use channel_actions_common::{
    action::{ActionType, ChannelAction, Payload, TriggerType},
    error::{ChannelActionError, Result},
    store::{ChannelActionStore, GetChannelActionOptions},
    validate,
};
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, error, warn};

use crate::dedup::{AtMostOnce, PostDeliveryGuard, RecentPosts};
use crate::executor::{ActionExecutor, Trigger};
use crate::keywords::{KeywordMatcher, tokenize};
use crate::locks::JoinLocks;
use crate::platform::{ChannelPlatform, Post};
use crate::settings::Settings;
use crate::telemetry::ChannelActionTelemetry;

/// Manages channel actions and evaluates them against channel events.
///
/// Event handlers never fail: store and delivery errors are logged and
/// contained to the action they concern.
///
/// Without `serialize_joins`, two concurrent joins of the same user to the
/// same channel can both find no viewed marker and both send the welcome
/// message. The store offers no atomic check-and-set to prevent it.
#[derive(Clone)]
pub struct ChannelActionService {
    store: Arc<dyn ChannelActionStore>,
    executor: ActionExecutor,
    delivery: Arc<dyn PostDeliveryGuard>,
    join_locks: Option<Arc<JoinLocks>>,
    store_timeout: Duration,
    suppress_welcome_on_invite: bool,
}

impl ChannelActionService {
    pub fn new(
        store: Arc<dyn ChannelActionStore>,
        platform: Arc<dyn ChannelPlatform>,
        telemetry: Arc<dyn ChannelActionTelemetry>,
        settings: &Settings,
    ) -> Self {
        let delivery: Arc<dyn PostDeliveryGuard> = match settings.post_dedup_capacity {
            0 => Arc::new(AtMostOnce),
            capacity => Arc::new(RecentPosts::new(capacity)),
        };

        Self {
            store,
            executor: ActionExecutor::new(platform, telemetry, settings.effect_timeout()),
            delivery,
            join_locks: settings.serialize_joins.then(|| Arc::new(JoinLocks::new())),
            store_timeout: settings.store_timeout(),
            suppress_welcome_on_invite: settings.suppress_welcome_on_invite,
        }
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| ChannelActionError::StoreTimeout(self.store_timeout))?
    }

    /// Checks that the action type, trigger type and payload are all valid
    /// and consistent with each other.
    pub fn validate(&self, action: &ChannelAction) -> Result<()> {
        validate::validate(action)?;
        Ok(())
    }

    /// Validates and stores a new action, returning its id.
    pub async fn create(&self, action: ChannelAction) -> Result<String> {
        self.validate(&action)?;
        self.bounded(self.store.create(action)).await
    }

    pub async fn get(&self, id: &str) -> Result<ChannelAction> {
        self.bounded(self.store.get(id)).await
    }

    pub async fn get_channel_actions(
        &self,
        channel_id: &str,
        options: &GetChannelActionOptions,
    ) -> Result<Vec<ChannelAction>> {
        self.bounded(self.store.get_channel_actions(channel_id, options))
            .await
    }

    /// Validates and replaces the action identified by `action.id`.
    pub async fn update(&self, action: ChannelAction) -> Result<()> {
        self.validate(&action)?;
        self.bounded(self.store.update(action)).await
    }

    /// Records that every user in `user_ids` has already been welcomed to
    /// `channel_id`.
    pub async fn set_multiple_viewed_channel(
        &self,
        user_ids: &[String],
        channel_id: &str,
    ) -> Result<()> {
        self.bounded(self.store.set_multiple_viewed_channel(user_ids, channel_id))
            .await
    }

    async fn active_actions(
        &self,
        channel_id: &str,
        options: &GetChannelActionOptions,
    ) -> Result<Vec<ChannelAction>> {
        let mut actions = self.get_channel_actions(channel_id, options).await?;
        actions.retain(ChannelAction::is_active);
        Ok(actions)
    }

    /// Called when `user_id` has joined `channel_id`. A non-blank `actor_id`
    /// means the user was added by that actor.
    pub async fn user_has_joined_channel(&self, user_id: &str, channel_id: &str, actor_id: &str) {
        let options = GetChannelActionOptions {
            trigger_type: TriggerType::NEW_MEMBER_JOINS,
            ..Default::default()
        };
        let actions = match self.active_actions(channel_id, &options).await {
            Ok(actions) => actions,
            Err(err) => {
                error!(%user_id, %channel_id, "failed to get channel actions: {}", err);
                return;
            }
        };

        let trigger = Trigger::Join {
            user_id,
            channel_id,
        };
        let mut welcomes = Vec::new();
        for action in actions {
            match action.action_type {
                ActionType::WelcomeMessage => welcomes.push(action),
                ActionType::CategorizeChannel => {
                    if let Err(err) = self.executor.execute(&action, &trigger).await {
                        error!(action_id = %action.id, %user_id, "failed to categorize channel: {}", err);
                    }
                }
                ActionType::PromptRunPlaybook | ActionType::Unknown => {
                    debug!(action_id = %action.id, "action cannot run on a member join, skipping");
                }
            }
        }

        if welcomes.is_empty() {
            return;
        }
        if self.suppress_welcome_on_invite && !actor_id.trim().is_empty() {
            debug!(%user_id, %channel_id, %actor_id, "user was invited, skipping welcome message");
            return;
        }
        self.send_welcome_messages(user_id, channel_id, &welcomes)
            .await;
    }

    /// Sends the welcome messages of `channel_id` to `user_id` unless the
    /// user has viewed the channel before. Returns true if a message was sent.
    pub async fn check_and_send_message_on_join(&self, user_id: &str, channel_id: &str) -> bool {
        let options = GetChannelActionOptions {
            action_type: ActionType::WelcomeMessage,
            trigger_type: TriggerType::NEW_MEMBER_JOINS,
        };
        match self.active_actions(channel_id, &options).await {
            Ok(welcomes) if welcomes.is_empty() => false,
            Ok(welcomes) => {
                self.send_welcome_messages(user_id, channel_id, &welcomes)
                    .await
            }
            Err(err) => {
                error!(%user_id, %channel_id, "failed to get welcome actions: {}", err);
                false
            }
        }
    }

    async fn send_welcome_messages(
        &self,
        user_id: &str,
        channel_id: &str,
        welcomes: &[ChannelAction],
    ) -> bool {
        let _guard = match &self.join_locks {
            Some(locks) => Some(locks.acquire(user_id, channel_id).await),
            None => None,
        };

        match self
            .bounded(self.store.has_viewed_channel(user_id, channel_id))
            .await
        {
            Ok(true) => {
                debug!(%user_id, %channel_id, "channel already viewed, skipping welcome message");
                return false;
            }
            Ok(false) => {}
            Err(err) => {
                error!(%user_id, %channel_id, "failed to check viewed channel: {}", err);
                return false;
            }
        }

        let trigger = Trigger::Join {
            user_id,
            channel_id,
        };
        let mut sent = false;
        for action in welcomes {
            match self.executor.execute(action, &trigger).await {
                Ok(()) => sent = true,
                Err(err) => {
                    error!(action_id = %action.id, %user_id, "failed to send welcome message: {}", err);
                }
            }
        }

        // Marked even when delivery failed, so a redelivered join does not
        // repeat an effect that may have landed.
        if let Err(err) = self
            .bounded(self.store.set_viewed_channel(user_id, channel_id))
            .await
        {
            warn!(%user_id, %channel_id, "failed to mark channel viewed: {}", err);
        }
        sent
    }

    /// Suggests playbooks to the session's user when `post` mentions one of
    /// the keywords configured on its channel.
    pub async fn message_has_been_posted(&self, session_id: &str, post: &Post) {
        let words = tokenize(&post.message);
        if words.is_empty() {
            return;
        }

        let options = GetChannelActionOptions {
            trigger_type: TriggerType::KEYWORDS_POSTED,
            ..Default::default()
        };
        let actions = match self.active_actions(&post.channel_id, &options).await {
            Ok(actions) => actions,
            Err(err) => {
                error!(post_id = %post.id, channel_id = %post.channel_id, "failed to get channel actions: {}", err);
                return;
            }
        };

        for action in &actions {
            let Payload::PromptRunPlaybook(payload) = &action.payload else {
                debug!(action_id = %action.id, "action cannot run on a post, skipping");
                continue;
            };
            let Some(keyword) = KeywordMatcher::new(&payload.keywords).first_match(&words) else {
                continue;
            };
            if !self.delivery.first_delivery(&post.id, &action.id) {
                debug!(action_id = %action.id, post_id = %post.id, "post already handled, skipping");
                continue;
            }

            let trigger = Trigger::Post {
                session_id,
                post,
                keyword,
            };
            if let Err(err) = self.executor.execute(action, &trigger).await {
                error!(action_id = %action.id, post_id = %post.id, "failed to suggest playbook: {}", err);
            }
        }
    }
}
