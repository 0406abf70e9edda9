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

//! Recording fakes for the platform, telemetry and store boundaries.

use async_trait::async_trait;
use channel_actions_common::{
    action::{
        CategorizeChannelPayload, ChannelAction, Payload, PromptRunPlaybookPayload, TriggerType,
        WelcomeMessagePayload,
    },
    error::{ChannelActionError, Result},
    memory::MemoryStore,
    store::{ChannelActionStore, GetChannelActionOptions},
};
use std::sync::Mutex;
use std::time::Duration;

use crate::platform::{ChannelPlatform, Post};
use crate::telemetry::ChannelActionTelemetry;

pub fn welcome(channel_id: &str, message: &str) -> ChannelAction {
    ChannelAction::new(
        channel_id,
        TriggerType::NEW_MEMBER_JOINS,
        Payload::WelcomeMessage(WelcomeMessagePayload {
            message: message.into(),
        }),
    )
}

pub fn prompt(channel_id: &str, keywords: &[&str], playbook_id: &str) -> ChannelAction {
    ChannelAction::new(
        channel_id,
        TriggerType::KEYWORDS_POSTED,
        Payload::PromptRunPlaybook(PromptRunPlaybookPayload {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            playbook_id: playbook_id.into(),
        }),
    )
}

pub fn categorize(channel_id: &str, category_name: &str) -> ChannelAction {
    ChannelAction::new(
        channel_id,
        TriggerType::NEW_MEMBER_JOINS,
        Payload::CategorizeChannel(CategorizeChannelPayload {
            category_name: category_name.into(),
        }),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    EphemeralPost {
        user_id: String,
        channel_id: String,
        message: String,
    },
    PlaybookSuggestion {
        session_id: String,
        post_id: String,
        playbook_id: String,
        keyword: String,
    },
    Categorized {
        user_id: String,
        channel_id: String,
        category_name: String,
    },
}

#[derive(Default)]
pub struct RecordingPlatform {
    effects: Mutex<Vec<Effect>>,
    fail_all: bool,
    fail_category: Option<String>,
    delay: Option<Duration>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every effect is rejected.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Categorizing into `category_name` is rejected.
    pub fn failing_category(mut self, category_name: &str) -> Self {
        self.fail_category = Some(category_name.to_owned());
        self
    }

    /// Every effect takes `delay` before it lands.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().unwrap().clone()
    }

    async fn record(&self, effect: Effect) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all {
            return Err(ChannelActionError::Execution("rejected".into()));
        }
        if let Effect::Categorized { category_name, .. } = &effect {
            if self.fail_category.as_ref() == Some(category_name) {
                return Err(ChannelActionError::Execution("rejected".into()));
            }
        }
        self.effects.lock().unwrap().push(effect);
        Ok(())
    }
}

#[async_trait]
impl ChannelPlatform for RecordingPlatform {
    async fn send_ephemeral_post(
        &self,
        user_id: &str,
        channel_id: &str,
        message: &str,
    ) -> Result<()> {
        self.record(Effect::EphemeralPost {
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            message: message.into(),
        })
        .await
    }

    async fn suggest_playbook(
        &self,
        session_id: &str,
        post: &Post,
        playbook_id: &str,
        keyword: &str,
    ) -> Result<()> {
        self.record(Effect::PlaybookSuggestion {
            session_id: session_id.into(),
            post_id: post.id.clone(),
            playbook_id: playbook_id.into(),
            keyword: keyword.into(),
        })
        .await
    }

    async fn categorize_channel(
        &self,
        user_id: &str,
        channel_id: &str,
        category_name: &str,
    ) -> Result<()> {
        self.record(Effect::Categorized {
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            category_name: category_name.into(),
        })
        .await
    }
}

#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// (action id, user id) pairs in the order they were tracked.
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl ChannelActionTelemetry for RecordingTelemetry {
    fn run_channel_action(&self, action: &ChannelAction, user_id: &str) {
        self.events
            .lock()
            .unwrap()
            .push((action.id.clone(), user_id.to_owned()));
    }
}

/// A [`MemoryStore`] whose reads can be made to fail or stall.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_viewed_checks: bool,
    fail_listings: bool,
    delay: Option<Duration>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_viewed_checks(mut self) -> Self {
        self.fail_viewed_checks = true;
        self
    }

    pub fn failing_listings(mut self) -> Self {
        self.fail_listings = true;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn stall(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn unavailable() -> ChannelActionError {
    ChannelActionError::Io(std::io::Error::other("store unavailable"))
}

#[async_trait]
impl ChannelActionStore for FlakyStore {
    async fn create(&self, action: ChannelAction) -> Result<String> {
        self.inner.create(action).await
    }

    async fn get(&self, id: &str) -> Result<ChannelAction> {
        self.stall().await;
        self.inner.get(id).await
    }

    async fn get_channel_actions(
        &self,
        channel_id: &str,
        options: &GetChannelActionOptions,
    ) -> Result<Vec<ChannelAction>> {
        self.stall().await;
        if self.fail_listings {
            return Err(unavailable());
        }
        self.inner.get_channel_actions(channel_id, options).await
    }

    async fn update(&self, action: ChannelAction) -> Result<()> {
        self.inner.update(action).await
    }

    async fn has_viewed_channel(&self, user_id: &str, channel_id: &str) -> Result<bool> {
        self.stall().await;
        if self.fail_viewed_checks {
            return Err(unavailable());
        }
        self.inner.has_viewed_channel(user_id, channel_id).await
    }

    async fn set_viewed_channel(&self, user_id: &str, channel_id: &str) -> Result<()> {
        self.inner.set_viewed_channel(user_id, channel_id).await
    }

    async fn set_multiple_viewed_channel(
        &self,
        user_ids: &[String],
        channel_id: &str,
    ) -> Result<()> {
        self.inner
            .set_multiple_viewed_channel(user_ids, channel_id)
            .await
    }
}
