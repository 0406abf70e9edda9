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
    action::{ChannelAction, Payload},
    error::{ChannelActionError, Result},
};
use std::{fmt, sync::Arc, time::Duration};
use tracing::info;

use crate::platform::{ChannelPlatform, Post};
use crate::telemetry::ChannelActionTelemetry;

/// The event an action is being executed for.
#[derive(Debug, Clone, Copy)]
pub enum Trigger<'a> {
    Join {
        user_id: &'a str,
        channel_id: &'a str,
    },
    Post {
        session_id: &'a str,
        post: &'a Post,
        keyword: &'a str,
    },
}

impl Trigger<'_> {
    /// The user the effect is carried out for.
    pub fn user_id(&self) -> &str {
        match self {
            Trigger::Join { user_id, .. } => user_id,
            Trigger::Post { post, .. } => &post.user_id,
        }
    }
}

impl fmt::Display for Trigger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Join { .. } => f.write_str("member join"),
            Trigger::Post { .. } => f.write_str("post"),
        }
    }
}

/// Carries out the effect of matched actions and reports them to telemetry.
#[derive(Clone)]
pub struct ActionExecutor {
    platform: Arc<dyn ChannelPlatform>,
    telemetry: Arc<dyn ChannelActionTelemetry>,
    timeout: Duration,
}

impl ActionExecutor {
    pub fn new(
        platform: Arc<dyn ChannelPlatform>,
        telemetry: Arc<dyn ChannelActionTelemetry>,
        timeout: Duration,
    ) -> Self {
        Self {
            platform,
            telemetry,
            timeout,
        }
    }

    /// Delivers the effect of `action` for `trigger`, then records telemetry.
    /// Telemetry is only emitted once the effect succeeded.
    pub async fn execute(&self, action: &ChannelAction, trigger: &Trigger<'_>) -> Result<()> {
        match tokio::time::timeout(self.timeout, self.deliver(action, trigger)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ChannelActionError::Execution(format!(
                    "action {} did not complete within {:?}",
                    action.id, self.timeout
                )));
            }
        }

        self.telemetry
            .run_channel_action(action, trigger.user_id());
        Ok(())
    }

    async fn deliver(&self, action: &ChannelAction, trigger: &Trigger<'_>) -> Result<()> {
        let mismatch = || {
            Err(ChannelActionError::Execution(format!(
                "action {} of type `{}` cannot run on a {}",
                action.id, action.action_type, trigger
            )))
        };

        match &action.payload {
            Payload::WelcomeMessage(payload) => {
                let Trigger::Join {
                    user_id,
                    channel_id,
                } = *trigger
                else {
                    return mismatch();
                };
                info!(action_id = %action.id, %user_id, %channel_id, "sending welcome message");
                self.platform
                    .send_ephemeral_post(user_id, channel_id, &payload.message)
                    .await
            }
            Payload::PromptRunPlaybook(payload) => {
                let Trigger::Post {
                    session_id,
                    post,
                    keyword,
                } = *trigger
                else {
                    return mismatch();
                };
                info!(
                    action_id = %action.id,
                    post_id = %post.id,
                    playbook_id = %payload.playbook_id,
                    "suggesting playbook"
                );
                self.platform
                    .suggest_playbook(session_id, post, &payload.playbook_id, keyword)
                    .await
            }
            Payload::CategorizeChannel(payload) => {
                let Trigger::Join {
                    user_id,
                    channel_id,
                } = *trigger
                else {
                    return mismatch();
                };
                info!(
                    action_id = %action.id,
                    %user_id,
                    %channel_id,
                    category_name = %payload.category_name,
                    "categorizing channel"
                );
                self.platform
                    .categorize_channel(user_id, channel_id, &payload.category_name)
                    .await
            }
            Payload::Empty => Err(ChannelActionError::Execution(format!(
                "action {} has no payload",
                action.id
            ))),
        }
    }
}
