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
use channel_actions_common::error::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A message posted in a channel, as handed over by the host platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub message: String,
}

/// The effects the chat platform offers to actions.
#[async_trait]
pub trait ChannelPlatform: Send + Sync {
    /// Posts `message` in `channel_id` as a system message only `user_id` sees.
    async fn send_ephemeral_post(&self, user_id: &str, channel_id: &str, message: &str)
    -> Result<()>;

    /// Offers the session's user to run `playbook_id`, because `post`
    /// mentioned `keyword`.
    async fn suggest_playbook(
        &self,
        session_id: &str,
        post: &Post,
        playbook_id: &str,
        keyword: &str,
    ) -> Result<()>;

    /// Moves `channel_id` into the sidebar category `category_name` of
    /// `user_id`, creating the category when needed.
    async fn categorize_channel(
        &self,
        user_id: &str,
        channel_id: &str,
        category_name: &str,
    ) -> Result<()>;
}

/// Reports every effect through tracing instead of a chat platform.
pub struct LogPlatform;

#[async_trait]
impl ChannelPlatform for LogPlatform {
    async fn send_ephemeral_post(
        &self,
        user_id: &str,
        channel_id: &str,
        message: &str,
    ) -> Result<()> {
        info!(%user_id, %channel_id, %message, "ephemeral post");
        Ok(())
    }

    async fn suggest_playbook(
        &self,
        session_id: &str,
        post: &Post,
        playbook_id: &str,
        keyword: &str,
    ) -> Result<()> {
        info!(
            %session_id,
            post_id = %post.id,
            channel_id = %post.channel_id,
            %playbook_id,
            %keyword,
            "playbook suggestion"
        );
        Ok(())
    }

    async fn categorize_channel(
        &self,
        user_id: &str,
        channel_id: &str,
        category_name: &str,
    ) -> Result<()> {
        info!(%user_id, %channel_id, %category_name, "channel categorized");
        Ok(())
    }
}
