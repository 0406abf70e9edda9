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

use crate::action::{ActionType, ChannelAction, TriggerType};
use crate::error::Result;

/// Narrows [`ChannelActionStore::get_channel_actions`]. A field left at its
/// zero value matches every value of that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetChannelActionOptions {
    pub action_type: ActionType,
    pub trigger_type: TriggerType,
}

impl GetChannelActionOptions {
    pub fn matches(&self, action: &ChannelAction) -> bool {
        (!self.action_type.is_set() || self.action_type == action.action_type)
            && (!self.trigger_type.is_set() || self.trigger_type == action.trigger_type)
    }
}

/// Persistence of channel actions and viewed-channel markers.
#[async_trait]
pub trait ChannelActionStore: Send + Sync {
    /// Stores a new action and returns its freshly assigned id. The action
    /// must not carry an id yet.
    async fn create(&self, action: ChannelAction) -> Result<String>;

    /// Returns the action identified by `id`, soft-deleted or not.
    async fn get(&self, id: &str) -> Result<ChannelAction>;

    /// Returns the live actions of `channel_id` matching `options`, in
    /// creation order. A stored action that no longer decodes is left out
    /// rather than failing the whole listing; `get` still reports it.
    async fn get_channel_actions(
        &self,
        channel_id: &str,
        options: &GetChannelActionOptions,
    ) -> Result<Vec<ChannelAction>>;

    /// Replaces the action identified by `action.id`.
    async fn update(&self, action: ChannelAction) -> Result<()>;

    async fn has_viewed_channel(&self, user_id: &str, channel_id: &str) -> Result<bool>;

    /// Records that `user_id` has viewed `channel_id`. Does not check for an
    /// existing record, so calling it twice leaves two markers.
    async fn set_viewed_channel(&self, user_id: &str, channel_id: &str) -> Result<()>;

    async fn set_multiple_viewed_channel(&self, user_ids: &[String], channel_id: &str)
    -> Result<()>;
}
