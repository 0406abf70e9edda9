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

pub mod db;

use async_trait::async_trait;
use channel_actions_common::{
    action::ChannelAction,
    error::{ChannelActionError, Result},
    store::{ChannelActionStore, GetChannelActionOptions},
};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, warn};

/// A [`ChannelActionStore`] backed by a SQL database through sea-orm.
#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn connect(uri: &str) -> Result<Self> {
        let db = Database::connect(uri).await?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> Result<()> {
        db::migration::migrate(&self.db).await
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ChannelActionStore for SqlStore {
    async fn create(&self, action: ChannelAction) -> Result<String> {
        if !action.id.is_empty() {
            return Err(ChannelActionError::Invalid("ID should be empty".to_owned()));
        }
        let id = db::channel_action::create(&action, &self.db).await?;
        debug!(action_id = %id, channel_id = %action.channel_id, "created channel action");
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<ChannelAction> {
        match db::channel_action::get_by_id(id, &self.db).await? {
            Some(model) => model.try_into(),
            None => Err(ChannelActionError::NotFound(id.to_owned())),
        }
    }

    async fn get_channel_actions(
        &self,
        channel_id: &str,
        options: &GetChannelActionOptions,
    ) -> Result<Vec<ChannelAction>> {
        let models = db::channel_action::list_by_channel(channel_id, options, &self.db).await?;

        let mut actions = Vec::with_capacity(models.len());
        for model in models {
            let action_id = model.id.clone();
            match ChannelAction::try_from(model) {
                Ok(action) => actions.push(action),
                Err(err) => {
                    warn!(%action_id, %channel_id, "skipping undecodable channel action: {}", err);
                }
            }
        }
        Ok(actions)
    }

    async fn update(&self, action: ChannelAction) -> Result<()> {
        db::channel_action::update(&action, &self.db).await
    }

    async fn has_viewed_channel(&self, user_id: &str, channel_id: &str) -> Result<bool> {
        db::viewed_channel::exists(user_id, channel_id, &self.db).await
    }

    async fn set_viewed_channel(&self, user_id: &str, channel_id: &str) -> Result<()> {
        db::viewed_channel::insert(user_id, channel_id, &self.db).await
    }

    async fn set_multiple_viewed_channel(
        &self,
        user_ids: &[String],
        channel_id: &str,
    ) -> Result<()> {
        db::viewed_channel::insert_many(user_ids, channel_id, &self.db).await
    }
}
