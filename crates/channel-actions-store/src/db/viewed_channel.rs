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

use channel_actions_common::error::Result;
use sea_orm::*;
use uuid;

use super::entities::{prelude::*, *};

fn new_entry(user_id: &str, channel_id: &str) -> viewed_channel::ActiveModel {
    viewed_channel::ActiveModel {
        id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
        user_id: ActiveValue::Set(user_id.to_owned()),
        channel_id: ActiveValue::Set(channel_id.to_owned()),
        ..Default::default()
    }
}

pub async fn exists(user_id: &str, channel_id: &str, db: &DatabaseConnection) -> Result<bool> {
    let count = ViewedChannel::find()
        .filter(viewed_channel::Column::UserId.eq(user_id))
        .filter(viewed_channel::Column::ChannelId.eq(channel_id))
        .count(db)
        .await?;

    Ok(count > 0)
}

pub async fn count(user_id: &str, channel_id: &str, db: &DatabaseConnection) -> Result<u64> {
    let count = ViewedChannel::find()
        .filter(viewed_channel::Column::UserId.eq(user_id))
        .filter(viewed_channel::Column::ChannelId.eq(channel_id))
        .count(db)
        .await?;

    Ok(count)
}

/// Inserts without looking for an existing marker.
pub async fn insert(user_id: &str, channel_id: &str, db: &DatabaseConnection) -> Result<()> {
    new_entry(user_id, channel_id).insert(db).await?;
    Ok(())
}

pub async fn insert_many(
    user_ids: &[String],
    channel_id: &str,
    db: &DatabaseConnection,
) -> Result<()> {
    if user_ids.is_empty() {
        return Ok(());
    }

    ViewedChannel::insert_many(user_ids.iter().map(|u| new_entry(u, channel_id)))
        .exec_without_returning(db)
        .await?;
    Ok(())
}
