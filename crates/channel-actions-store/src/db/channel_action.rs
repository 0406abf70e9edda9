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
    action::{self, ActionType, Payload, TriggerType},
    error::{ChannelActionError, Result},
    store::GetChannelActionOptions,
};
use sea_orm::{sea_query::Expr, *};
use uuid;

use super::entities::{prelude::*, *};

impl TryFrom<channel_action::Model> for action::ChannelAction {
    type Error = ChannelActionError;

    fn try_from(model: channel_action::Model) -> Result<Self> {
        let action_type: ActionType = model.action_type.parse()?;
        let payload = Payload::decode(action_type, serde_json::from_str(&model.payload)?)?;
        Ok(action::ChannelAction {
            id: model.id,
            channel_id: model.channel_id,
            enabled: model.enabled,
            delete_at: model.delete_at,
            action_type,
            trigger_type: TriggerType::from(model.trigger_type),
            payload,
        })
    }
}

pub async fn create(action: &action::ChannelAction, db: &DatabaseConnection) -> Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let entry = channel_action::ActiveModel {
        id: ActiveValue::Set(id.clone()),
        channel_id: ActiveValue::Set(action.channel_id.to_owned()),
        enabled: ActiveValue::Set(action.enabled),
        delete_at: ActiveValue::Set(action.delete_at),
        action_type: ActiveValue::Set(action.action_type.to_string()),
        trigger_type: ActiveValue::Set(action.trigger_type.to_string()),
        payload: ActiveValue::Set(serde_json::to_string(&action.payload)?),
        ..Default::default()
    };
    entry.insert(db).await?;
    Ok(id)
}

pub async fn get_by_id(id: &str, db: &DatabaseConnection) -> Result<Option<channel_action::Model>> {
    let entry = ChannelAction::find_by_id(id).one(db).await?;

    Ok(entry)
}

pub async fn list_by_channel(
    channel_id: &str,
    options: &GetChannelActionOptions,
    db: &DatabaseConnection,
) -> Result<Vec<channel_action::Model>> {
    let mut query = ChannelAction::find()
        .filter(channel_action::Column::ChannelId.eq(channel_id))
        .filter(channel_action::Column::DeleteAt.eq(0));

    if options.action_type.is_set() {
        query = query.filter(channel_action::Column::ActionType.eq(options.action_type.as_str()));
    }
    if options.trigger_type.is_set() {
        query = query.filter(channel_action::Column::TriggerType.eq(options.trigger_type.as_str()));
    }

    let entries = query
        .order_by(channel_action::Column::CreatedAt, Order::Asc)
        // created_at has one-second resolution; rowid breaks ties in insert order
        .order_by(Expr::cust("rowid"), Order::Asc)
        .all(db)
        .await?;

    Ok(entries)
}

pub async fn update(action: &action::ChannelAction, db: &DatabaseConnection) -> Result<()> {
    let Some(existing) = ChannelAction::find_by_id(action.id.as_str()).one(db).await? else {
        return Err(ChannelActionError::NotFound(action.id.to_owned()));
    };

    let mut existing: channel_action::ActiveModel = existing.into();
    existing.channel_id = ActiveValue::Set(action.channel_id.to_owned());
    existing.enabled = ActiveValue::Set(action.enabled);
    existing.delete_at = ActiveValue::Set(action.delete_at);
    existing.action_type = ActiveValue::Set(action.action_type.to_string());
    existing.trigger_type = ActiveValue::Set(action.trigger_type.to_string());
    existing.payload = ActiveValue::Set(serde_json::to_string(&action.payload)?);
    existing.update(db).await?;
    Ok(())
}
