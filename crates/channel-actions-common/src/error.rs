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

use sea_orm::DbErr;
use serde_json::Error as SerdeError;
use std::io;
use thiserror::Error;

use crate::action::ActionType;

/// Raised when a persisted or wire token does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownTypeError {
    #[error("unknown action type: `{0}`")]
    Action(String),
    #[error("unknown trigger type: `{0}`")]
    Trigger(String),
}

/// A malformed or inconsistent action. The caller's fault, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("action type must be set")]
    MissingActionType,
    #[error("trigger type `{0}` is not valid")]
    InvalidTriggerType(String),
    #[error("action type `{action_type}` cannot be triggered by `{trigger_type}`")]
    InvalidPairing {
        action_type: ActionType,
        trigger_type: String,
    },
    #[error("payload does not match action type `{0}`")]
    PayloadMismatch(ActionType),
    #[error("malformed payload for action type `{action_type}`: {reason}")]
    MalformedPayload {
        action_type: ActionType,
        reason: String,
    },
    #[error("`{0}` must not be blank")]
    BlankField(&'static str),
}

#[derive(Debug, Error)]
pub enum ChannelActionError {
    #[error("Validation error: `{0}`")]
    Validation(#[from] ValidationError),
    #[error("Decode error: `{0}`")]
    UnknownType(#[from] UnknownTypeError),
    #[error("Not found: `{0}`")]
    NotFound(String),
    #[error("Invalid argument: `{0}`")]
    Invalid(String),
    #[error("Database error: `{0}`")]
    Db(#[from] DbErr),
    #[error("Store did not answer within {0:?}")]
    StoreTimeout(std::time::Duration),
    #[error("Execution error: `{0}`")]
    Execution(String),
    #[error("Serialization/deserialization error: `{0}`")]
    Serde(#[from] SerdeError),
    #[error("I/O error: `{0}`")]
    Io(#[from] io::Error),
    #[error("Figment error: `{0}`")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ChannelActionError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ChannelActionError>;
