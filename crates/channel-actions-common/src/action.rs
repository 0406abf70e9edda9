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

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;
use std::{borrow::Cow, fmt, str::FromStr};

use crate::error::{UnknownTypeError, ValidationError};

/// The effect an action has once triggered.
///
/// `Unknown` is the zero value. It encodes to the empty token and exists only
/// so an uninitialized action can be represented; validation rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionType {
    #[default]
    Unknown,
    WelcomeMessage,
    PromptRunPlaybook,
    CategorizeChannel,
}

impl ActionType {
    /// Every action type a stored action may carry.
    pub const CONFIGURABLE: [ActionType; 3] = [
        ActionType::WelcomeMessage,
        ActionType::PromptRunPlaybook,
        ActionType::CategorizeChannel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Unknown => "",
            ActionType::WelcomeMessage => "send_welcome_message",
            ActionType::PromptRunPlaybook => "prompt_run_playbook",
            ActionType::CategorizeChannel => "categorize_channel",
        }
    }

    pub fn is_set(&self) -> bool {
        *self != ActionType::Unknown
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(ActionType::Unknown),
            "send_welcome_message" => Ok(ActionType::WelcomeMessage),
            "prompt_run_playbook" => Ok(ActionType::PromptRunPlaybook),
            "categorize_channel" => Ok(ActionType::CategorizeChannel),
            other => Err(UnknownTypeError::Action(other.to_owned())),
        }
    }
}

impl Serialize for ActionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(de::Error::custom)
    }
}

/// The event class that can cause an action to fire.
///
/// Kept open so that a stored or submitted value outside the known set can be
/// carried up to validation and reported there. Use [`FromStr`] for strict
/// decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerType(Cow<'static, str>);

impl TriggerType {
    pub const NEW_MEMBER_JOINS: TriggerType = TriggerType(Cow::Borrowed("new_member_joins"));
    pub const KEYWORDS_POSTED: TriggerType = TriggerType(Cow::Borrowed("keywords"));

    /// Add new trigger types here as well as above.
    pub const VALID: [TriggerType; 2] = [Self::NEW_MEMBER_JOINS, Self::KEYWORDS_POSTED];

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        Self::VALID.contains(self)
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TriggerType {
    fn from(value: String) -> Self {
        TriggerType(Cow::Owned(value))
    }
}

impl From<&str> for TriggerType {
    fn from(value: &str) -> Self {
        TriggerType(Cow::Owned(value.to_owned()))
    }
}

impl FromStr for TriggerType {
    type Err = UnknownTypeError;

    /// The empty token decodes to the unset trigger type, anything else must
    /// be one of [`TriggerType::VALID`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(TriggerType::default());
        }
        Self::VALID
            .iter()
            .find(|t| t.as_str() == s)
            .cloned()
            .ok_or_else(|| UnknownTypeError::Trigger(s.to_owned()))
    }
}

/// Whether `action_type` may be fired by `trigger_type`.
pub fn is_permitted_pairing(action_type: ActionType, trigger_type: &TriggerType) -> bool {
    match action_type {
        ActionType::WelcomeMessage | ActionType::CategorizeChannel => {
            *trigger_type == TriggerType::NEW_MEMBER_JOINS
        }
        ActionType::PromptRunPlaybook => *trigger_type == TriggerType::KEYWORDS_POSTED,
        ActionType::Unknown => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WelcomeMessagePayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptRunPlaybookPayload {
    pub keywords: Vec<String>,
    pub playbook_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizeChannelPayload {
    pub category_name: String,
}

/// Type-specific configuration of an action. The variant is selected by the
/// action's [`ActionType`] when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Payload {
    #[default]
    Empty,
    WelcomeMessage(WelcomeMessagePayload),
    PromptRunPlaybook(PromptRunPlaybookPayload),
    CategorizeChannel(CategorizeChannelPayload),
}

impl Payload {
    /// The action type this payload belongs to.
    pub fn action_type(&self) -> ActionType {
        match self {
            Payload::Empty => ActionType::Unknown,
            Payload::WelcomeMessage(_) => ActionType::WelcomeMessage,
            Payload::PromptRunPlaybook(_) => ActionType::PromptRunPlaybook,
            Payload::CategorizeChannel(_) => ActionType::CategorizeChannel,
        }
    }

    /// Decodes `value` using the schema of `action_type`. A null value yields
    /// an empty payload of the right type so that blank fields are reported by
    /// validation rather than here.
    pub fn decode(action_type: ActionType, value: Value) -> Result<Payload, ValidationError> {
        fn typed<T: de::DeserializeOwned + Default>(
            action_type: ActionType,
            value: Value,
        ) -> Result<T, ValidationError> {
            if value.is_null() {
                return Ok(T::default());
            }
            serde_json::from_value(value).map_err(|err| ValidationError::MalformedPayload {
                action_type,
                reason: err.to_string(),
            })
        }

        Ok(match action_type {
            ActionType::Unknown => Payload::Empty,
            ActionType::WelcomeMessage => Payload::WelcomeMessage(typed(action_type, value)?),
            ActionType::PromptRunPlaybook => {
                Payload::PromptRunPlaybook(typed(action_type, value)?)
            }
            ActionType::CategorizeChannel => {
                Payload::CategorizeChannel(typed(action_type, value)?)
            }
        })
    }
}

/// A configured (trigger, effect, payload) tuple scoped to one channel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawChannelAction")]
pub struct ChannelAction {
    pub id: String,
    pub channel_id: String,
    pub enabled: bool,
    pub delete_at: i64,
    pub action_type: ActionType,
    pub trigger_type: TriggerType,
    pub payload: Payload,
}

impl ChannelAction {
    /// A new, enabled action whose type follows from `payload`.
    pub fn new(channel_id: impl Into<String>, trigger_type: TriggerType, payload: Payload) -> Self {
        Self {
            id: String::new(),
            channel_id: channel_id.into(),
            enabled: true,
            delete_at: 0,
            action_type: payload.action_type(),
            trigger_type,
            payload,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.delete_at != 0
    }

    /// Enabled and not soft-deleted.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.is_deleted()
    }
}

#[derive(Deserialize)]
struct RawChannelAction {
    #[serde(default)]
    id: String,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    delete_at: i64,
    #[serde(default)]
    action_type: ActionType,
    #[serde(default)]
    trigger_type: TriggerType,
    #[serde(default)]
    payload: Value,
}

impl TryFrom<RawChannelAction> for ChannelAction {
    type Error = ValidationError;

    fn try_from(raw: RawChannelAction) -> Result<Self, Self::Error> {
        Ok(ChannelAction {
            payload: Payload::decode(raw.action_type, raw.payload)?,
            id: raw.id,
            channel_id: raw.channel_id,
            enabled: raw.enabled,
            delete_at: raw.delete_at,
            action_type: raw.action_type,
            trigger_type: raw.trigger_type,
        })
    }
}
