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

use crate::action::{ActionType, ChannelAction, Payload, is_permitted_pairing};
use crate::error::ValidationError;

/// Checks that the action type, trigger type and payload of `action` are all
/// valid and consistent with each other. The first failing rule is reported.
pub fn validate(action: &ChannelAction) -> Result<(), ValidationError> {
    if !action.action_type.is_set() {
        return Err(ValidationError::MissingActionType);
    }

    if !action.trigger_type.is_valid() {
        return Err(ValidationError::InvalidTriggerType(
            action.trigger_type.to_string(),
        ));
    }

    if !is_permitted_pairing(action.action_type, &action.trigger_type) {
        return Err(ValidationError::InvalidPairing {
            action_type: action.action_type,
            trigger_type: action.trigger_type.to_string(),
        });
    }

    validate_payload(action.action_type, &action.payload)
}

fn validate_payload(action_type: ActionType, payload: &Payload) -> Result<(), ValidationError> {
    if payload.action_type() != action_type {
        return Err(ValidationError::PayloadMismatch(action_type));
    }

    match payload {
        Payload::Empty => Err(ValidationError::PayloadMismatch(action_type)),
        Payload::WelcomeMessage(payload) => {
            if is_blank(&payload.message) {
                return Err(ValidationError::BlankField("message"));
            }
            Ok(())
        }
        Payload::PromptRunPlaybook(payload) => {
            if !payload.keywords.iter().any(|k| has_words(k)) {
                return Err(ValidationError::BlankField("keywords"));
            }
            if is_blank(&payload.playbook_id) {
                return Err(ValidationError::BlankField("playbook_id"));
            }
            Ok(())
        }
        Payload::CategorizeChannel(payload) => {
            if is_blank(&payload.category_name) {
                return Err(ValidationError::BlankField("category_name"));
            }
            Ok(())
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// A keyword matches posts word by word, so one made only of punctuation
/// and whitespace could never fire.
fn has_words(keyword: &str) -> bool {
    keyword.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{
        CategorizeChannelPayload, PromptRunPlaybookPayload, TriggerType, WelcomeMessagePayload,
    };

    fn welcome(message: &str) -> ChannelAction {
        ChannelAction::new(
            "channel",
            TriggerType::NEW_MEMBER_JOINS,
            Payload::WelcomeMessage(WelcomeMessagePayload {
                message: message.into(),
            }),
        )
    }

    fn prompt(keywords: &[&str], playbook_id: &str) -> ChannelAction {
        ChannelAction::new(
            "channel",
            TriggerType::KEYWORDS_POSTED,
            Payload::PromptRunPlaybook(PromptRunPlaybookPayload {
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                playbook_id: playbook_id.into(),
            }),
        )
    }

    fn categorize(category_name: &str) -> ChannelAction {
        ChannelAction::new(
            "channel",
            TriggerType::NEW_MEMBER_JOINS,
            Payload::CategorizeChannel(CategorizeChannelPayload {
                category_name: category_name.into(),
            }),
        )
    }

    #[test]
    fn accepts_well_formed_actions() {
        assert_eq!(validate(&welcome("Welcome aboard")), Ok(()));
        assert_eq!(validate(&prompt(&["bug", "crash"], "P1")), Ok(()));
        assert_eq!(validate(&categorize("Incidents")), Ok(()));
    }

    #[test]
    fn rejects_unknown_action_type_whatever_the_rest() {
        for trigger_type in TriggerType::VALID
            .into_iter()
            .chain([TriggerType::default(), TriggerType::from("nonsense")])
        {
            for payload in [
                Payload::Empty,
                welcome("hi").payload,
                prompt(&["bug"], "P1").payload,
            ] {
                let action = ChannelAction {
                    action_type: ActionType::Unknown,
                    trigger_type: trigger_type.clone(),
                    payload,
                    ..Default::default()
                };
                assert_eq!(validate(&action), Err(ValidationError::MissingActionType));
            }
        }
    }

    #[test]
    fn rejects_invalid_trigger_type() {
        let mut action = welcome("hi");
        action.trigger_type = TriggerType::from("channel_archived");
        assert_eq!(
            validate(&action),
            Err(ValidationError::InvalidTriggerType("channel_archived".into()))
        );
    }

    #[test]
    fn rejects_every_unpermitted_pairing() {
        for action_type in ActionType::CONFIGURABLE {
            for trigger_type in TriggerType::VALID {
                if is_permitted_pairing(action_type, &trigger_type) {
                    continue;
                }
                let mut action = match action_type {
                    ActionType::WelcomeMessage => welcome("hi"),
                    ActionType::PromptRunPlaybook => prompt(&["bug"], "P1"),
                    ActionType::CategorizeChannel => categorize("Incidents"),
                    ActionType::Unknown => unreachable!(),
                };
                action.trigger_type = trigger_type.clone();
                assert!(matches!(
                    validate(&action),
                    Err(ValidationError::InvalidPairing { .. })
                ));
            }
        }
    }

    #[test]
    fn rejects_payload_of_another_type() {
        let mut action = welcome("hi");
        action.payload = categorize("Incidents").payload;
        assert_eq!(
            validate(&action),
            Err(ValidationError::PayloadMismatch(ActionType::WelcomeMessage))
        );

        action.payload = Payload::Empty;
        assert_eq!(
            validate(&action),
            Err(ValidationError::PayloadMismatch(ActionType::WelcomeMessage))
        );
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            validate(&welcome("   ")),
            Err(ValidationError::BlankField("message"))
        );
        assert_eq!(
            validate(&prompt(&[], "P1")),
            Err(ValidationError::BlankField("keywords"))
        );
        assert_eq!(
            validate(&prompt(&["", " "], "P1")),
            Err(ValidationError::BlankField("keywords"))
        );
        assert_eq!(
            validate(&prompt(&["!!", " ... "], "P1")),
            Err(ValidationError::BlankField("keywords"))
        );
        assert_eq!(validate(&prompt(&["!!", "bug?"], "P1")), Ok(()));
        assert_eq!(
            validate(&prompt(&["bug"], "")),
            Err(ValidationError::BlankField("playbook_id"))
        );
        assert_eq!(
            validate(&categorize("\t")),
            Err(ValidationError::BlankField("category_name"))
        );
    }

    #[test]
    fn first_failure_wins() {
        let mut action = prompt(&[], "");
        action.trigger_type = TriggerType::NEW_MEMBER_JOINS;
        assert!(matches!(
            validate(&action),
            Err(ValidationError::InvalidPairing { .. })
        ));
    }
}
