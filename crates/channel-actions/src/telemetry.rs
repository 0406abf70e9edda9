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

use channel_actions_common::action::ChannelAction;
use tracing::info;

/// Sink for usage events. Fire-and-forget: implementations swallow their own
/// failures.
pub trait ChannelActionTelemetry: Send + Sync {
    /// Tracks the execution of `action`, initiated by `user_id`.
    fn run_channel_action(&self, action: &ChannelAction, user_id: &str);
}

pub struct TracingTelemetry;

impl ChannelActionTelemetry for TracingTelemetry {
    fn run_channel_action(&self, action: &ChannelAction, user_id: &str) {
        info!(
            target: "telemetry",
            action_id = %action.id,
            action_type = %action.action_type,
            trigger_type = %action.trigger_type,
            channel_id = %action.channel_id,
            %user_id,
            "channel_action"
        );
    }
}
