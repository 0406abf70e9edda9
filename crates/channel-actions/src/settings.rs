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
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

pub const ENV_PREFIX: &str = "CHANNEL_ACTIONS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the SQLite database file
    pub database: String,
    /// Upper bound for a single store call, in milliseconds
    pub store_timeout_ms: u64,
    /// Upper bound for delivering a single effect, in milliseconds
    pub effect_timeout_ms: u64,
    /// Skip welcome messages for users added by someone else
    pub suppress_welcome_on_invite: bool,
    /// Serialize the welcome check per (user, channel)
    pub serialize_joins: bool,
    /// How many (post, action) pairs to remember against redelivery; 0 disables
    pub post_dedup_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let database = ProjectDirs::from("tech", "throneless", "channel-actions")
            .map(|dirs| dirs.data_dir().join("channel_actions.sqlite"))
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| "channel_actions.sqlite".to_owned());

        Self {
            database,
            store_timeout_ms: 5_000,
            effect_timeout_ms: 10_000,
            suppress_welcome_on_invite: false,
            serialize_joins: false,
            post_dedup_capacity: 0,
        }
    }
}

impl Settings {
    /// Defaults, overridden by the TOML file at `path` when given, overridden
    /// by `CHANNEL_ACTIONS_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file_exact(path));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)).extract()?)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn effect_timeout(&self) -> Duration {
        Duration::from_millis(self.effect_timeout_ms)
    }

    /// Connection URI for the configured database, created when missing.
    pub fn database_uri(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;

    #[test]
    fn it_should_load_defaults() {
        Jail::expect_with(|_| {
            let settings = Settings::load(None).unwrap();
            assert_eq!(settings.store_timeout(), Duration::from_secs(5));
            assert!(!settings.serialize_joins);
            assert_eq!(settings.post_dedup_capacity, 0);
            Ok(())
        });
    }

    #[test]
    fn it_should_layer_file_and_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "database = \"/tmp/actions.sqlite\"\nserialize_joins = true\nstore_timeout_ms = 250"
        )
        .unwrap();

        Jail::expect_with(|jail| {
            jail.set_env("CHANNEL_ACTIONS_STORE_TIMEOUT_MS", "100");
            let settings = Settings::load(Some(file.path())).unwrap();
            assert_eq!(settings.database, "/tmp/actions.sqlite");
            assert!(settings.serialize_joins);
            assert_eq!(settings.store_timeout(), Duration::from_millis(100));
            assert_eq!(
                settings.database_uri(),
                "sqlite:///tmp/actions.sqlite?mode=rwc"
            );
            Ok(())
        });
    }

    #[test]
    fn it_should_fail_on_missing_file() {
        assert!(Settings::load(Some(Path::new("/nonexistent/channel-actions.toml"))).is_err());
    }
}
