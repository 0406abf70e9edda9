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

use channel_actions::{
    platform::{LogPlatform, Post},
    service::ChannelActionService,
    settings::Settings,
    telemetry::TracingTelemetry,
};
use channel_actions_common::{
    action::{ActionType, ChannelAction, TriggerType},
    error::ChannelActionError,
    store::GetChannelActionOptions,
};
use channel_actions_store::SqlStore;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_log::AsTrace;

/// Automated reactions to chat channel events
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create the channel action described by a JSON file
    Create { file: PathBuf },
    /// Show a channel action
    Get { id: String },
    /// List the live channel actions of a channel
    List {
        channel: String,
        #[arg(long)]
        action_type: Option<ActionType>,
        #[arg(long)]
        trigger_type: Option<TriggerType>,
    },
    /// Replace a channel action with the JSON file's contents
    Update { file: PathBuf },
    /// Check a JSON channel action without storing it
    Validate { file: PathBuf },
    /// Run the actions of a channel for a user joining it
    Join {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        channel: String,
        /// User who added the member, if any
        #[arg(short, long, default_value = "")]
        actor: String,
    },
    /// Run the actions of a channel for a new post
    Post {
        #[arg(short, long)]
        session: String,
        #[arg(short, long)]
        channel: String,
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        message: String,
        /// Post id, generated when missing
        #[arg(long)]
        id: Option<String>,
    },
    /// Record users as already welcomed to a channel
    MarkViewed {
        #[arg(short, long)]
        channel: String,
        #[arg(short, long, required = true, num_args = 1..)]
        user: Vec<String>,
    },
}

fn read_action(file: &Path) -> Result<ChannelAction, ChannelActionError> {
    let contents = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_json(value: &impl Serialize) -> Result<(), ChannelActionError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// PUBLIC FUNCTION
////////////////////////////////////////////////////////////////////////////////

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ChannelActionError> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.log_level_filter().as_trace())
        .init();

    let settings = Settings::load(args.config.as_deref())?;
    let store = SqlStore::connect(&settings.database_uri()).await?;
    store.migrate().await?;

    let service = ChannelActionService::new(
        Arc::new(store),
        Arc::new(LogPlatform),
        Arc::new(TracingTelemetry),
        &settings,
    );

    match args.command {
        Commands::Migrate => println!("Database is up to date"),
        Commands::Create { file } => {
            let id = service.create(read_action(&file)?).await?;
            println!("{id}");
        }
        Commands::Get { id } => print_json(&service.get(&id).await?)?,
        Commands::List {
            channel,
            action_type,
            trigger_type,
        } => {
            let options = GetChannelActionOptions {
                action_type: action_type.unwrap_or_default(),
                trigger_type: trigger_type.unwrap_or_default(),
            };
            print_json(&service.get_channel_actions(&channel, &options).await?)?;
        }
        Commands::Update { file } => service.update(read_action(&file)?).await?,
        Commands::Validate { file } => {
            service.validate(&read_action(&file)?)?;
            println!("Channel action is valid");
        }
        Commands::Join {
            user,
            channel,
            actor,
        } => service.user_has_joined_channel(&user, &channel, &actor).await,
        Commands::Post {
            session,
            channel,
            user,
            message,
            id,
        } => {
            let post = Post {
                id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                channel_id: channel,
                user_id: user,
                message,
            };
            service.message_has_been_posted(&session, &post).await;
        }
        Commands::MarkViewed { channel, user } => {
            service.set_multiple_viewed_channel(&user, &channel).await?
        }
    }
    Ok(())
}
