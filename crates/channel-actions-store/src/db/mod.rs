pub mod channel_action;
pub mod entities;
pub mod migration;
pub mod viewed_channel;
