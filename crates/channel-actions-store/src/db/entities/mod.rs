pub mod prelude;

pub mod channel_action;
pub mod viewed_channel;
