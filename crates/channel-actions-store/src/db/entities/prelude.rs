pub use super::channel_action::Entity as ChannelAction;
pub use super::viewed_channel::Entity as ViewedChannel;
