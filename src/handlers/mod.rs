pub mod discord;
pub mod message_sender;
