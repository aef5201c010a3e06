pub mod health;
pub mod messages;
pub mod network;
pub mod notifications;
pub mod posts;
pub mod server;
pub mod users;
