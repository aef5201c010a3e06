pub mod common;
pub mod health;
pub mod message;
pub mod network;
pub mod notification;
pub mod post;
pub mod user;

#[cfg(test)]
mod test;
