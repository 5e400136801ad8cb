pub mod about;
pub mod auth;
pub mod body;
pub mod featured;
pub mod media;
pub mod papers;
pub mod posts;
pub mod settings;
pub mod slug;
