pub mod client;
pub mod error;
pub mod types;

pub use client::SteamClient;
pub use error::SteamError;
