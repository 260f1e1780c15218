pub mod closer;
pub mod compare;
pub mod config;
pub mod error;
pub mod format;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod profile;
pub mod recommend;
pub mod sync;
pub mod watchlist;
pub mod watchtime;

pub use error::SenpaiError;
