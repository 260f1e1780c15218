pub mod add;
pub mod auth;
pub mod closer;
pub mod compare;
pub mod help;
pub mod kirby;
pub mod recent;
pub mod search;
pub mod stats;
pub mod steam;
pub mod sync;
pub mod time;
