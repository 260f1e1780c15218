pub mod anilist;
pub mod steam;
