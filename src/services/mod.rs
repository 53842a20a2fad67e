pub mod channels;
pub mod embed;
pub mod feeds;
pub mod memo;
pub mod progress;
pub mod sections;
pub mod storage;
pub mod tmdb;
