pub mod add;
pub mod comment;
pub mod config;
pub mod context;
pub mod coords;
pub mod import;
pub mod list;
pub mod log;
pub mod photo;
pub mod report;
pub mod stats;
pub mod timeline;
pub mod timestamp;
pub mod upsert;
