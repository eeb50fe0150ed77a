pub mod config;
pub mod events_file;
