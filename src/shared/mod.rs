pub mod config;
pub mod dirs;
pub mod editor;
pub mod output;
pub mod progress;
pub mod table;
pub mod time;
