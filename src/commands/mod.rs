pub mod branch;
pub mod context;
pub mod error;
pub mod issue;
pub mod pr;
mod render;
