pub mod config;
pub mod encode;
pub mod expand;
