pub mod config;
pub mod interval;
pub mod sequence;
mod session;
