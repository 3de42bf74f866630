pub mod auth;
pub mod config;
pub mod error;
pub mod html;
pub mod middleware;
pub mod server;
pub mod session;
pub mod storage;
pub mod utils;

pub use server::Server;
