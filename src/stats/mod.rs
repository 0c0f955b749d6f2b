pub mod calculator;
pub mod handlers;
pub mod models;
pub mod service;

pub use calculator::*;
pub use handlers::*;
pub use models::*;
