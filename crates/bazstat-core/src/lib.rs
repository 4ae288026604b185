pub mod config;
pub mod logging;

pub mod aggregate;
pub mod error;
pub mod fetch;
pub mod model;
pub mod prefs;
pub mod session;
