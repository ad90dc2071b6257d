pub mod client;
pub mod config;
pub mod error;
pub mod pager;
pub mod prefs;
pub mod record;
pub mod tags;
pub mod ui;
pub mod viewer;

pub use error::{Error, Result};
