//! Core functionality for download

pub mod config;
pub mod cookies;
pub mod dispatcher;
pub mod options;
pub mod video_info;

pub use config::*;
pub use cookies::*;
pub use dispatcher::*;
pub use options::*;
pub use video_info::*;
