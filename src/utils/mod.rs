//! Utility modules shared by the tools
//!
//! - `files`: directory creation and JSON reading/writing
//! - `http`: HTTP client construction
//! - `images`: sanity checks for downloaded images

pub mod files;
pub mod http;
pub mod images;
