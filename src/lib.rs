//! Small tools for collecting the bildwis image archive and surveying the
//! university's subdomains.
//!
//! - [`tools::fetch`]: download numbered images with basic auth
//! - [`tools::normalize`]: turn the database's `bild` field into a list
//! - [`tools::group`]: group subdomain records by IP
//! - [`tools::probe`]: check subdomains for `/robots.txt`

pub mod error;
pub mod logging;
pub mod tools;
pub mod utils;

pub use error::{Error, Result};
