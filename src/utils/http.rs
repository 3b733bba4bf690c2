use crate::error::Result;
use reqwest::redirect;
use std::time::Duration;

/// Options for the single client each run shares across its requests
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Total per-request timeout; `None` leaves reqwest's unbounded default
    pub timeout: Option<Duration>,
    /// Follow redirects (reqwest's default policy) or return 3xx responses as-is
    pub follow_redirects: bool,
}

/// Build the HTTP client for one run
pub fn build_client(options: &ClientOptions) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(get_user_agent());

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if !options.follow_redirects {
        builder = builder.redirect(redirect::Policy::none());
    }

    Ok(builder.build()?)
}

/// Convert a delay or timeout given in (possibly fractional) seconds
pub fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

/// Clap parser for delays: a finite, non-negative number of seconds
pub fn parse_seconds(value: &str) -> std::result::Result<f64, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("`{}` must be a finite, non-negative number of seconds", value));
    }
    Ok(secs)
}

/// Clap parser for timeouts: like [`parse_seconds`] but zero is refused
pub fn parse_timeout(value: &str) -> std::result::Result<f64, String> {
    let secs = parse_seconds(value)?;
    if secs == 0.0 {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(secs)
}

/// Get standard user agent string
pub fn get_user_agent() -> &'static str {
    concat!("bildwis-tools/", env!("CARGO_PKG_VERSION"))
}
