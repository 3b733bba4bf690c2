use super::string_field;
use crate::error::Result;
use crate::utils::files::{read_json, write_json_pretty};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SUFFIX: &str = "hrz.uni-bielefeld.de";
pub const DEFAULT_PATH: &str = "/robots.txt";
pub const DEFAULT_OUTPUT: &str = "robots_urls.json";
pub const DEFAULT_TIMEOUT_SECS: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Pause after every request
    pub delay: Duration,
    /// Subdomains must end with this to be probed
    pub suffix: String,
    /// Path requested on every kept subdomain
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Status 200
    Found,
    NotFound(StatusCode),
    Error(String),
}

impl ProbeOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ProbeOutcome::Found)
    }
}

#[derive(Debug, Default)]
pub struct ProbeReport {
    pub results: Vec<(String, ProbeOutcome)>,
}

impl ProbeReport {
    /// URLs that answered 200, in probe order
    pub fn found_urls(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, outcome)| outcome.is_found())
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn errors(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, outcome)| matches!(outcome, ProbeOutcome::Error(_)))
            .count()
    }
}

/// Shape of the output file
#[derive(Debug, Serialize)]
struct RobotsOutput<'a> {
    robots_txt_urls: &'a [String],
}

/// Build the URL to probe for one subdomain
///
/// Adds `http://` unless a scheme is present and puts exactly one slash
/// between host and path.
pub fn candidate_url(subdomain: &str, path: &str) -> String {
    let base = if subdomain.starts_with("http://") || subdomain.starts_with("https://") {
        subdomain.to_string()
    } else {
        format!("http://{}", subdomain)
    };

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// URLs for every record whose trimmed `subdomain` ends with `suffix`
pub fn candidate_urls(records: &[Value], suffix: &str, path: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| string_field(record, "subdomain"))
        .map(str::trim)
        .filter(|subdomain| subdomain.ends_with(suffix))
        .map(|subdomain| candidate_url(subdomain, path))
        .collect()
}

/// Request one URL and classify the answer by status code alone
///
/// The client decides timeout and redirect handling; `robots` builds it with
/// redirects disabled so a 301 counts as not found.
pub async fn probe_url(client: &reqwest::Client, url: &str) -> ProbeOutcome {
    match client.get(url).send().await {
        Ok(response) if response.status() == StatusCode::OK => ProbeOutcome::Found,
        Ok(response) => ProbeOutcome::NotFound(response.status()),
        Err(e) => ProbeOutcome::Error(e.to_string()),
    }
}

/// Probe each URL in turn, printing one status line per URL
pub async fn probe_urls(client: &reqwest::Client, urls: &[String], delay: Duration) -> ProbeReport {
    let mut report = ProbeReport::default();

    for url in urls {
        let outcome = probe_url(client, url).await;
        match &outcome {
            ProbeOutcome::Found => println!("{}: {} FOUND", url, StatusCode::OK.as_u16()),
            ProbeOutcome::NotFound(status) => {
                println!("{}: {} NOT_FOUND", url, status.as_u16())
            }
            ProbeOutcome::Error(reason) => {
                println!("{}: ERROR ({})", url, reason);
                tracing::warn!(%url, error = %reason, "probe failed");
            }
        }
        report.results.push((url.clone(), outcome));

        tokio::time::sleep(delay).await;
    }

    report
}

/// Read subdomain records, probe the matching ones and save the hits
pub async fn probe_file(client: &reqwest::Client, config: &ProbeConfig) -> Result<ProbeReport> {
    let records: Vec<Value> = read_json(&config.input)?;
    let urls = candidate_urls(&records, &config.suffix, &config.path);
    tracing::info!(
        records = records.len(),
        candidates = urls.len(),
        suffix = %config.suffix,
        "probing subdomains"
    );

    let report = probe_urls(client, &urls, config.delay).await;
    let found = report.found_urls();

    write_json_pretty(
        &config.output,
        &RobotsOutput {
            robots_txt_urls: &found,
        },
    )?;

    println!(
        "\nWritten {} URLs with robots.txt to {}",
        found.len(),
        config.output.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_host_gets_scheme_and_path() {
        assert_eq!(
            candidate_url("svc.hrz.uni-bielefeld.de", DEFAULT_PATH),
            "http://svc.hrz.uni-bielefeld.de/robots.txt"
        );
    }

    #[test]
    fn existing_scheme_and_slashes_are_respected() {
        assert_eq!(
            candidate_url("https://svc.hrz.uni-bielefeld.de/", DEFAULT_PATH),
            "https://svc.hrz.uni-bielefeld.de/robots.txt"
        );
        assert_eq!(
            candidate_url("http://svc.hrz.uni-bielefeld.de//", "robots.txt"),
            "http://svc.hrz.uni-bielefeld.de/robots.txt"
        );
    }

    #[test]
    fn only_matching_suffixes_become_candidates() {
        let records = json!([
            {"subdomain": " svc.hrz.uni-bielefeld.de "},
            {"subdomain": "www.uni-bielefeld.de"},
            {"subdomain": "hrz.uni-bielefeld.de.example.org"},
            {"ip": "1.2.3.4"},
            {"subdomain": 7},
            "mail.hrz.uni-bielefeld.de"
        ]);
        let urls = candidate_urls(records.as_array().unwrap(), DEFAULT_SUFFIX, DEFAULT_PATH);
        assert_eq!(urls, vec!["http://svc.hrz.uni-bielefeld.de/robots.txt"]);
    }

    #[test]
    fn found_urls_keep_probe_order() {
        let report = ProbeReport {
            results: vec![
                ("http://b/robots.txt".into(), ProbeOutcome::Found),
                (
                    "http://a/robots.txt".into(),
                    ProbeOutcome::NotFound(StatusCode::NOT_FOUND),
                ),
                ("http://c/robots.txt".into(), ProbeOutcome::Error("refused".into())),
                ("http://d/robots.txt".into(), ProbeOutcome::Found),
            ],
        };
        assert_eq!(
            report.found_urls(),
            vec!["http://b/robots.txt", "http://d/robots.txt"]
        );
        assert_eq!(report.errors(), 1);
    }
}
