use super::string_field;
use crate::error::Result;
use crate::utils::files::{read_json, write_json_pretty};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt::Write;
use std::path::PathBuf;

/// IP address → subdomains, both in first-seen order
pub type IpGroups = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

/// Group subdomains by the IP they resolve to
///
/// Records without a non-empty `ip` string or whose `subdomain` is empty
/// after trimming are ignored.
pub fn group_by_ip(records: &[Value]) -> IpGroups {
    let mut groups = IpGroups::new();

    for record in records {
        let ip = string_field(record, "ip").filter(|ip| !ip.is_empty());
        let subdomain = string_field(record, "subdomain")
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if let (Some(ip), Some(subdomain)) = (ip, subdomain) {
            groups
                .entry(ip.to_string())
                .or_default()
                .push(subdomain.to_string());
        }
    }

    groups
}

/// Console listing: one `ip:` header per group, one `  - subdomain` per member,
/// a blank line after each group
pub fn render_groups(groups: &IpGroups) -> String {
    let mut out = String::new();
    for (ip, subdomains) in groups {
        let _ = writeln!(out, "{}:", ip);
        for subdomain in subdomains {
            let _ = writeln!(out, "  - {}", subdomain);
        }
        out.push('\n');
    }
    out
}

/// Group the records of `config.input`, optionally save the grouping, and
/// print it
pub fn group_file(config: &GroupConfig) -> Result<IpGroups> {
    let records: Vec<Value> = read_json(&config.input)?;
    let groups = group_by_ip(&records);
    tracing::debug!(
        records = records.len(),
        groups = groups.len(),
        "grouped subdomains"
    );

    if let Some(output) = &config.output {
        write_json_pretty(output, &groups)?;
        println!("Grouped data written to {}", output.display());
    }

    print!("{}", render_groups(&groups));
    Ok(groups)
}
