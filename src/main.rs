use bildwis::tools::{fetch, group, normalize, probe};
use bildwis::utils::http::{build_client, parse_seconds, parse_timeout, seconds, ClientOptions};
use bildwis::{logging, Error};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tools for downloading the bildwis image archive and surveying subdomains
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download a sequence of images following a numeric filename scheme
    Fetch {
        /// Base URL for images (a trailing slash is added if missing)
        #[arg(short, long, default_value = fetch::DEFAULT_BASE_URL)]
        base_url: String,

        /// Last image number to download (inclusive)
        #[arg(short = 'n', long, default_value_t = fetch::DEFAULT_COUNT)]
        count: u32,

        /// First image number to download
        #[arg(short, long, default_value_t = fetch::DEFAULT_START)]
        start: u32,

        /// Directory where downloaded images will be saved
        #[arg(short, long, default_value = "images")]
        output: PathBuf,

        /// Delay in seconds after each download request
        #[arg(short, long, default_value_t = 1.0, value_parser = parse_seconds)]
        delay: f64,

        /// Authorization header value (Basic ...)
        #[arg(short, long, default_value = fetch::DEFAULT_AUTH)]
        auth: String,

        /// Timeout in seconds for each request (no timeout if omitted)
        #[arg(short, long, value_parser = parse_timeout)]
        timeout: Option<f64>,

        /// Do not request images that already exist in the output directory
        #[arg(long, default_value_t = false)]
        skip_existing: bool,

        /// Only save responses that decode as an image
        #[arg(long, default_value_t = false)]
        verify: bool,
    },
    /// Rewrite the database so every `bild` field is a list
    FixDb {
        /// Database to read (left untouched)
        #[arg(short, long, default_value = normalize::DEFAULT_INPUT)]
        input: PathBuf,

        /// Where to write the fixed database
        #[arg(short, long, default_value = normalize::DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Field to normalize on each entry
        #[arg(short, long, default_value = normalize::DEFAULT_FIELD)]
        field: String,
    },
    /// Group subdomains by IP address from a JSON file
    Group {
        /// JSON file with subdomain entries (list of objects with `subdomain` and `ip`)
        input: PathBuf,

        /// Optional output file for the grouped JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check subdomains for the presence of /robots.txt
    Robots {
        /// JSON file with subdomain entries (list of objects with `subdomain`)
        input: PathBuf,

        /// Output JSON file for URLs where the path answered 200
        #[arg(short, long, default_value = probe::DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Delay in seconds between requests
        #[arg(short, long, default_value_t = 1.0, value_parser = parse_seconds)]
        delay: f64,

        /// Timeout in seconds for each request
        #[arg(short, long, default_value_t = probe::DEFAULT_TIMEOUT_SECS, value_parser = parse_timeout)]
        timeout: f64,

        /// Only subdomains ending with this suffix are checked
        #[arg(long, default_value = probe::DEFAULT_SUFFIX)]
        suffix: String,

        /// Path requested on each subdomain
        #[arg(long, default_value = probe::DEFAULT_PATH)]
        path: String,
    },
}

#[tokio::main]
async fn main() {
    logging::init_logging();
    let args = Args::parse();

    if let Err(e) = run(args.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), Error> {
    match command {
        Commands::Fetch {
            base_url,
            count,
            start,
            output,
            delay,
            auth,
            timeout,
            skip_existing,
            verify,
        } => {
            println!("Base URL: {}", base_url);
            println!("Images: {:03}..={:03}", start, count);
            println!("Output: {}", output.display());

            let client = build_client(&ClientOptions {
                timeout: timeout.map(seconds),
                follow_redirects: true,
            })?;
            let config = fetch::FetchConfig {
                base_url,
                start,
                count,
                output,
                delay: seconds(delay),
                auth,
                skip_existing,
                verify,
            };

            let report = fetch::fetch_images(&client, &config).await?;

            println!("\nDownloaded {} images", report.downloaded());
            if report.skipped() > 0 {
                println!("Skipped {} images (already existed)", report.skipped());
            }
            if report.failed() > 0 {
                eprintln!("Warning: {} downloads failed", report.failed());
            }
        }
        Commands::FixDb {
            input,
            output,
            field,
        } => {
            let config = normalize::NormalizeConfig {
                input,
                output,
                field,
            };
            let report = normalize::normalize_file(&config)?;
            println!(
                "Normalized {} entries ({} split, {} set to empty, {} already lists)",
                report.entries, report.split, report.defaulted, report.unchanged
            );
            println!("The updated file was saved to: {}", config.output.display());
        }
        Commands::Group { input, output } => {
            group::group_file(&group::GroupConfig { input, output })?;
        }
        Commands::Robots {
            input,
            output,
            delay,
            timeout,
            suffix,
            path,
        } => {
            let client = build_client(&ClientOptions {
                timeout: Some(seconds(timeout)),
                follow_redirects: false,
            })?;
            let config = probe::ProbeConfig {
                input,
                output,
                delay: seconds(delay),
                suffix,
                path,
            };
            probe::probe_file(&client, &config).await?;
        }
    }

    Ok(())
}
