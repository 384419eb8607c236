use clap::Parser;
use hostprefix_core::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build one request with a host prefix and print where it would go.
#[derive(Parser, Debug)]
#[command(name = "hostprefix-demo", version)]
struct Args {
    /// Endpoint URL, e.g. https://control.us-west-2.example.com
    #[arg(long)]
    endpoint: String,

    /// Prefix template, e.g. "{AccountId}."
    #[arg(long)]
    prefix: String,

    /// Label value as name=value (repeatable)
    #[arg(long = "label", value_parser = parse_label)]
    labels: Vec<(String, String)>,

    /// Host header to declare instead of the dial host
    #[arg(long)]
    header_host: Option<String>,

    /// Skip host prefix injection
    #[arg(long)]
    disable_host_prefix: bool,

    /// JSON request config file; command line flags override it
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn parse_label(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{s}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hostprefix=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RequestConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => RequestConfig::default(),
    };
    if args.disable_host_prefix {
        config = config.with_disable_host_prefix_injection(true);
    }

    let mut req = OutgoingRequest::new("Demo", http::Method::GET, &args.endpoint)?
        .with_config(config);
    if let Some(host) = args.header_host {
        req = req.with_header_host(host);
    }

    let labels: LabelSet = args.labels.into_iter().collect();
    let mut handlers = BuildHandlers::new();
    handlers.push_back(host_prefix_handler(args.prefix, move || labels.clone()));
    handlers.push_back(ValidateEndpointHostHandler);
    handlers.run(&mut req)?;

    tracing::info!(handlers = ?handlers, "request built");
    println!("url:  {}", req.url()?);
    println!("host: {}", req.effective_host());
    Ok(())
}
