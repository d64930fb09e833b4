use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Inspect the route table of a running news router", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server status
    Status,
    /// List the route table
    Routes,
    /// Resolve a path to a route
    Resolve {
        /// Path to resolve, e.g. /article/42
        path: String,
    },
    /// Build the href for a named route
    Href {
        /// Route name, e.g. ArticleDetail
        name: String,
        /// Route parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/_router", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/status", api)).send().await?,
        Commands::Routes => client.get(format!("{}/routes", api)).send().await?,
        Commands::Resolve { path } => {
            client
                .get(format!("{}/resolve", api))
                .query(&[("path", path)])
                .send()
                .await?
        }
        Commands::Href { name, params } => {
            let mut query = vec![("name".to_string(), name)];
            query.extend(params);
            client
                .get(format!("{}/href", api))
                .query(&query)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: router API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
