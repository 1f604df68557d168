use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Inspection CLI for the API gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show gateway status and the route map
    Status,
    /// Check gateway health
    Health,
    /// Send a raw JSON body and show what the gateway captured
    Echo {
        /// Body sent verbatim with Content-Type: application/json
        body: String,
    },
    /// Show how the gateway parsed a request
    Inspect {
        /// Query string appended to /debug/req-info, e.g. "name=Ana"
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Echo { body } => {
            client
                .post(format!("{}/api/debug/raw", base))
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?
        }
        Commands::Inspect { query } => {
            let url = match query {
                Some(q) => format!("{}/debug/req-info?{}", base, q),
                None => format!("{}/debug/req-info", base),
            };
            client.get(url).send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    check_status(status, &text)?;

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Non-2xx answers become errors so the process exits non-zero.
fn check_status(status: StatusCode, body: &str) -> Result<(), String> {
    if status.is_success() {
        Ok(())
    } else {
        Err(format!("gateway returned status {}: {}", status, body))
    }
}
