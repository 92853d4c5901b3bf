use axum::http::Method;
use clap::{Parser, Subcommand};

use request_gate::gate::{KeyPolicy, Reply, RequestGate, StaticApplication};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Client and demo runner for the request gate", long_about = None)]
struct Cli {
    /// Print each reply as a JSON line.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the sample scenario against an in-process gate
    Demo {
        #[arg(long, default_value_t = 2)]
        ceiling: u64,

        #[arg(long, default_value = "path")]
        key_policy: KeyPolicy,
    },
    /// Send requests to a running gate
    Send {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        #[arg(short, long, default_value = "GET")]
        method: Method,

        /// Number of times to send the request.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,

        route: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            ceiling,
            key_policy,
        } => {
            let gate = RequestGate::new(StaticApplication::sample(), ceiling)
                .with_key_policy(key_policy);

            let script = [
                ("/app/status", Method::GET),
                ("/app/status", Method::GET),
                ("/app/status", Method::GET),
                ("/create/user", Method::POST),
            ];
            for (route, method) in script {
                let reply = gate.handle(route, &method);
                print_reply(cli.json, method.as_str(), route, &reply)?;
            }
        }
        Commands::Send {
            url,
            method,
            count,
            route,
        } => {
            let client = reqwest::Client::new();
            let target = format!("{}{}", url.trim_end_matches('/'), route);

            for _ in 0..count {
                let res = client.request(method.clone(), &target).send().await?;
                let reply = Reply::new(res.status().as_u16(), res.text().await?);
                print_reply(cli.json, method.as_str(), &route, &reply)?;
            }
        }
    }

    Ok(())
}

fn print_reply(
    json: bool,
    method: &str,
    route: &str,
    reply: &Reply,
) -> Result<(), serde_json::Error> {
    if json {
        let line = serde_json::json!({
            "method": method,
            "route": route,
            "reply": reply,
        });
        println!("{}", serde_json::to_string(&line)?);
    } else {
        println!("{} {}", method, route);
        println!("  status: {}", reply.status);
        println!("  body:   {}", reply.body);
        println!();
    }
    Ok(())
}
