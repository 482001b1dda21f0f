//! Standalone web server binary
//!
//! Usage: cargo run -p blackjack_web --bin blackjack-web-server

use blackjack_web::{ServerConfig, WebServer};
use std::path::PathBuf;

struct CliArgs {
    host: String,
    port: u16,
    static_dir: Option<PathBuf>,
    scores_path: PathBuf,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: None,
            scores_path: PathBuf::from("db.json"),
        }
    }
}

fn parse_args(args: &[String]) -> CliArgs {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--host" | "-h" => parsed.host = require_value(&mut iter, flag),
            "--port" | "-p" => {
                let value = require_value(&mut iter, flag);
                parsed.port = value.parse().unwrap_or_else(|_| {
                    eprintln!("Error: invalid port number: {value}");
                    std::process::exit(1);
                });
            }
            "--static-dir" | "-d" => {
                parsed.static_dir = Some(PathBuf::from(require_value(&mut iter, flag)));
            }
            "--scores" | "-s" => {
                parsed.scores_path = PathBuf::from(require_value(&mut iter, flag));
            }
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            unknown => {
                eprintln!("Unknown argument: {unknown}");
                print_help();
                std::process::exit(1);
            }
        }
    }

    parsed
}

fn require_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> String {
    match iter.next() {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {flag} requires a value");
            std::process::exit(1);
        }
    }
}

fn resolve_static_dir(requested: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = requested {
        return dir;
    }

    let mut candidates = vec![PathBuf::from("static")];
    if let Ok(current) = std::env::current_dir() {
        candidates.insert(0, current.join("rust").join("web").join("static"));
    }

    match candidates.into_iter().find(|path| path.exists()) {
        Some(found) => found,
        None => {
            eprintln!("Error: could not find a static directory.");
            eprintln!("Tried rust/web/static and static.");
            eprintln!("Please specify one with --static-dir");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    blackjack_web::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args);
    let static_path = resolve_static_dir(cli.static_dir);

    let config = ServerConfig::new(cli.host, cli.port, static_path)
        .with_scoreboard_path(cli.scores_path.clone());

    tracing::info!(
        host = %config.host(),
        port = config.port(),
        static_dir = %config.static_dir().display(),
        scores = %cli.scores_path.display(),
        "starting blackjack web server"
    );

    let server = WebServer::new(config)?;
    let handle = server.start().await?;

    println!("\n✅ Server running at http://{}", handle.address());
    println!("   Press Ctrl+C to stop\n");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    println!("\n🛑 Shutting down...");
    handle.shutdown().await?;
    println!("✅ Server stopped cleanly\n");

    Ok(())
}

fn print_help() {
    println!("Blackjack Web Server");
    println!();
    println!("Usage: blackjack-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>           Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>           Port to bind to (default: 8080)");
    println!("  --static-dir, -d <DIR>      Static files directory");
    println!("  --scores, -s <FILE>         Scoreboard storage file (default: db.json)");
    println!("  --help                      Show this help message");
}
