//! Basic usage example for sectconf
//!
//! This example parses a small configuration both into a generic document
//! and into typed structs.

use serde::Deserialize;
use sectconf::{ConfError, Value, from_str, parse};

#[derive(Debug, Deserialize)]
struct ServerConfig {
    host: String,
    ports: Vec<u16>,
    name: f64,
}

#[derive(Debug, Deserialize)]
struct AppConfig {
    server: ServerConfig,
}

fn main() -> Result<(), ConfError> {
    let text = r#"[server]
host = "localhost"
ports = [80, 443]
# comment line
name=42
"#;

    let document = parse(text)?;
    println!("Parsed document: {document}");

    for (section, settings) in document.sections() {
        println!("[{section}]");
        for (key, value) in settings {
            let kind = match value {
                Value::List(items) => format!("list of {}", items.len()),
                other => other.type_name().to_string(),
            };
            println!("  {key} = {value} ({kind})");
        }
    }

    let config: AppConfig = from_str(text)?;
    println!(
        "Server {} (#{}) listening on {:?}",
        config.server.host, config.server.name, config.server.ports
    );

    match parse("[server\nhost = \"localhost\"\n") {
        Ok(_) => println!("unexpectedly parsed a malformed header"),
        Err(e) => println!("Malformed input rejected: {e}"),
    }

    Ok(())
}
