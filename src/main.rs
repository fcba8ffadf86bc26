// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! hxclient CLI
//!
//! Small front end over the library: fetch a URL, perform a JSONP call, or
//! parse a raw header block.

use std::env;
use std::io::Read;
use std::process::ExitCode;

use hxclient::{Headers, HttpClient, HttpClientBuilder, HttpClientConfig, HttpResponse};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hxclient=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" => {
            if args.len() < 3 {
                eprintln!("Usage: hxclient fetch <url>");
                return ExitCode::from(1);
            }
            fetch_url(&args[2]).await
        }
        "jsonp" => {
            if args.len() < 3 {
                eprintln!("Usage: hxclient jsonp <url> [callback-param]");
                return ExitCode::from(1);
            }
            let param = args.get(3).map(String::as_str).unwrap_or("callback");
            fetch_jsonp(&args[2], param).await
        }
        "headers" => parse_headers(),
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("hxclient {}", hxclient::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"hxclient - Interceptor-driven HTTP client

USAGE:
    hxclient <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>                     Fetch a URL and display status and headers
    jsonp <url> [callback-param]    Perform a JSONP request (default param: callback)
    headers                         Parse a raw header block from stdin
    help                            Show this help message
    version                         Show version information

ENVIRONMENT:
    HXCLIENT_CONFIG                 Path to a JSON client configuration
    RUST_LOG                        Log filter (e.g. hxclient=debug)

EXAMPLES:
    hxclient fetch https://example.com
    hxclient jsonp "https://example.com/api/data" cb
    printf 'Content-Type: text/html\nVary: Accept\n' | hxclient headers
"#
    );
}

fn build_client(jsonp: bool) -> hxclient::Result<HttpClient> {
    let config = match env::var("HXCLIENT_CONFIG") {
        Ok(path) => HttpClientConfig::from_file(path)?,
        Err(_) => HttpClientConfig::default(),
    };

    let builder = HttpClientBuilder::from_config(config.log_requests(true));
    let builder = if jsonp { builder.jsonp_support() } else { builder };
    builder.no_xsrf_protection().build()
}

fn print_response(response: &HttpResponse) {
    println!("\n=== Response ===");
    println!("Status: {} {}", response.status_code(), response.status_text);
    if let Some(ref url) = response.url {
        println!("URL: {}", url);
    }
    println!("Size: {} bytes", response.body_len());

    if !response.headers.is_empty() {
        println!("\n=== Headers ({}) ===", response.headers.len());
        print!("{}", response.headers);
    }
}

async fn fetch_url(url: &str) -> ExitCode {
    println!("Fetching: {}", url);

    let client = match build_client(false) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return ExitCode::from(1);
        }
    };

    match client.get(url).await {
        Ok(response) => {
            print_response(&response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to fetch URL: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn fetch_jsonp(url: &str, callback_param: &str) -> ExitCode {
    println!("JSONP: {}", url);

    let client = match build_client(true) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return ExitCode::from(1);
        }
    };

    match client.jsonp(url, callback_param).await {
        Ok(response) => {
            print_response(&response);
            println!("\n=== Payload ===");
            println!("{}", response.text_lossy());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("JSONP request failed: {}", e);
            ExitCode::from(1)
        }
    }
}

fn parse_headers() -> ExitCode {
    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        eprintln!("Failed to read stdin: {}", e);
        return ExitCode::from(1);
    }

    let headers = Headers::parse(raw);
    if headers.is_empty() {
        println!("No headers found");
        return ExitCode::SUCCESS;
    }

    println!("=== Headers ({}) ===", headers.len());
    headers.for_each(|name, values| {
        if values.len() == 1 {
            println!("  {}: {}", name, values[0]);
        } else {
            println!("  {} ({} values)", name, values.len());
            for value in values {
                println!("    - {}", value);
            }
        }
    });

    ExitCode::SUCCESS
}
