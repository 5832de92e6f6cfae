use anyhow::Context;
use clap::Parser;
use reqwest::{Client, StatusCode};
use searchfront::{SEARCH_ROUTE, dataset::Document, utils::SEARCH_TERM};
use serde_json::json;

/// Sends one search to a running server and prints what came back.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    search_term: String,

    #[arg(long, default_value = "http://localhost:3000")]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let endpoint = format!("{}{}", args.url.trim_end_matches('/'), SEARCH_ROUTE);
    let response = Client::new()
        .post(&endpoint)
        .json(&json!({ SEARCH_TERM: args.search_term }))
        .send()
        .await
        .with_context(|| format!("Failed to reach {endpoint}"))?;

    let status = response.status();
    let results: Vec<Document> = response.json().await.context("Malformed response body")?;

    println!("Status: {status}");

    if status != StatusCode::OK {
        println!("Search rejected");
        return Ok(());
    }

    println!("Results: {}\n", results.len());

    for result in results {
        println!("{}", result.url);
        println!("{}", result.title);
        println!("{}\n", result.text);
    }

    Ok(())
}
