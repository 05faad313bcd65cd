//! CLI command implementations

use anyhow::Context;
use clap::Subcommand;
use locsearch_core::{LocationRecord, LocationSearchClient, SearchClientConfig, SearchQuery};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search locations and print the matching records as JSON
    Search {
        /// Value for the `:id` path segment
        #[arg(long)]
        id: Option<String>,
        /// Search text sent as the `query` parameter
        #[arg(short, long)]
        query: Option<String>,
        /// Extra query-string parameter as KEY=VALUE (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Print the request URL without sending it
        #[arg(long)]
        dry_run: bool,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns the underlying search error with request context attached
pub async fn handle_command(
    command: Commands,
    config: &SearchClientConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Search {
            id,
            query,
            params,
            dry_run,
        } => search(config, build_query(id, query, params), dry_run).await,
    }
}

/// Run one search and print the result
///
/// # Errors
/// - Invalid base URL in configuration
/// - Transport, HTTP status, or decoding failure from the search endpoint
pub async fn search(
    config: &SearchClientConfig,
    query: SearchQuery,
    dry_run: bool,
) -> anyhow::Result<()> {
    let client = LocationSearchClient::from_config(config)
        .with_context(|| format!("Invalid search configuration for {}", config.base_url))?;

    if dry_run {
        println!("{}", describe_request(&client, &query)?);
        return Ok(());
    }

    let records = client
        .query(&query)
        .await
        .with_context(|| format!("Location search against {} failed", client.base_url()))?;

    tracing::info!("Found {} locations", records.len());
    println!("{}", render_records(&records)?);

    Ok(())
}

fn build_query(
    id: Option<String>,
    query: Option<String>,
    params: Vec<(String, String)>,
) -> SearchQuery {
    let mut search = SearchQuery::new();

    if let Some(id) = id {
        search = search.with_id(id);
    }
    if let Some(text) = query {
        search = search.with_query(text);
    }
    for (key, value) in params {
        search = search.with_param(key, value);
    }

    search
}

/// Request line a search would send, e.g. `GET http://host/api/_search/locations/42`
fn describe_request(
    client: &LocationSearchClient,
    query: &SearchQuery,
) -> locsearch_core::Result<String> {
    Ok(format!("GET {}", client.endpoint_url(query)?))
}

fn render_records(records: &[LocationRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Parse a KEY=VALUE pair
fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }

    Ok((key.to_string(), value.to_string()))
}
