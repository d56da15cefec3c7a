//! # Mapbox Agent Demo
//!
//! Loads every tool the hosted Mapbox MCP server advertises, registers the
//! typed geo tools the way an agent framework would, and walks through canned
//! multi-step scenarios by invoking them directly.
//!
//! ## Running
//!
//! ```bash
//! # Set your Mapbox access token (or put it in .env)
//! export MAPBOX_ACCESS_TOKEN=pk.your-token
//!
//! # Run the demo
//! RUST_LOG=mapbox_mcp=debug cargo run -p mapbox-agent-demo
//! ```

use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use geo_tools_core::{ToolContext, ToolError, ToolRegistry};
use mapbox_mcp::{create_mcp_tools, mapbox_tools, MapboxMcpClient, McpError, ACCESS_TOKEN_ENV};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Times Square, New York
const TIMES_SQUARE: [f64; 2] = [-73.9857, 40.7484];
/// Bryant Park, New York
const BRYANT_PARK: [f64; 2] = [-73.9832, 40.7536];
/// Downtown Boston
const BOSTON: [f64; 2] = [-71.0589, 42.3601];
/// Lower Manhattan
const NYC: [f64; 2] = [-74.0060, 40.7128];
/// Office in the SF Financial District
const SF_WORK: [f64; 2] = [-122.4, 37.79];
/// Downtown San Francisco
const SF_DOWNTOWN: [f64; 2] = [-122.4194, 37.7749];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║       🗺️  Mapbox MCP - Geo Tools Demo                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let client = match MapboxMcpClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) if e.is_configuration() => {
            error!("{}", e);
            println!("\n⚠️  Set {} in your environment or .env file.\n", ACCESS_TOKEN_ENV);
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to create Mapbox MCP client"),
    };
    info!("✅ Client ready for {}", client.endpoint());

    discover_remote_tools(&client).await;

    let mut registry = ToolRegistry::new();
    registry.register_all(mapbox_tools(client.clone()));

    println!("\n🔧 Typed geo tools (OpenAI function format):");
    for schema in registry.schemas() {
        println!("{}", serde_json::to_string_pretty(&schema.to_openai_function())?);
    }

    restaurant_finder(&registry).await;
    route_planning(&registry).await;
    property_search(&registry).await;

    Ok(())
}

/// Load every tool the server advertises, namespaced under `mapbox_`.
///
/// Discovery failures are reported and the demo carries on with the typed tools.
async fn discover_remote_tools(client: &Arc<MapboxMcpClient>) {
    println!("🌐 Discovering tools from the Mapbox MCP server");

    let listed = match client.list_tools().await {
        Ok(listed) => listed,
        Err(e) => {
            warn!("Tool discovery failed: {}", e);
            println!("   ⚠️  Could not list remote tools: {}", e);
            return;
        }
    };

    let mut discovered = ToolRegistry::new();
    discovered.register_all(create_mcp_tools(client.clone(), listed, Some("mapbox")));
    info!("✅ {} remote tools registered with 'mapbox_' prefix", discovered.len());

    for schema in discovered.schemas() {
        let description = schema.description.lines().next().unwrap_or("No description");
        println!("   • {} — {}", schema.name, description);
    }
}

/// Find restaurants around Times Square, then measure the walk to Bryant Park.
async fn restaurant_finder(registry: &ToolRegistry) {
    println!("\n🍽️  Scenario: restaurant finder near Times Square");

    run_step(
        registry,
        "search_poi",
        json!({"category": "restaurant", "location": TIMES_SQUARE}),
    )
    .await;

    run_step(
        registry,
        "calculate_distance",
        json!({"from_coords": TIMES_SQUARE, "to_coords": BRYANT_PARK, "units": "miles"}),
    )
    .await;
}

/// Traffic-aware driving time from Boston to New York.
async fn route_planning(registry: &ToolRegistry) {
    println!("\n🚗 Scenario: route planning Boston → New York");

    run_step(
        registry,
        "get_directions",
        json!({"origin": BOSTON, "destination": NYC, "profile": "driving-traffic"}),
    )
    .await;
}

/// Where to live when working downtown in San Francisco.
///
/// The steps are independent, so they fan out concurrently over the shared client.
async fn property_search(registry: &ToolRegistry) {
    println!("\n🏠 Scenario: property search around work in San Francisco");

    let steps = [
        (
            "get_isochrone",
            json!({"location": SF_WORK, "minutes": 30, "profile": "driving"}),
        ),
        (
            "get_isochrone",
            json!({"location": SF_WORK, "minutes": 10, "profile": "walking"}),
        ),
        (
            "search_poi",
            json!({"category": "coffee", "location": SF_WORK}),
        ),
        (
            "calculate_distance",
            json!({"from_coords": SF_WORK, "to_coords": SF_DOWNTOWN, "units": "kilometers"}),
        ),
    ];

    join_all(
        steps
            .into_iter()
            .map(|(name, args)| run_step(registry, name, args)),
    )
    .await;
}

async fn run_step(registry: &ToolRegistry, name: &str, args: Value) {
    match registry.invoke(name, args, ToolContext::new()).await {
        Ok(result) => println!("   ✅ {}: {}", name, result.as_text().unwrap_or("<non-text result>")),
        Err(err) => report_failure(name, &err),
    }
}

/// Each failure kind gets its own remedy; none are retried here.
fn report_failure(name: &str, err: &anyhow::Error) {
    if let Some(tool_err) = err.downcast_ref::<ToolError>() {
        warn!(tool = name, "{}", tool_err);
        println!("   ⚠️  {}: fix the arguments and try again", name);
        return;
    }

    match err.downcast_ref::<McpError>() {
        Some(McpError::Transport { status: Some(401 | 403), .. }) => {
            error!(tool = name, "{}", err);
            println!("   ❌ {}: the access token was rejected", name);
        }
        Some(e @ McpError::Transport { .. }) => {
            error!(tool = name, "{}", e);
            println!("   ❌ {}: the Mapbox MCP endpoint is unreachable, try again later", name);
        }
        Some(McpError::RemoteTool { message, .. }) => {
            warn!(tool = name, "Remote tool failed: {}", message);
            println!("   ⚠️  {}: the tool refused the request: {}", name, message);
        }
        Some(e @ McpError::MalformedResponse(_)) => {
            error!(tool = name, "{}", e);
            println!("   ❌ {}: unexpected response from the server", name);
        }
        Some(e) => {
            error!(tool = name, "{}", e);
            println!("   ❌ {}: {}", name, e);
        }
        None => {
            error!(tool = name, "{:#}", err);
            println!("   ❌ {}: {}", name, err);
        }
    }
}
