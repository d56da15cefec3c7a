//! End-to-end tests against a local HTTP server standing in for the hosted endpoint.

use std::sync::Arc;

use geo_tools_core::{ToolContext, ToolInvocation, ToolRegistry};
use mapbox_mcp::{create_mcp_tools, mapbox_tools, MapboxMcpClient, McpClientConfig, McpError};
use mockito::{Matcher, Server};
use serde_json::json;

const TOKEN: &str = "pk.test-token";

fn client_for(server: &Server) -> MapboxMcpClient {
    let config = McpClientConfig::new(TOKEN)
        .unwrap()
        .with_endpoint(format!("{}/mcp", server.url()));
    MapboxMcpClient::with_config(config).unwrap()
}

fn text_result(id: u64, text: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {"content": [{"type": "text", "text": text}]}
    })
    .to_string()
}

#[tokio::test]
async fn test_call_tool_returns_first_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/mcp")
        .match_header("authorization", "Bearer pk.test-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "distance_tool", "arguments": {"from": [-74.0, 40.71]}}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_result(1, "42 miles"))
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client
        .call_tool("distance_tool", json!({"from": [-74.0, 40.71]}))
        .await
        .unwrap();

    assert_eq!(text, "42 miles");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_error_surfaces_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/mcp")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"unknown tool"}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .call_tool("teleport_tool", json!({}))
        .await
        .unwrap_err();

    match err {
        McpError::RemoteTool { code, message } => {
            assert_eq!(code, Some(-32601));
            assert_eq!(message, "unknown tool");
        }
        other => panic!("expected remote tool error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_500_is_transport_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/mcp")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create_async()
        .await;

    let err = client_for(&server)
        .call_tool("directions_tool", json!({}))
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("upstream exploded"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_object_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/mcp")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let err = client_for(&server)
        .call_tool("distance_tool", json!({}))
        .await
        .unwrap_err();
    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_event_stream_response() {
    let mut server = Server::new_async().await;
    let body = format!("event: message\ndata: {}\n\n", text_result(1, "3.1"));
    server
        .mock("POST", "/mcp")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let text = client_for(&server)
        .call_tool("distance_tool", json!({}))
        .await
        .unwrap();
    assert_eq!(text, "3.1");
}

#[test]
fn test_blank_credential_fails_before_any_transport() {
    let err = MapboxMcpClient::resolve(Some(String::new()), |_| None).unwrap_err();
    assert!(err.is_configuration());
    assert!(!err.is_transport());

    let err = McpClientConfig::resolve(None, |_| Some("   ".to_string())).unwrap_err();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn test_geo_tool_through_registry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({
            "params": {
                "name": "distance_tool",
                "arguments": {"from": [-74.006, 40.7128], "to": [-73.9857, 40.7484], "units": "kilometers"}
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_result(1, "4.4"))
        .create_async()
        .await;

    let client = Arc::new(client_for(&server));
    let mut registry = ToolRegistry::new();
    registry.register_all(mapbox_tools(client));

    let result = registry
        .handle(ToolInvocation {
            tool_name: "calculate_distance".to_string(),
            args: json!({
                "from_coords": [-74.006, 40.7128],
                "to_coords": [-73.9857, 40.7484],
                "units": "km"
            }),
            tool_call_id: Some("call_42".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(result.as_text(), Some("4.4 kilometers"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let mut server = Server::new_async().await;
    // ids are assigned per call, so answer without echoing one
    server
        .mock("POST", "/mcp")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","result":{"content":[{"type":"text","text":"ok"}]}}"#)
        .expect(4)
        .create_async()
        .await;

    let client = Arc::new(client_for(&server));
    let mut registry = ToolRegistry::new();
    registry.register_all(mapbox_tools(client));

    let calls = (0..4).map(|_| {
        registry.invoke(
            "search_poi",
            json!({"category": "coffee", "location": [-122.4, 37.79]}),
            ToolContext::new(),
        )
    });
    let results = futures::future::join_all(calls).await;

    assert!(results
        .iter()
        .all(|r| r.as_ref().ok().and_then(|r| r.as_text()) == Some("ok")));
}

#[tokio::test]
async fn test_discovered_tools_are_callable() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "tools/list"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"tools": [{
                    "name": "isochrone_tool",
                    "description": "Reachable area within a time budget",
                    "inputSchema": {"type": "object", "required": ["coordinates"]}
                }]}
            })
            .to_string(),
        )
        .create_async()
        .await;
    let call = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({
            "method": "tools/call",
            "params": {"name": "isochrone_tool", "arguments": {"contours_minutes": [30]}}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_result(2, "{\"type\":\"FeatureCollection\"}"))
        .create_async()
        .await;

    let client = Arc::new(client_for(&server));
    let listed = client.list_tools().await.unwrap();

    let mut registry = ToolRegistry::new();
    registry.register_all(create_mcp_tools(client, listed, Some("mapbox")));
    assert_eq!(registry.names(), vec!["mapbox_isochrone_tool"]);

    let result = registry
        .invoke(
            "mapbox_isochrone_tool",
            json!({"coordinates": [-122.4, 37.79], "contours_minutes": [30], "profile": "mapbox/driving"}),
            ToolContext::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.as_text(), Some(r#"{"type":"FeatureCollection"}"#));
    list.assert_async().await;
    call.assert_async().await;
}
