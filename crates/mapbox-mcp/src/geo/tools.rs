//! Agent-facing Mapbox tools.
//!
//! Each tool is a schema plus a pass-through call to the shared
//! [`MapboxMcpClient`]. The client is injected, never global.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use geo_tools_core::{Tool, ToolBox, ToolContext, ToolError, ToolParameterSchema, ToolResult, ToolSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{
    DirectionsArgs, DistanceArgs, IsochroneArgs, PoiSearchArgs, TravelProfile,
    MAX_ISOCHRONE_MINUTES,
};
use crate::client::MapboxMcpClient;

/// Remote name of the routing tool
pub const DIRECTIONS_TOOL: &str = "directions_tool";
/// Remote name of the POI category search tool
pub const CATEGORY_SEARCH_TOOL: &str = "category_search_tool";
/// Remote name of the offline great-circle distance tool
pub const DISTANCE_TOOL: &str = "distance_tool";
/// Remote name of the isochrone tool
pub const ISOCHRONE_TOOL: &str = "isochrone_tool";

/// All four Mapbox tools sharing one client
pub fn mapbox_tools(client: Arc<MapboxMcpClient>) -> Vec<ToolBox> {
    vec![
        Arc::new(GetDirectionsTool::new(client.clone())),
        Arc::new(SearchPoiTool::new(client.clone())),
        Arc::new(CalculateDistanceTool::new(client.clone())),
        Arc::new(GetIsochroneTool::new(client)),
    ]
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::invalid_arguments(tool, e.to_string()))
}

fn profile_schema(description: &str, default: TravelProfile) -> ToolParameterSchema {
    ToolParameterSchema::string(description)
        .with_enum(TravelProfile::ALL.map(TravelProfile::short_name))
        .with_default(default.short_name())
}

fn object_schema(
    description: &str,
    properties: Vec<(&str, ToolParameterSchema)>,
    required: &[&str],
) -> ToolParameterSchema {
    let properties: BTreeMap<String, ToolParameterSchema> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    ToolParameterSchema::object(
        description,
        properties,
        required.iter().map(|s| s.to_string()).collect(),
    )
}

macro_rules! remote_name_setter {
    ($tool:ty) => {
        impl $tool {
            /// Override the remote tool name this wrapper invokes
            pub fn with_remote_name(mut self, name: impl Into<String>) -> Self {
                self.remote_name = name.into();
                self
            }

            pub fn remote_name(&self) -> &str {
                &self.remote_name
            }
        }
    };
}

// ============================================
// get_directions
// ============================================

/// Traffic-aware road route between two points
pub struct GetDirectionsTool {
    client: Arc<MapboxMcpClient>,
    remote_name: String,
}

impl GetDirectionsTool {
    pub const NAME: &'static str = "get_directions";

    pub fn new(client: Arc<MapboxMcpClient>) -> Self {
        Self {
            client,
            remote_name: DIRECTIONS_TOOL.to_string(),
        }
    }
}

remote_name_setter!(GetDirectionsTool);

#[async_trait]
impl Tool for GetDirectionsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            Self::NAME,
            "Get turn-by-turn driving directions with traffic-aware route distance and travel \
             time along roads. Use when you need the actual driving route or traffic-aware \
             duration. Returns duration and distance.",
            object_schema(
                "Directions request",
                vec![
                    (
                        "origin",
                        ToolParameterSchema::coordinates("Origin coordinates [longitude, latitude]"),
                    ),
                    (
                        "destination",
                        ToolParameterSchema::coordinates(
                            "Destination coordinates [longitude, latitude]",
                        ),
                    ),
                    (
                        "profile",
                        profile_schema("Routing profile", TravelProfile::DrivingTraffic),
                    ),
                ],
                &["origin", "destination"],
            ),
        )
    }

    #[instrument(skip(self, args, ctx), fields(tool = "get_directions"))]
    async fn execute(&self, args: Value, ctx: ToolContext) -> anyhow::Result<ToolResult> {
        let args: DirectionsArgs = parse_args(Self::NAME, args)?;
        debug!(origin = %args.origin, destination = %args.destination, profile = %args.profile, "Requesting directions");

        let text = self.client.call_tool(&self.remote_name, args.to_remote()).await?;
        Ok(ToolResult::text(&ctx, format!("Directions: {}", text)))
    }
}

// ============================================
// search_poi
// ============================================

/// Places of one category near a point
pub struct SearchPoiTool {
    client: Arc<MapboxMcpClient>,
    remote_name: String,
}

impl SearchPoiTool {
    pub const NAME: &'static str = "search_poi";

    pub fn new(client: Arc<MapboxMcpClient>) -> Self {
        Self {
            client,
            remote_name: CATEGORY_SEARCH_TOOL.to_string(),
        }
    }
}

remote_name_setter!(SearchPoiTool);

#[async_trait]
impl Tool for SearchPoiTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            Self::NAME,
            "Find ALL places of a specific category type near a location. Use when the user \
             wants to browse places by type (restaurants, hotels, coffee, etc.), not search for \
             a specific named place. Returns names and addresses.",
            object_schema(
                "POI category search",
                vec![
                    (
                        "category",
                        ToolParameterSchema::string(
                            "POI category (restaurant, hotel, coffee, gas_station, etc.)",
                        ),
                    ),
                    (
                        "location",
                        ToolParameterSchema::coordinates("Search center [longitude, latitude]"),
                    ),
                ],
                &["category", "location"],
            ),
        )
    }

    #[instrument(skip(self, args, ctx), fields(tool = "search_poi"))]
    async fn execute(&self, args: Value, ctx: ToolContext) -> anyhow::Result<ToolResult> {
        let args: PoiSearchArgs = parse_args(Self::NAME, args)?;
        args.validate()
            .map_err(|msg| ToolError::invalid_arguments(Self::NAME, msg))?;
        debug!(category = %args.category, location = %args.location, "Searching POIs");

        let text = self.client.call_tool(&self.remote_name, args.to_remote()).await?;
        Ok(ToolResult::text(&ctx, text))
    }
}

// ============================================
// calculate_distance
// ============================================

/// Great-circle distance, computed by the server without a routing request
pub struct CalculateDistanceTool {
    client: Arc<MapboxMcpClient>,
    remote_name: String,
}

impl CalculateDistanceTool {
    pub const NAME: &'static str = "calculate_distance";

    pub fn new(client: Arc<MapboxMcpClient>) -> Self {
        Self {
            client,
            remote_name: DISTANCE_TOOL.to_string(),
        }
    }
}

remote_name_setter!(CalculateDistanceTool);

#[async_trait]
impl Tool for CalculateDistanceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            Self::NAME,
            "Calculate straight-line (great-circle) distance between two points. Use for quick \
             'as the crow flies' distance checks. Works offline, instant, no API cost.",
            object_schema(
                "Distance request",
                vec![
                    (
                        "from_coords",
                        ToolParameterSchema::coordinates("Start coordinates [longitude, latitude]"),
                    ),
                    (
                        "to_coords",
                        ToolParameterSchema::coordinates("End coordinates [longitude, latitude]"),
                    ),
                    (
                        "units",
                        ToolParameterSchema::string("Distance units")
                            .with_enum(["miles", "kilometers"])
                            .with_default("miles"),
                    ),
                ],
                &["from_coords", "to_coords"],
            ),
        )
    }

    #[instrument(skip(self, args, ctx), fields(tool = "calculate_distance"))]
    async fn execute(&self, args: Value, ctx: ToolContext) -> anyhow::Result<ToolResult> {
        let args: DistanceArgs = parse_args(Self::NAME, args)?;

        let text = self.client.call_tool(&self.remote_name, args.to_remote()).await?;
        Ok(ToolResult::text(&ctx, format!("{} {}", text.trim(), args.units)))
    }
}

// ============================================
// get_isochrone
// ============================================

/// Area reachable from a point within a time budget
pub struct GetIsochroneTool {
    client: Arc<MapboxMcpClient>,
    remote_name: String,
}

impl GetIsochroneTool {
    pub const NAME: &'static str = "get_isochrone";

    pub fn new(client: Arc<MapboxMcpClient>) -> Self {
        Self {
            client,
            remote_name: ISOCHRONE_TOOL.to_string(),
        }
    }
}

remote_name_setter!(GetIsochroneTool);

#[async_trait]
impl Tool for GetIsochroneTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            Self::NAME,
            "Calculate the AREA reachable within a time limit from a starting point. Use for \
             'What can I reach in X minutes?' questions or service area analysis. Returns a \
             GeoJSON polygon of the reachable area.",
            object_schema(
                "Isochrone request",
                vec![
                    (
                        "location",
                        ToolParameterSchema::coordinates("Center point [longitude, latitude]"),
                    ),
                    (
                        "minutes",
                        ToolParameterSchema::integer("Time limit in minutes")
                            .with_keyword("minimum", Value::from(1))
                            .with_keyword("maximum", Value::from(MAX_ISOCHRONE_MINUTES)),
                    ),
                    ("profile", profile_schema("Travel mode", TravelProfile::Walking)),
                ],
                &["location", "minutes"],
            ),
        )
    }

    #[instrument(skip(self, args, ctx), fields(tool = "get_isochrone"))]
    async fn execute(&self, args: Value, ctx: ToolContext) -> anyhow::Result<ToolResult> {
        let args: IsochroneArgs = parse_args(Self::NAME, args)?;
        args.validate()
            .map_err(|msg| ToolError::invalid_arguments(Self::NAME, msg))?;
        debug!(location = %args.location, minutes = args.minutes, profile = %args.profile, "Requesting isochrone");

        let text = self.client.call_tool(&self.remote_name, args.to_remote()).await?;
        Ok(ToolResult::text(&ctx, text))
    }
}
