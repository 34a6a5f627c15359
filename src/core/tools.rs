//! Tool Router - exposes the resource registry as MCP tools.
//!
//! Each resource becomes one tool whose input schema is the resource's
//! parameter schema. Calls go through the [`CallGateway`], so the STDIO
//! surface shares the gate and the router with the HTTP one.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, JsonObject, Tool},
};
use std::sync::Arc;

use super::gateway::CallGateway;
use crate::domains::resources::{ResourceDescriptor, ResourceRegistry};

/// Tool metadata for a resource.
pub fn to_tool(descriptor: &ResourceDescriptor) -> Tool {
    let schema_object = |value: serde_json::Value| -> Arc<JsonObject> {
        Arc::new(value.as_object().cloned().unwrap_or_default())
    };

    Tool {
        name: descriptor.name.into(),
        description: Some(descriptor.description.into()),
        input_schema: schema_object(descriptor.parameters_schema()),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Invoke one resource through the gateway and wrap the outcome as a
/// tool result.
///
/// Error responses become error results carrying the same JSON body.
pub async fn call_resource_tool(
    gateway: &CallGateway,
    name: &str,
    args: JsonObject,
) -> CallToolResult {
    let response = gateway.invoke(name, args).await;
    let content = vec![Content::text(response.to_json().to_string())];
    if response.is_error() {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// Create a ToolRoute for one resource.
fn create_route<S>(descriptor: &ResourceDescriptor, gateway: Arc<CallGateway>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = descriptor.name;
    ToolRoute::new_dyn(to_tool(descriptor), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let gateway = gateway.clone();
        async move { Ok(call_resource_tool(&gateway, name, args).await) }.boxed()
    })
}

/// Build the tool router with one route per registered resource.
pub fn build_tool_router<S>(registry: &ResourceRegistry, gateway: Arc<CallGateway>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .list()
        .iter()
        .fold(ToolRouter::new(), |router, descriptor| {
            router.with_route(create_route(descriptor, gateway.clone()))
        })
}
