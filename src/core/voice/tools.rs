//! Tool selection model for call creation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::duration::ApiDuration;

/// A tool selected for a particular call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_tool: Option<ToolDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_override: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub auth_tokens: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameter_overrides: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_id: Option<String>,
}

/// A tool the model can invoke during a call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub model_tool_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_parameters: Vec<DynamicParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_parameters: Vec<StaticParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub automatic_parameters: Vec<AutomaticParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<ToolRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<ApiDuration>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub precomputable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpToolDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientToolDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_connection: Option<DataConnectionToolDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_reaction: Option<AgentReaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_response: Option<StaticToolResponse>,
}

/// A parameter the model fills in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub schema: serde_json::Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

/// A parameter added unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub value: serde_json::Value,
}

/// A parameter the platform fills in automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomaticParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub known_value: KnownParameterValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_security_options: Option<SecurityOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_parameter_overrides: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityOptions {
    pub options: Vec<SecurityRequirements>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRequirements {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub requirements: HashMap<String, SecurityRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_token_requirement: Option<CallTokenRequirement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_api_key: Option<QueryApiKeyRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_api_key: Option<HeaderApiKeyRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_auth: Option<HttpAuthRequirement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryApiKeyRequirement {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderApiKeyRequirement {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpAuthRequirement {
    pub scheme: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallTokenRequirement {
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpToolDetails {
    pub base_url_pattern: String,
    pub http_method: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientToolDetails {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConnectionToolDetails {}

/// A canned response returned without invoking the tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticToolResponse {
    pub response_text: String,
}

/// Where a tool parameter is placed in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterLocation {
    #[serde(rename = "PARAMETER_LOCATION_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "PARAMETER_LOCATION_QUERY")]
    Query,
    #[serde(rename = "PARAMETER_LOCATION_PATH")]
    Path,
    #[serde(rename = "PARAMETER_LOCATION_HEADER")]
    Header,
    #[serde(rename = "PARAMETER_LOCATION_BODY")]
    Body,
}

/// Values the platform can supply automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnownParameterValue {
    #[serde(rename = "KNOWN_PARAM_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "KNOWN_PARAM_CALL_ID")]
    CallId,
    #[serde(rename = "KNOWN_PARAM_CONVERSATION_HISTORY")]
    ConversationHistory,
    #[serde(rename = "KNOWN_PARAM_OUTPUT_SAMPLE_RATE")]
    OutputSampleRate,
    #[serde(rename = "KNOWN_PARAM_CALL_STATE")]
    CallState,
}

/// How the agent reacts after a tool completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentReaction {
    #[serde(rename = "AGENT_REACTION_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "AGENT_REACTION_SPEAKS")]
    Speaks,
    #[serde(rename = "AGENT_REACTION_LISTENS")]
    Listens,
    #[serde(rename = "AGENT_REACTION_SPEAKS_ONCE")]
    SpeaksOnce,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_tool_wire_shape() {
        let tool = SelectedTool {
            tool_name: Some("lookup".to_string()),
            temporary_tool: Some(ToolDefinition {
                model_tool_name: "lookup".to_string(),
                description: "Look things up".to_string(),
                dynamic_parameters: vec![DynamicParameter {
                    name: "query".to_string(),
                    location: ParameterLocation::Body,
                    schema: serde_json::json!({"type": "string"}),
                    required: true,
                }],
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["toolName"], "lookup");
        assert_eq!(
            json["temporaryTool"]["dynamicParameters"][0]["location"],
            "PARAMETER_LOCATION_BODY"
        );
        assert!(json.get("authTokens").is_none());
    }
}
