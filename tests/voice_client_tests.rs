//! Voice client behavior against a mock HTTP server.

use voicebridge::core::voice::media::CallMedium;
use voicebridge::core::voice::{
    ApiDuration, CallRequest, VoiceClient, VoiceClientConfig, VoiceClientError,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> VoiceClient {
    VoiceClient::new(VoiceClientConfig {
        api_key: "test-api-key".to_string(),
        base_url: format!("{}/api", server.uri()),
        ..Default::default()
    })
    .unwrap()
}

fn call_response() -> serde_json::Value {
    serde_json::json!({
        "callId": "call-123",
        "joinUrl": "wss://example.com/join/call-123",
        "created": "2023-05-20T12:34:56Z",
        "maxDuration": "3600s",
        "joinTimeout": "300s",
        "initialOutputMedium": "MESSAGE_MEDIUM_VOICE",
        "recordingEnabled": false,
        "errorCount": 0
    })
}

#[tokio::test]
async fn test_create_call_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .and(header("X-API-Key", "test-api-key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let call = client.create_call(&CallRequest::new()).await.unwrap();

    assert_eq!(call.call_id, "call-123");
    assert_eq!(call.join_url, "wss://example.com/join/call-123");
    assert_eq!(call.max_duration, Some(ApiDuration::from_secs(3600)));
}

#[tokio::test]
async fn test_create_call_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .and(body_partial_json(serde_json::json!({
            "systemPrompt": "You are concise.",
            "maxDuration": "300s",
            "medium": { "serverWebSocket": { "inputSampleRate": 8000, "outputSampleRate": 8000 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_response()))
        .expect(1)
        .mount(&server)
        .await;

    let request = CallRequest::new()
        .system_prompt("You are concise.")
        .max_duration(ApiDuration::from_secs(300))
        .medium(CallMedium::server_web_socket(8000, 8000));

    client_for(&server).create_call(&request).await.unwrap();
}

#[tokio::test]
async fn test_create_call_api_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Something went wrong"
            })),
        )
        .mount(&server)
        .await;

    match client_for(&server).create_call(&CallRequest::new()).await {
        Err(VoiceClientError::Status(status)) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_call_invalid_json_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{invalid json}", "application/json"))
        .mount(&server)
        .await;

    match client_for(&server).create_call(&CallRequest::new()).await {
        Err(VoiceClientError::Request(_)) => {}
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_call_missing_join_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "callId": "call-123" })),
        )
        .mount(&server)
        .await;

    match client_for(&server).create_call(&CallRequest::new()).await {
        Err(VoiceClientError::MissingJoinUrl) => {}
        other => panic!("expected missing join URL error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_call_unparsable_join_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "callId": "call-123",
            "joinUrl": "not a url"
        })))
        .mount(&server)
        .await;

    match client_for(&server).create_call(&CallRequest::new()).await {
        Err(VoiceClientError::InvalidJoinUrl { url, .. }) => assert_eq!(url, "not a url"),
        other => panic!("expected invalid join URL error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_agent_call_uses_agent_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/agents/agent-7/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_response()))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .create_agent_call("agent-7", &CallRequest::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_parameters_for_continuation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .and(query_param("enableGreetingPrompt", "true"))
        .and(query_param("priorCallId", "call-previous"))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_response()))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = CallRequest::new().prior_call("call-previous");
    request.enable_greeting_prompt = true;
    client_for(&server).create_call(&request).await.unwrap();
}
