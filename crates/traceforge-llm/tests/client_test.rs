use mockito::Matcher;
use serde_json::json;
use traceforge_llm::{
    consume, consume_stream, ChatClient, ChatReply, ChatRequest, ClientConfig, LlmError, Message,
    OpenAIClient,
};

const SSE_BODY: &str = concat!(
    "data: {\"id\":\"c1\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"c1\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"1\"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"c1\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\", 2\"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"c1\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
    "data: [DONE]\n\n",
);

fn request(stream: bool) -> ChatRequest {
    ChatRequest::build(
        "gpt-3.5-turbo",
        vec![
            Message::system("You are a helpful assistant."),
            Message::human("Explain quantum computing in one sentence."),
        ],
        0.5,
        100,
        stream,
    )
}

fn client_for(server: &mockito::ServerGuard, api_key: Option<&str>) -> OpenAIClient {
    let mut config = ClientConfig::new(format!("{}/v1", server.url()));
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }
    OpenAIClient::new(config).unwrap()
}

#[tokio::test]
async fn test_chat_posts_request_and_parses_completion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "system", "content": "You are a helpful assistant."},
                {"role": "user", "content": "Explain quantum computing in one sentence."}
            ],
            "temperature": 0.5,
            "max_tokens": 100,
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"Quantum computing uses qubits."}}]}"#)
        .create_async()
        .await;

    let client = client_for(&server, Some("sk-test"));
    let completion = client.chat(&request(false)).await.unwrap();

    assert_eq!(consume(&completion).unwrap(), "Quantum computing uses qubits.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_key_sends_no_authorization() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
        .create_async()
        .await;

    let client = client_for(&server, None);
    client.chat(&request(false)).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_stream_yields_fragments() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(SSE_BODY)
        .create_async()
        .await;

    let client = client_for(&server, None);
    let fragments = client.chat_stream(&request(true)).await.unwrap();

    let mut surfaced = Vec::new();
    let text = consume_stream(fragments, |d| surfaced.push(d.to_string()))
        .await
        .unwrap();

    assert_eq!(text, "1, 2");
    assert_eq!(surfaced, vec!["1", ", 2"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_dispatches_on_stream_flag() {
    let mut server = mockito::Server::new_async().await;
    let single = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": false})))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"single"}}]}"#)
        .create_async()
        .await;
    let streaming = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(SSE_BODY)
        .create_async()
        .await;

    let client = client_for(&server, None);

    let reply = client.submit(&request(false)).await.unwrap();
    assert!(matches!(reply, ChatReply::Single(_)));

    let reply = client.submit(&request(true)).await.unwrap();
    assert!(matches!(
        reply.into_completion(),
        Err(LlmError::ModeMismatch { .. })
    ));

    single.assert_async().await;
    streaming.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(502)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let client = client_for(&server, None);

    match client.chat(&request(false)).await {
        Err(LlmError::Api { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }

    assert!(matches!(
        client.chat_stream(&request(true)).await,
        Err(LlmError::Api { status: 502, .. })
    ));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"unexpected":true}"#)
        .create_async()
        .await;

    let client = client_for(&server, None);

    assert!(matches!(
        client.chat(&request(false)).await,
        Err(LlmError::Decode(_))
    ));
}

#[tokio::test]
async fn test_unreachable_proxy_is_http_error() {
    // Port 9 (discard) is not expected to accept HTTP connections.
    let client = OpenAIClient::new(ClientConfig::new("http://127.0.0.1:9/v1")).unwrap();

    assert!(matches!(
        client.chat(&request(false)).await,
        Err(LlmError::Http(_))
    ));
}
