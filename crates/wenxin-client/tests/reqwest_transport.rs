use serde_json::json;
use wenxin_client::{
    ChatClient, ChatOptions, ClientConfigBuilder, ReqwestTransport,
};
use wenxin_model::{ErrorKind, Message};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str =
    "/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/completions_pro";

async fn mock_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/2.0/token"))
        .and(query_param("client_id", "id"))
        .and(query_param("client_secret", "secret"))
        .and(query_param("grant_type", "client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "24.token",
            "expires_in": 2592000
        })))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> ChatClient<ReqwestTransport> {
    let config = ClientConfigBuilder::with_credentials("id", "secret")
        .with_endpoint(format!("{}{CHAT_PATH}", server.uri()))
        .with_auth_url(format!("{}/oauth/2.0/token", server.uri()))
        .build()
        .unwrap();
    ChatClient::with_config(config)
}

#[tokio::test]
async fn test_send_request() {
    let server = MockServer::start().await;
    mock_token(&server).await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(query_param("access_token", "24.token"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "user", "content": "hi" }],
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "as-0001",
            "object": "chat.completion",
            "created": 1700000000,
            "result": "Hello!",
            "is_truncated": false,
            "need_clear_history": false,
            "usage": {
                "prompt_tokens": 1,
                "completion_tokens": 2,
                "total_tokens": 3
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client(&server)
        .send_request(&[Message::user("hi")], ChatOptions::default())
        .await
        .unwrap();
    assert_eq!(resp.id, "as-0001");
    assert_eq!(resp.result, "Hello!");
}

#[tokio::test]
async fn test_stream_request() {
    let server = MockServer::start().await;
    mock_token(&server).await;
    let body = "data: {\"sentence_id\":0,\"result\":\"He\"}\n\n\
                data: {\"sentence_id\":1,\"result\":\"llo\"}\n\n\
                GARBAGE\n\
                data: {\"sentence_id\":2,\"result\":\"\",\"is_end\":true}\n\n";
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.as_bytes().to_vec(), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut chunks = Vec::new();
    client(&server)
        .stream_request(
            &[Message::user("hi")],
            |chunk| chunks.push(chunk),
            ChatOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(chunks, ["He", "llo"]);
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;
    mock_token(&server).await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_request(&[Message::user("hi")], ChatOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Request);
    assert!(err.message().contains("500"));
    assert!(err.message().contains("oops"));
}

#[tokio::test]
async fn test_token_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "unknown client id"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .send_request(&[Message::user("hi")], ChatOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.message().contains("401"));
}

#[tokio::test]
async fn test_validation_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .send_request(&[], ChatOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
