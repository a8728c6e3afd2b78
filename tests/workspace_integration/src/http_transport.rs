//! Stateless HTTP transport tests.
//!
//! Serves the real `ImageServer` through `http_router` on an ephemeral port,
//! with the Runware API replaced by a `wiremock` server that derives each
//! image URL from the request's prompt.

use serde_json::{Value, json};

/// Build a JSON-RPC `tools/call` request for `generateImage`.
pub fn tool_call(id: u64, prompt: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {
            "name": "generateImage",
            "arguments": { "prompt": prompt }
        }
    })
}

/// Pull the JSON-RPC response with the given id out of a response body,
/// which is either plain JSON or an SSE stream of `data:` lines.
pub fn find_response(body: &str, id: u64) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return (value["id"] == id).then_some(value);
    }

    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
        .find(|value| value["id"] == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use runware_mcp_common::{Config, http_router};
    use runware_mcp_image::ImageServer;
    use std::net::SocketAddr;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    struct EchoPrompt;

    impl Respond for EchoPrompt {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let tasks: Vec<Value> = serde_json::from_slice(&request.body).unwrap_or_default();
            let task = tasks
                .into_iter()
                .find(|t| t["taskType"] == "imageInference")
                .unwrap_or_default();
            let slug = task["positivePrompt"].as_str().unwrap_or_default().replace(' ', "-");

            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(150))
                .set_body_json(json!({
                    "data": [{
                        "taskType": "imageInference",
                        "taskUUID": task["taskUUID"],
                        "imageURL": format!("https://im.runware.ai/{}.png", slug)
                    }]
                }))
        }
    }

    async fn spawn_server(upstream: &MockServer) -> SocketAddr {
        let config = Config {
            api_key: "test-key".to_string(),
            base_url: format!("{}/v1", upstream.uri()),
            port: 0,
        };
        let router = http_router(ImageServer::new(config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        addr
    }

    async fn post_call(client: &reqwest::Client, addr: SocketAddr, id: u64, prompt: &str) -> Value {
        let response = client
            .post(format!("http://{}/mcp", addr))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .json(&tool_call(id, prompt))
            .send()
            .await
            .expect("request should reach the server");

        assert!(response.status().is_success(), "unexpected status {}", response.status());
        assert!(
            response.headers().get("mcp-session-id").is_none(),
            "stateless transport must not issue session ids"
        );

        let body = response.text().await.unwrap();
        find_response(&body, id).unwrap_or_else(|| panic!("no response for id {} in {:?}", id, body))
    }

    #[test]
    fn test_find_response_plain_json() {
        let body = r#"{"jsonrpc":"2.0","id":7,"result":{}}"#;
        assert!(find_response(body, 7).is_some());
        assert!(find_response(body, 8).is_none());
    }

    #[test]
    fn test_find_response_sse() {
        let body = "id: 0\ndata: \n\ndata: {\"jsonrpc\":\"2.0\",\"id\":3,\"result\":{}}\n\n";
        assert_eq!(find_response(body, 3).unwrap()["id"], 3);
    }

    #[tokio::test]
    async fn test_tool_call_over_http() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST")).respond_with(EchoPrompt).mount(&upstream).await;
        let addr = spawn_server(&upstream).await;

        let response = post_call(&reqwest::Client::new(), addr, 1, "a red fox").await;
        let result = &response["result"];

        assert_eq!(result["isError"], json!(false));
        assert_eq!(result["content"][0]["text"], "https://im.runware.ai/a-red-fox.png");
        assert_eq!(
            result["structuredContent"]["imageURL"],
            "https://im.runware.ai/a-red-fox.png"
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_tool_error_not_protocol_error() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&upstream)
            .await;
        let addr = spawn_server(&upstream).await;

        let response = post_call(&reqwest::Client::new(), addr, 1, "a red fox").await;

        assert!(response.get("error").is_none(), "unexpected protocol error: {}", response);
        assert_eq!(response["result"]["isError"], json!(true));
        assert_eq!(response["result"]["content"][0]["text"], "Error: No images generated");
    }

    /// Two concurrent callers each receive the image for their own prompt.
    #[tokio::test]
    async fn test_concurrent_requests_are_isolated() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(EchoPrompt)
            .expect(2)
            .mount(&upstream)
            .await;
        let addr = spawn_server(&upstream).await;

        let client = reqwest::Client::new();
        // Same JSON-RPC id on purpose: requests must not share any transport state.
        let (fox, owl) = tokio::join!(
            post_call(&client, addr, 1, "a red fox"),
            post_call(&client, addr, 1, "a snowy owl"),
        );

        assert_eq!(
            fox["result"]["structuredContent"]["imageURL"],
            "https://im.runware.ai/a-red-fox.png"
        );
        assert_eq!(
            owl["result"]["structuredContent"]["imageURL"],
            "https://im.runware.ai/a-snowy-owl.png"
        );
    }
}
