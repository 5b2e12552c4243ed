// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::config::ServiceConfig;
use crate::console::error::AskError;
use crate::console::types::{AnswerResult, AskRequest};

/// One round trip to the answer service
#[async_trait]
pub trait AskTransport: Send + Sync {
    async fn ask(&self, request: &AskRequest) -> Result<AnswerResult, AskError>;
}

/// `POST {base_url}{ask_path}` over reqwest
pub struct HttpAskTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAskTransport {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: join_endpoint(&config.base_url, &config.ask_path),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AskTransport for HttpAskTransport {
    async fn ask(&self, request: &AskRequest) -> Result<AnswerResult, AskError> {
        let body = serde_json::to_vec(request).map_err(AskError::transport)?;

        debug!(endpoint = %self.endpoint, "Sending ask request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(AskError::transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(AskError::transport)?;

        if !status.is_success() {
            return Err(AskError::from_status(status.as_u16(), &bytes));
        }

        serde_json::from_slice::<AnswerResult>(&bytes)
            .map_err(|e| AskError::MalformedResponse(e.to_string()))
    }
}

fn join_endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_config(base_url: String) -> ServiceConfig {
        ServiceConfig {
            base_url,
            timeout_secs: 5,
            ..ServiceConfig::default()
        }
    }

    fn request(pdf_id: Option<&str>) -> AskRequest {
        AskRequest {
            question: "What does the health check cover?".to_string(),
            top_k: 10,
            pdf_id: pdf_id.map(str::to_string),
        }
    }

    #[test]
    fn test_join_endpoint() {
        assert_eq!(
            join_endpoint("http://localhost:8000/", "/pdf/ask"),
            "http://localhost:8000/pdf/ask"
        );
        assert_eq!(
            join_endpoint("http://localhost:8000", "pdf/ask"),
            "http://localhost:8000/pdf/ask"
        );
    }

    #[tokio::test]
    async fn test_success_body_is_parsed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pdf/ask"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "question": "What does the health check cover?",
                "top_k": 10,
                "pdf_id": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "Annual health checks are covered.",
                "sources": [{
                    "pdf_id": "welfare",
                    "pdf_path": "data/pdfs/welfare.pdf",
                    "page_no": 2,
                    "chunk_id": 11,
                    "chunk_profile": "dense_text",
                    "pdf_url": "/files/welfare.pdf",
                    "viewer_url": "/files/welfare.pdf#page=3",
                    "page_image_url": "/pdf/page-image?path=welfare.pdf&page=2",
                    "snippet": "Employees may receive one health check per year"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpAskTransport::new(&service_config(server.uri())).unwrap();
        let result = transport.ask(&request(None)).await.unwrap();

        assert_eq!(result.answer, "Annual health checks are covered.");
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].pdf_id, "welfare");
        assert_eq!(result.sources[0].chunk_id, 11);
        assert_eq!(
            result.sources[0].viewer_url,
            "/files/welfare.pdf#page=3"
        );
    }

    #[tokio::test]
    async fn test_document_filter_is_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pdf/ask"))
            .and(body_json(json!({
                "question": "What does the health check cover?",
                "top_k": 10,
                "pdf_id": "welfare"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"answer": "none", "sources": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpAskTransport::new(&service_config(server.uri())).unwrap();
        let result = transport.ask(&request(Some("welfare"))).await.unwrap();
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn test_service_error_detail() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pdf/ask"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "ES index not found"})),
            )
            .mount(&server)
            .await;

        let transport = HttpAskTransport::new(&service_config(server.uri())).unwrap();
        let err = transport.ask(&request(None)).await.unwrap_err();

        assert_eq!(
            err,
            AskError::Service {
                status: 500,
                message: "ES index not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_service_error_without_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pdf/ask"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = HttpAskTransport::new(&service_config(server.uri())).unwrap();
        let err = transport.ask(&request(None)).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed (HTTP 503)");
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pdf/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": 42})))
            .mount(&server)
            .await;

        let transport = HttpAskTransport::new(&service_config(server.uri())).unwrap();
        let err = transport.ask(&request(None)).await.unwrap_err();
        assert!(matches!(err, AskError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // Reserve a free port, then close it so the connection is refused
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport =
            HttpAskTransport::new(&service_config(format!("http://{}", addr))).unwrap();
        let err = transport.ask(&request(None)).await.unwrap_err();
        assert!(matches!(err, AskError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }
}
