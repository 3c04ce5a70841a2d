//! Blocking `reqwest` gateway to a live audio service.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};

use super::{ApiRequest, ApiResponse, HttpGateway, Method, RequestBody};
use crate::config::ClientConfig;
use crate::error::{Result, SoundEditError};

/// Gateway that performs real HTTP requests.
pub struct ReqwestGateway {
    config: ClientConfig,
    client: Client,
}

impl ReqwestGateway {
    /// Create a gateway for the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SoundEditError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { config, client })
    }

    /// Create a gateway configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn map_send_error(&self, e: reqwest::Error) -> SoundEditError {
        if e.is_timeout() {
            SoundEditError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else if e.is_connect() {
            SoundEditError::Connection {
                message: format!("cannot connect to {}: {}", self.config.base_url, e),
            }
        } else {
            SoundEditError::Connection {
                message: e.to_string(),
            }
        }
    }

    fn with_body(&self, builder: RequestBuilder, body: &RequestBody) -> Result<RequestBuilder> {
        Ok(match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    let file = Part::bytes(part.bytes.clone())
                        .file_name(part.file_name.clone())
                        .mime_str(&part.mime)
                        .map_err(|e| SoundEditError::UnsupportedAudioType {
                            path: part.file_name.clone().into(),
                            mime: format!("{} ({})", part.mime, e),
                        })?;
                    form = form.part(part.field.clone(), file);
                }
                builder.multipart(form)
            }
        })
    }
}

impl HttpGateway for ReqwestGateway {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.config.url_for(&request.path);
        tracing::debug!(method = request.method.as_str(), %url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = self.with_body(builder, &request.body)?;

        let response = builder.send().map_err(|e| self.map_send_error(e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| self.map_send_error(e))?
            .to_vec();

        tracing::debug!(status, bytes = body.len(), "received response");
        Ok(ApiResponse::new(status, body))
    }

    fn url_for(&self, path: &str) -> String {
        self.config.url_for(path)
    }
}
