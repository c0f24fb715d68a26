use crate::metrics::{ApiMetrics, MetricsCollector, RequestMetrics};
use newsly_core::{
    normalize_batch, ApiError, AppConfig, Candidate, ConfigError, CoreError, FeaturedItem,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("newsly/", env!("CARGO_PKG_VERSION"));

/// Which configured service a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Api,
    Subscriptions,
}

enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct SummaryResponse {
    summary: Option<Value>,
    answer: Option<Value>,
    error: Option<Value>,
}

/// Message to show for a failed response.
///
/// Uses the body's `error` or `detail` string when present, otherwise
/// `"<status> <reason>"`.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["error", "detail"].iter().find_map(|key| {
            value
                .get(*key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    });
    from_body.unwrap_or_else(|| {
        format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string()
    })
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn base_url(field: &str, raw: &str) -> Result<String, CoreError> {
    Url::parse(raw).map_err(|_| {
        CoreError::Config(ConfigError::InvalidUrl {
            field: field.to_string(),
            url: raw.to_string(),
        })
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    api_base: String,
    subscriptions_base: String,
    timezone: String,
    fast_featured: bool,
    metrics: Arc<MetricsCollector>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            api_base: base_url("api_base_url", &config.api_base_url)?,
            subscriptions_base: base_url(
                "subscriptions_base_url",
                &config.subscriptions_base_url,
            )?,
            timezone: config.timezone.clone(),
            fast_featured: config.fast_featured,
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    fn url_for(&self, service: Service, endpoint: &str) -> String {
        let base = match service {
            Service::Api => &self.api_base,
            Service::Subscriptions => &self.subscriptions_base,
        };
        format!("{}{}", base, endpoint)
    }

    /// Sends one request and returns the parsed body of a 2xx response.
    ///
    /// A 2xx body that is not JSON reads as an empty object.
    async fn make_request(
        &self,
        method: Method,
        service: Service,
        endpoint: &str,
        query_params: Option<&[(&str, &str)]>,
        body: Body,
    ) -> Result<Value, CoreError> {
        let url = self.url_for(service, endpoint);
        let start_time = Instant::now();

        let mut request_builder = self.http_client.request(method.clone(), &url);
        if let Some(params) = query_params {
            request_builder = request_builder.query(params);
        }
        request_builder = match body {
            Body::Empty => request_builder,
            Body::Json(value) => request_builder.json(&value),
            Body::Multipart(form) => request_builder.multipart(form),
        };

        info!("Making API request: {} {}", method, endpoint);
        let outcome = match request_builder.send().await {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(text) => Ok((status, text)),
                    Err(e) => Err((Some(status.as_u16()), e)),
                }
            }
            Err(e) => Err((None, e)),
        };

        let (status, text) = match outcome {
            Ok(parts) => parts,
            Err((status_code, e)) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                self.record(&method, endpoint, status_code, start_time, Some("network_error"))
                    .await;
                return Err(CoreError::Network(e));
            }
        };

        if !status.is_success() {
            let message = extract_error_message(status, &text);
            error!(
                "Request failed with status: {} for {}: {}",
                status, endpoint, message
            );
            let error_type = if status.is_server_error() {
                "server_error"
            } else {
                "client_error"
            };
            self.record(&method, endpoint, Some(status.as_u16()), start_time, Some(error_type))
                .await;
            return Err(CoreError::Api(ApiError::Http {
                status: status.as_u16(),
                message,
            }));
        }

        debug!("Request successful: {} {}", status, endpoint);
        self.record(&method, endpoint, Some(status.as_u16()), start_time, None)
            .await;

        Ok(serde_json::from_str(&text).unwrap_or_else(|_| {
            if !text.trim().is_empty() {
                warn!("Non-JSON body from {}, treating as empty", endpoint);
            }
            Value::Object(Map::new())
        }))
    }

    async fn record(
        &self,
        method: &Method,
        endpoint: &str,
        status_code: Option<u16>,
        start_time: Instant,
        error_type: Option<&str>,
    ) {
        self.metrics
            .record_request(RequestMetrics {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
                status_code,
                response_time: start_time.elapsed(),
                success: error_type.is_none(),
                error_type: error_type.map(str::to_string),
            })
            .await;
    }

    /// Any non-2xx answer is reported as bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), CoreError> {
        let body = serde_json::to_value(Credentials { email, password })?;
        match self
            .make_request(Method::POST, Service::Api, "/auth/login", None, Body::Json(body))
            .await
        {
            Ok(_) => {
                info!("Logged in as {}", email);
                Ok(())
            }
            Err(CoreError::Api(ApiError::Http { status, .. })) => {
                warn!("Login rejected with status {}", status);
                Err(CoreError::Api(ApiError::InvalidCredentials))
            }
            Err(e) => Err(e),
        }
    }

    /// Checks the form locally before any request goes out.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Value, CoreError> {
        validate_signup(email, password, confirm_password)?;

        let body = serde_json::to_value(Credentials { email, password })?;
        self.make_request(Method::POST, Service::Api, "/auth/signup", None, Body::Json(body))
            .await
            .map_err(|e| match e {
                CoreError::Api(ApiError::Http { message, .. }) => {
                    CoreError::Api(ApiError::SignupFailed { reason: message })
                }
                other => other,
            })
    }

    /// Scans the mailbox for newsletter senders. Malformed entries are skipped.
    pub async fn scan_newsletters(&self) -> Result<Vec<Candidate>, CoreError> {
        let body = self
            .make_request(
                Method::POST,
                Service::Api,
                "/api/newsletters/scan",
                None,
                Body::Empty,
            )
            .await?;

        let candidates = match body.get("candidates") {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|value| match serde_json::from_value::<Candidate>(value.clone()) {
                    Ok(candidate) => Some(candidate),
                    Err(e) => {
                        warn!("Skipping malformed candidate: {}", e);
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        info!("Scan returned {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Returns how many selections the backend saved.
    pub async fn save_selection(&self, selected: &[Candidate]) -> Result<usize, CoreError> {
        let body = json!({ "selected": selected });
        let response = self
            .make_request(
                Method::POST,
                Service::Api,
                "/api/newsletters/selection",
                None,
                Body::Json(body),
            )
            .await?;

        let saved = response
            .get("saved")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(selected.len());
        debug!("Selection saved: {}", saved);
        Ok(saved)
    }

    /// Fetches, normalizes and orders the featured feed.
    pub async fn featured(&self) -> Result<Vec<FeaturedItem>, CoreError> {
        let query: &[(&str, &str)] = &[("fast", "1")];
        let body = self
            .make_request(
                Method::GET,
                Service::Api,
                "/api/newsletters/featured",
                self.fast_featured.then_some(query),
                Body::Empty,
            )
            .await?;

        if let Some(message) = body.get("error").and_then(text_of) {
            warn!("Featured endpoint reported: {}", message);
        }

        let items = normalize_batch(body.get("items").cloned());
        debug!("Normalized {} featured items", items.len());
        Ok(items)
    }

    pub async fn subscribe(&self, email: &str) -> Result<(), CoreError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CoreError::InvalidInput {
                message: "Please enter your email address.".to_string(),
            });
        }

        let body = json!({ "email": email, "tz": self.timezone });
        self.make_request(
            Method::POST,
            Service::Subscriptions,
            "/api/subscriptions",
            None,
            Body::Json(body),
        )
        .await?;
        info!("Subscribed {} to the daily digest", email);
        Ok(())
    }

    /// Summarizes an uploaded PDF. `email`, when given, also receives it.
    pub async fn summarize_file(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        email: Option<&str>,
    ) -> Result<String, CoreError> {
        let mut form = Form::new().part("file", pdf_part(bytes, file_name)?);
        if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
            form = form.text("email", email.to_string());
        }
        self.summary_request("/summarize", form, "summary").await
    }

    pub async fn summarize_url(&self, url: &str) -> Result<String, CoreError> {
        let url = url.trim();
        if Url::parse(url).is_err() {
            return Err(CoreError::InvalidInput {
                message: format!("'{}' is not a valid URL.", url),
            });
        }
        let form = Form::new().text("url", url.to_string());
        self.summary_request("/summarize-url", form, "summary").await
    }

    pub async fn chat_with_pdf(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        question: &str,
    ) -> Result<String, CoreError> {
        if question.trim().is_empty() {
            return Err(CoreError::InvalidInput {
                message: "Please enter a question.".to_string(),
            });
        }
        let form = Form::new()
            .part("file", pdf_part(bytes, file_name)?)
            .text("question", question.to_string());
        self.summary_request("/chat-with-pdf", form, "answer").await
    }

    /// These endpoints report failures as `{error}` with a 2xx status.
    async fn summary_request(
        &self,
        endpoint: &str,
        form: Form,
        field: &str,
    ) -> Result<String, CoreError> {
        let body = self
            .make_request(Method::POST, Service::Api, endpoint, None, Body::Multipart(form))
            .await?;
        let response: SummaryResponse = serde_json::from_value(body)?;

        if let Some(message) = response.error.as_ref().and_then(text_of) {
            error!("{} failed on the backend: {}", endpoint, message);
            return Err(CoreError::Api(ApiError::Backend { message }));
        }

        let value = match field {
            "answer" => response.answer,
            _ => response.summary,
        };
        value.as_ref().and_then(text_of).ok_or_else(|| {
            CoreError::Api(ApiError::InvalidResponse {
                details: format!("{} response has no '{}'", endpoint, field),
            })
        })
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.get_metrics().await
    }

    pub async fn reset_metrics(&self) {
        self.metrics.reset_metrics().await;
    }
}

fn pdf_part(bytes: Vec<u8>, file_name: &str) -> Result<Part, CoreError> {
    Ok(Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str("application/pdf")?)
}

pub fn validate_signup(email: &str, password: &str, confirm: &str) -> Result<(), CoreError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(CoreError::InvalidInput {
            message: "Please fill in all fields.".to_string(),
        });
    }
    if password != confirm {
        return Err(CoreError::InvalidInput {
            message: "Passwords do not match.".to_string(),
        });
    }
    Ok(())
}
