//! The entity service client: binds arguments against catalog descriptors,
//! executes the resulting HTTP requests, and classifies outcomes.

use crate::catalog::{Command, ParamLocation, entity_path};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result, redact_url};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What a successful HTTP exchange produced.
///
/// A 4xx answer is a *rejection*, not a failure: the server processed the
/// request and turned it down (unknown entity, malformed SQL, ...). The
/// message text is preserved for the caller. Transport failures and 5xx
/// answers surface as [`ClientError`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The extracted response field (`data` or `status`, per command).
    Data(Value),
    /// The server refused the request; carries the error message text.
    Rejected(String),
}

impl Outcome {
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The response value, if the request was not rejected.
    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Data(v) => Some(v),
            Self::Rejected(_) => None,
        }
    }
}

/// Client for one entity service endpoint.
///
/// Immutable after construction and cheap to clone; clones share the
/// underlying HTTP connection pool.
#[derive(Clone)]
pub struct EntityServiceClient {
    base_url: Url,
    http: Client,
    timeout: Duration,
}

impl EntityServiceClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the configuration does not produce
    /// a valid base URL.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url()?,
            http: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout (default 30 seconds).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch one entity by id. Returns the `data` field.
    pub async fn get_entity(
        &self,
        entity: &str,
        id: &str,
        schema: Option<&str>,
    ) -> Result<Outcome> {
        let mut args = Map::new();
        args.insert("name".into(), entity_path(entity, schema).into());
        args.insert("id".into(), id.into());
        self.execute(Command::GetEntity, &args).await
    }

    /// Create an entity from a JSON document. Returns the `data` field.
    ///
    /// With `create_model` set, first issues exactly one
    /// [`create_entity_model`](Self::create_entity_model) call for the same
    /// entity path; if the model creation is rejected, the rejection is
    /// returned and the entity is not created.
    pub async fn create_entity(
        &self,
        entity: &str,
        data: Value,
        schema: Option<&str>,
        create_model: bool,
    ) -> Result<Outcome> {
        if create_model {
            let model = self.create_entity_model(entity, data.clone(), schema).await?;
            if model.is_rejected() {
                return Ok(model);
            }
        }

        let mut args = Map::new();
        args.insert("name".into(), entity_path(entity, schema).into());
        args.insert("data".into(), data);
        self.execute(Command::CreateEntity, &args).await
    }

    /// Delete one entity by id. Returns the `status` field verbatim.
    pub async fn delete_entity(
        &self,
        entity: &str,
        id: &str,
        schema: Option<&str>,
    ) -> Result<Outcome> {
        let mut args = Map::new();
        args.insert("name".into(), entity_path(entity, schema).into());
        args.insert("id".into(), id.into());
        self.execute(Command::DeleteEntity, &args).await
    }

    /// Execute a single SQL statement. Returns the `data` field.
    pub async fn execute_sql(&self, sql: &str) -> Result<Outcome> {
        let mut args = Map::new();
        args.insert("q".into(), sql.into());
        self.execute(Command::ExecuteQuery, &args).await
    }

    /// Execute several SQL statements as one batch. Returns the `data` field.
    ///
    /// Statements are joined into a single payload with `;` terminators
    /// (`["SELECT 1", "SELECT 2"]` becomes `"SELECT 1;SELECT 2;"`). The join
    /// is naive: statements that themselves contain `;` are not escaped, and
    /// the server decides how the batch splits.
    pub async fn execute_sql_batch<S: AsRef<str>>(&self, statements: &[S]) -> Result<Outcome> {
        let mut payload = String::new();
        for statement in statements {
            payload.push_str(statement.as_ref());
            payload.push(';');
        }

        let mut args = Map::new();
        args.insert("queries".into(), payload.into());
        self.execute(Command::ExecuteQueries, &args).await
    }

    /// Create an entity model from a JSON specification. Returns the `data`
    /// field.
    pub async fn create_entity_model(
        &self,
        entity: &str,
        data: Value,
        schema: Option<&str>,
    ) -> Result<Outcome> {
        let mut args = Map::new();
        args.insert("name".into(), entity_path(entity, schema).into());
        args.insert("data".into(), data);
        self.execute(Command::CreateModel, &args).await
    }

    /// Report the server version. Returns the `data` field.
    pub async fn server_version(&self) -> Result<Outcome> {
        self.execute(Command::Version, &Map::new()).await
    }

    async fn execute(&self, command: Command, args: &Map<String, Value>) -> Result<Outcome> {
        let desc = command.descriptor();

        let mut path = desc.path.to_string();
        let mut query_params: Vec<(&str, String)> = Vec::new();
        let mut body: Option<Value> = None;

        for param in desc.params {
            let value = match param.fixed {
                Some(fixed) => Some(Value::String(fixed.to_string())),
                None => args.get(param.name).cloned(),
            };

            let Some(value) = value else {
                if param.required {
                    return Err(ClientError::Request(format!(
                        "missing required parameter '{}' for {command:?}",
                        param.name
                    )));
                }
                continue;
            };

            match param.location {
                ParamLocation::Path => {
                    path = path.replace(&format!("{{{}}}", param.name), &value_to_string(&value));
                }
                ParamLocation::Query => {
                    query_params.push((param.name, value_to_string(&value)));
                }
                ParamLocation::Body => body = Some(value),
            }
        }

        let raw = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        let mut url = Url::parse(&raw)
            .map_err(|e| ClientError::Request(format!("invalid request URL: {e}")))?;
        for (key, value) in &query_params {
            url.query_pairs_mut().append_pair(key, value);
        }

        debug!(
            method = %desc.method,
            url = %redact_url(&url),
            command = ?command,
            "dispatching command"
        );

        let mut request = self
            .http
            .request(desc.method.clone(), url)
            .timeout(self.timeout);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            let parsed: Value = serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Request(format!("{command:?} response is not valid JSON: {e}"))
            })?;
            let key = desc.response_field.key();
            match parsed.get(key) {
                Some(value) => Ok(Outcome::Data(value.clone())),
                None => Err(ClientError::Request(format!(
                    "{command:?} response is missing the '{key}' field"
                ))),
            }
        } else {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let text = String::from_utf8_lossy(&bytes).into_owned();
            if status.is_client_error() {
                Ok(Outcome::Rejected(format!(
                    "API returned {} {reason}: {text}",
                    status.as_u16()
                )))
            } else {
                Err(ClientError::Server {
                    status: status.as_u16(),
                    reason,
                    body: text,
                })
            }
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}
