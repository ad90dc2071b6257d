use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::pager::FilterState;
use crate::record::LogRecord;

/// Which side of the API the viewer is on. Privileged viewers query across
/// channels; restricted viewers get the `self` sub-route and lose the
/// channel / submit-code / status columns in the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Response envelope shared by every gateway endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<Option<T>> {
        if !self.success {
            let msg = if self.message.is_empty() {
                "request rejected by the gateway".to_string()
            } else {
                self.message
            };
            return Err(Error::msg(msg));
        }
        Ok(self.data)
    }
}

#[derive(Debug)]
pub struct ApiClient {
    base: String,
    token: Option<String>,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::msg(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn decode<T: DeserializeOwned>(res: reqwest::blocking::Response) -> Result<Option<T>> {
        let status = res.status();
        if !status.is_success() {
            return Err(Error::msg(format!("gateway returned HTTP {status}")));
        }
        let env: Envelope<T> = res
            .json()
            .map_err(|e| Error::msg(format!("malformed gateway response: {e}")))?;
        env.into_data()
    }

    fn send(&self, req: reqwest::blocking::RequestBuilder) -> Result<reqwest::blocking::Response> {
        let req = match self.token.as_deref() {
            Some(t) => req.bearer_auth(t),
            None => req,
        };
        req.send()
            .map_err(|e| Error::msg(format!("gateway request failed: {e}")))
    }

    /// Fetch one page of task logs. `page_index` is zero-based; the filter
    /// fields ride along verbatim (empty ids stay empty parameters, which
    /// the gateway treats as "no constraint").
    pub fn list_logs(
        &self,
        role: Role,
        page_index: usize,
        filters: &FilterState,
    ) -> Result<Vec<LogRecord>> {
        let url = match role {
            Role::Admin => format!(
                "{}/api/mj/?p={}&channel_id={}&mj_id={}&start_timestamp={}&end_timestamp={}",
                self.base,
                page_index,
                filters.channel_id,
                filters.mj_id,
                filters.start_timestamp,
                filters.end_timestamp
            ),
            Role::User => format!(
                "{}/api/mj/self/?p={}&mj_id={}&start_timestamp={}&end_timestamp={}",
                self.base,
                page_index,
                filters.mj_id,
                filters.start_timestamp,
                filters.end_timestamp
            ),
        };
        tracing::debug!(page_index, %url, "fetching task logs");
        let res = self.send(self.http.get(&url))?;
        let data: Option<Vec<LogRecord>> = Self::decode(res)?;
        Ok(data.unwrap_or_default())
    }

    /// Generic settings write: `PUT /api/option/` with `{key, value}`.
    pub fn set_option(&self, key: &str, value: &str) -> Result<()> {
        let url = format!("{}/api/option/", self.base);
        tracing::debug!(key, "writing gateway option");
        let body = serde_json::json!({ "key": key, "value": value });
        let res = self.send(self.http.put(&url).json(&body))?;
        Self::decode::<serde_json::Value>(res)?;
        Ok(())
    }

    /// Purge logs older than the target time; returns the count purged.
    pub fn purge_logs(&self, target_timestamp_secs: i64) -> Result<i64> {
        let url = format!(
            "{}/api/log/?target_timestamp={}",
            self.base, target_timestamp_secs
        );
        tracing::debug!(target_timestamp_secs, "purging logs");
        let res = self.send(self.http.delete(&url))?;
        let data: Option<i64> = Self::decode(res)?;
        Ok(data.unwrap_or(0))
    }
}
