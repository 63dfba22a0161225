//! Record store lookup over HTTP (PostgREST-style point query)

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

use baseconnect_core::prelude::*;
use baseconnect_core::Equipment;

use super::EquipmentLookup;
use crate::config::LookupSettings;

/// `GET {base}/rest/v1/{table}?select=*&{column}=eq.{code}&limit=1`
#[derive(Debug)]
pub struct RestEquipmentStore {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    table: String,
    code_column: String,
}

impl RestEquipmentStore {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        table: impl Into<String>,
        code_column: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid lookup.base_url {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "lookup.base_url {} cannot carry a path",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            table: table.into(),
            code_column: code_column.into(),
        })
    }

    pub fn from_settings(settings: &LookupSettings) -> Result<Self> {
        let base_url = settings.base_url.as_deref().ok_or_else(|| {
            Error::config("lookup.base_url is required (or set BASECONNECT_URL)")
        })?;
        Self::new(
            base_url,
            settings.api_key.clone(),
            settings.table.clone(),
            settings.code_column.clone(),
            Duration::from_millis(settings.timeout_ms),
        )
    }

    /// Query URL for one code
    pub fn query_url(&self, code: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("lookup.base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(["rest", "v1", self.table.as_str()]);
        url.query_pairs_mut()
            .clear()
            .append_pair("select", "*")
            .append_pair(&self.code_column, &format!("eq.{}", code))
            .append_pair("limit", "1");
        Ok(url)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &self.api_key {
            let apikey = HeaderValue::from_str(key)
                .map_err(|e| Error::config(format!("invalid api key: {}", e)))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| Error::config(format!("invalid api key: {}", e)))?;
            headers.insert("apikey", apikey);
            headers.insert(AUTHORIZATION, bearer);
        }
        Ok(headers)
    }
}

impl EquipmentLookup for RestEquipmentStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Equipment>> {
        let url = self.query_url(code)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| Error::lookup(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::lookup(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::lookup(error_message(status.as_u16(), &body)));
        }

        let mut rows: Vec<Equipment> = serde_json::from_str(&body)
            .map_err(|e| Error::lookup(format!("unexpected response: {}", e)))?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }
}

/// The backend's own `message`, falling back to the HTTP status
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}
