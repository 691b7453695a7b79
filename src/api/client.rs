use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use super::jsonp;
use super::models::{ActivityTree, ReferenceData, SubmitOutcome};
use crate::report::encode;
use crate::report::form::ReportDraft;

/// HTTP client for the spreadsheet-backed report endpoint.
///
/// One endpoint serves both directions: `GET ?q=<dataset>` for the dropdown
/// data and `POST` for report submission.
#[derive(Clone)]
pub struct ReportClient {
    endpoint: String,
    token: String,
    http: reqwest::Client,
}

impl ReportClient {
    pub fn new(endpoint: String, token: String) -> Self {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("worklog-cli/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            endpoint,
            token,
            http,
        }
    }

    /// Fetch the activity → sub-activities mapping.
    pub async fn fetch_activity_tree(&self) -> Result<ActivityTree> {
        self.fetch_dataset("activityTree").await
    }

    /// Fetch the user name list.
    pub async fn fetch_names(&self) -> Result<Vec<String>> {
        self.fetch_dataset("names").await
    }

    /// Load both dropdown datasets, awaited in sequence.
    ///
    /// Failures are recovered locally: a failed tree fetch falls back to an
    /// entirely empty snapshot without attempting the name fetch, a failed
    /// name fetch keeps the tree and leaves the names empty. The form stays
    /// usable either way.
    pub async fn load_reference(&self) -> ReferenceData {
        let activity_tree = match self.fetch_activity_tree().await {
            Ok(tree) => {
                info!("Loaded activity tree with {} activities", tree.len());
                tree
            }
            Err(err) => {
                warn!("Failed to load activity tree: {:#}", err);
                return ReferenceData::default();
            }
        };

        let names = match self.fetch_names().await {
            Ok(names) => {
                info!("Loaded {} names", names.len());
                names
            }
            Err(err) => {
                warn!("Failed to load name list: {:#}", err);
                Vec::new()
            }
        };

        ReferenceData {
            activity_tree,
            names,
        }
    }

    /// Post a validated report as a form-url-encoded body.
    ///
    /// The response body is not interpreted: the endpoint was built for
    /// opaque cross-origin writes, so any response at all counts as
    /// `Accepted` and only a transport-level error (connect failure,
    /// timeout) maps to `Failed`. A fresh submission identifier is attached
    /// so the backend can drop duplicate retries of the same report.
    pub async fn submit(&self, draft: &ReportDraft) -> SubmitOutcome {
        let sid = uuid::Uuid::new_v4().to_string();
        let pairs = encode::submission_pairs(draft, &self.token, &sid);
        let body = encode::encode_form(&pairs);
        debug!("Submitting report sid={} ({} rows)", sid, draft.rows.len());

        match self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
        {
            Ok(response) => {
                info!(
                    "Report sid={} accepted (transport status {})",
                    sid,
                    response.status()
                );
                SubmitOutcome::Accepted
            }
            Err(err) => {
                warn!("Report sid={} failed to send: {:#}", sid, err);
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    async fn fetch_dataset<T: DeserializeOwned>(&self, dataset: &str) -> Result<T> {
        let callback = jsonp::callback_name();
        debug!("Fetching dataset {} (callback {})", dataset, callback);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", dataset), ("callback", callback.as_str())])
            .send()
            .await
            .with_context(|| format!("request for dataset '{}' failed", dataset))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("dataset '{}' fetch failed with status {}", dataset, status);
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("failed to read dataset '{}' response", dataset))?;

        jsonp::parse_payload(&text, &callback)
            .with_context(|| format!("dataset '{}' returned unusable data", dataset))
    }
}
