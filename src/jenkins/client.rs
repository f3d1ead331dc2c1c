use crate::app::Build;
use crate::jenkins::error::{FetchError, Result};
use crate::jenkins::{parser, resolver};
use reqwest::StatusCode;
use std::time::Duration;

/// Number of builds requested per fetch.
pub const BUILD_COUNT: u32 = 50;

/// Field projection understood by the server's `api/json` endpoint.
pub const TREE_PROJECTION: &str =
    "appData[info[buildHistoryTabs,builds[*,commit[*],cause[*],parameters[*]]]]";

/// Branch tab covering every branch of the job.
pub const BRANCH_TAB: &str = "All";

/// HTTP client bound to a single org/repo job.
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    http: reqwest::Client,
    job_url: String,
}

impl JenkinsClient {
    pub fn new(server_url: &str, repo: &str, timeout: Option<Duration>) -> Result<Self> {
        let job_url = resolver::resolve(server_url, repo)?;
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("jhw/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, job_url })
    }

    pub fn job_url(&self) -> &str {
        &self.job_url
    }

    pub fn history_url(&self) -> String {
        format!("{}api/json/", self.job_url)
    }

    pub fn build_url(&self, number: u64) -> String {
        resolver::build_url(&self.job_url, number)
    }

    /// Fetches the latest `BUILD_COUNT` builds across all branches.
    pub async fn fetch_history(&self) -> Result<Vec<Build>> {
        let url = self.history_url();
        let count = BUILD_COUNT.to_string();
        tracing::debug!("GET {url}");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("tree", TREE_PROJECTION),
                ("branchTab", BRANCH_TAB),
                ("count", count.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await?;
        let builds = parser::parse_history(&body)?;
        tracing::info!("fetched {} builds from {url}", builds.len());
        Ok(builds)
    }
}
