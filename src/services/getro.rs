// src/services/getro.rs

//! Getro job-board API client.
//!
//! Fetches every job of one network, filtered to a single job function,
//! walking the paginated `/networks/{id}/jobs` endpoint page by page.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, Job, JobId, Secrets};

/// Results per page requested from the API.
pub const PAGE_SIZE: u64 = 100;

/// A page that could not be fetched after the first one succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: u64,
    pub reason: String,
}

/// Outcome of fetching one network.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Every page was fetched
    Complete(Vec<Job>),
    /// The first page succeeded but some later pages did not
    Partial {
        jobs: Vec<Job>,
        failures: Vec<PageFailure>,
    },
    /// The first request failed; no usable data
    Failed { reason: String },
}

impl FetchOutcome {
    /// Jobs that were fetched, if any request succeeded.
    pub fn into_jobs(self) -> Option<Vec<Job>> {
        match self {
            FetchOutcome::Complete(jobs) | FetchOutcome::Partial { jobs, .. } => Some(jobs),
            FetchOutcome::Failed { .. } => None,
        }
    }
}

/// A source of job listings for a network.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch every current job of `network_id`.
    async fn fetch_jobs(&self, network_id: &str) -> FetchOutcome;
}

#[derive(Debug, Deserialize)]
struct JobsPage {
    meta: PageMeta,
    #[serde(default)]
    items: Vec<ApiJob>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ApiJob {
    id: JobId,
    title: Option<String>,
    url: Option<String>,
    company: Option<ApiCompany>,
}

#[derive(Debug, Deserialize)]
struct ApiCompany {
    name: Option<String>,
}

impl From<ApiJob> for Job {
    fn from(item: ApiJob) -> Self {
        Job {
            id: item.id,
            title: item.title.unwrap_or_default(),
            url: item.url.unwrap_or_default(),
            company: item.company.and_then(|c| c.name).unwrap_or_default(),
        }
    }
}

/// Client for the Getro v2 API.
pub struct GetroClient {
    client: Client,
    base_url: String,
    job_function: String,
    email: String,
    token: String,
}

impl GetroClient {
    /// Create a client using the given HTTP client, API settings and credentials.
    pub fn new(client: Client, api: &ApiConfig, secrets: &Secrets) -> Self {
        Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            job_function: api.job_function.clone(),
            email: secrets.email.clone(),
            token: secrets.token.clone(),
        }
    }

    /// Number of pages needed for `total` results.
    pub fn page_count(total: u64) -> u64 {
        total.div_ceil(PAGE_SIZE)
    }

    fn jobs_url(&self, network_id: &str) -> String {
        format!("{}/networks/{}/jobs", self.base_url, network_id)
    }

    async fn fetch_page(&self, network_id: &str, page: u64) -> Result<JobsPage> {
        let response = self
            .client
            .get(self.jobs_url(network_id))
            .query(&[
                ("page", page.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
                ("job_functions", self.job_function.clone()),
            ])
            .header("X-User-Email", &self.email)
            .header("X-User-Token", &self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::api(
                format!("network {network_id} page {page}"),
                status,
            ));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl JobSource for GetroClient {
    async fn fetch_jobs(&self, network_id: &str) -> FetchOutcome {
        let first = match self.fetch_page(network_id, 1).await {
            Ok(page) => page,
            Err(error) => {
                log::error!("Failed to fetch network {network_id}: {error}");
                return FetchOutcome::Failed {
                    reason: error.to_string(),
                };
            }
        };

        let total_pages = Self::page_count(first.meta.total);
        log::info!(
            "Network {}: {} jobs across {} pages",
            network_id,
            first.meta.total,
            total_pages
        );

        let mut jobs: Vec<Job> = first.items.into_iter().map(Job::from).collect();
        let mut failures = Vec::new();

        for page in 2..=total_pages {
            match self.fetch_page(network_id, page).await {
                Ok(result) => jobs.extend(result.items.into_iter().map(Job::from)),
                Err(error) => {
                    log::warn!("Skipping page {page} of network {network_id}: {error}");
                    failures.push(PageFailure {
                        page,
                        reason: error.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            FetchOutcome::Complete(jobs)
        } else {
            FetchOutcome::Partial { jobs, failures }
        }
    }
}
