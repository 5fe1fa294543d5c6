//! Elasticsearch client implementing the index sink and catalog ports

mod responses;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use self::responses::{BulkResponse, SearchResponse};
use crate::config::ElasticConfig;
use crate::core::{IndexCatalog, IndexSink, IndexStats, IndexerResult, SinkError};
use crate::domain::models::{BulkBuffer, ALL_INDEXES, LEDGERS_INDEX};

const NDJSON: &str = "application/x-ndjson";

/// Field holding the ledger sequence in ledger documents
const SEQ_FIELD: &str = "seq";

pub struct ElasticClient {
    client: Client,
    base_url: String,
    scan_page_size: usize,
}

impl ElasticClient {
    pub fn new(config: &ElasticConfig) -> IndexerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            scan_page_size: config.scan_page_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn search(&self, index: &str, body: serde_json::Value) -> IndexerResult<Option<SearchResponse>> {
        let response = self
            .client
            .post(self.url(&format!("{}/_search", index)))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(SinkError::Rejected {
                status: status.as_u16(),
            }
            .into()),
        }
    }

    async fn delete_index(&self, index: &str) -> IndexerResult<()> {
        let response = self.client.delete(self.url(index)).send().await?;
        match response.status() {
            status if status.is_success() => {
                info!(index, "Index deleted");
                Ok(())
            }
            StatusCode::NOT_FOUND => Ok(()),
            status => Err(SinkError::Rejected {
                status: status.as_u16(),
            }
            .into()),
        }
    }

    async fn create_index(&self, index: &str) -> IndexerResult<()> {
        let response = self.client.put(self.url(index)).send().await?;
        let status = response.status();
        if status.is_success() {
            info!(index, "Index created");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            info!(index, "Index already exists");
            return Ok(());
        }

        warn!(index, %status, "Index creation failed: {}", body);
        Err(SinkError::Rejected {
            status: status.as_u16(),
        }
        .into())
    }
}

#[async_trait]
impl IndexSink for ElasticClient {
    async fn bulk_insert(&self, bulk: &BulkBuffer) -> IndexerResult<()> {
        let response = self
            .client
            .post(self.url("_bulk"))
            .header(reqwest::header::CONTENT_TYPE, NDJSON)
            .body(bulk.as_str().to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            }
            .into());
        }

        let body: BulkResponse = response
            .json()
            .await
            .map_err(|e| SinkError::UnexpectedResponse(e.to_string()))?;

        if body.errors {
            if let Some(reason) = body.first_error() {
                warn!("Bulk item rejected: {}", reason);
            }
            return Err(SinkError::ItemErrors.into());
        }

        debug!(
            documents = bulk.documents(),
            took_ms = body.took,
            "Bulk accepted"
        );
        Ok(())
    }
}

#[async_trait]
impl IndexCatalog for ElasticClient {
    async fn create_indexes(&self, force: bool) -> IndexerResult<()> {
        for index in ALL_INDEXES {
            if force {
                self.delete_index(index).await?;
            }
            self.create_index(index).await?;
        }
        Ok(())
    }

    async fn ledger_stats(&self) -> IndexerResult<IndexStats> {
        let body = json!({
            "size": 0,
            "track_total_hits": true,
            "aggs": {
                "min_seq": { "min": { "field": SEQ_FIELD } },
                "max_seq": { "max": { "field": SEQ_FIELD } }
            }
        });

        let Some(response) = self.search(LEDGERS_INDEX, body).await? else {
            return Ok(IndexStats::default());
        };

        Ok(IndexStats {
            count: response.total(),
            min_seq: response.aggregate("min_seq"),
            max_seq: response.aggregate("max_seq"),
        })
    }

    async fn indexed_ledger_seqs(&self, from: u32, to: u32) -> IndexerResult<Vec<u32>> {
        let mut seqs = Vec::new();
        let mut after: Option<u32> = None;

        loop {
            let mut body = json!({
                "size": self.scan_page_size,
                "_source": false,
                "query": { "range": { "seq": { "gte": from, "lte": to } } },
                "sort": [ { "seq": "asc" } ]
            });
            if let Some(after) = after {
                body["search_after"] = json!([after]);
            }

            let Some(response) = self.search(LEDGERS_INDEX, body).await? else {
                break;
            };

            let page = response.sort_keys();
            let page_len = page.len();
            after = page.last().copied();
            seqs.extend(page);

            if page_len < self.scan_page_size {
                break;
            }
        }

        debug!(from, to, found = seqs.len(), "Scanned indexed ledgers");
        Ok(seqs)
    }
}
