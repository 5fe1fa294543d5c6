//! Ledger source reading newline-delimited JSON ledger records
//!
//! One `LedgerRecord` per line, ascending by sequence. The subscription
//! tails the file and picks up appended lines.

use async_trait::async_trait;
use futures::stream;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::core::{
    IndexerError, IndexerResult, LedgerBounds, LedgerRecord, LedgerSource, LedgerStream,
    SourceError,
};

const SUBSCRIPTION_BUFFER: usize = 16;

pub struct NdjsonLedgerSource {
    path: PathBuf,
    poll_interval: Duration,
}

impl NdjsonLedgerSource {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            path: path.into(),
            poll_interval,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> IndexerResult<Lines<BufReader<File>>> {
        let file = File::open(&self.path).await.map_err(|e| {
            SourceError::Io(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(BufReader::new(file).lines())
    }
}

fn parse_record(line: &str, line_no: usize) -> IndexerResult<LedgerRecord> {
    serde_json::from_str(line).map_err(|e| {
        SourceError::MalformedRecord {
            line: line_no,
            reason: e.to_string(),
        }
        .into()
    })
}

struct RangeCursor {
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

#[async_trait]
impl LedgerSource for NdjsonLedgerSource {
    /// Each call opens the file and scans from the first line, so a chunked
    /// export reads the prefix before every chunk again.
    async fn stream_range(&self, start: u32, end: u32) -> IndexerResult<LedgerStream> {
        let cursor = RangeCursor {
            lines: self.open().await?,
            line_no: 0,
        };

        let records = stream::unfold(Some(cursor), move |state| async move {
            let mut cursor = state?;
            loop {
                cursor.line_no += 1;
                let line = match cursor.lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => return None,
                    Err(e) => return Some((Err(IndexerError::from(e)), None)),
                };
                if line.trim().is_empty() {
                    continue;
                }

                match parse_record(&line, cursor.line_no) {
                    Ok(record) if record.seq() < start => continue,
                    Ok(record) if record.seq() >= end => return None,
                    Ok(record) => return Some((Ok(record), Some(cursor))),
                    Err(e) => return Some((Err(e), None)),
                }
            }
        });

        Ok(Box::pin(records))
    }

    async fn subscribe(&self, start: Option<u32>) -> IndexerResult<LedgerStream> {
        let file = File::open(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {}", self.path.display(), e)))?;
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let poll_interval = self.poll_interval;

        info!(path = %self.path.display(), ?start, "Tailing ledger file");
        tokio::spawn(async move {
            let mut reader = BufReader::new(file);
            let mut line = String::new();
            let mut line_no = 0;

            loop {
                if tx.is_closed() {
                    debug!("Subscriber gone, stop tailing");
                    return;
                }

                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        tokio::time::sleep(poll_interval).await;
                        continue;
                    }
                    Ok(_) if !line.ends_with('\n') => {
                        // Partially written line, wait for the rest
                        tokio::time::sleep(poll_interval).await;
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        let _ = tx.send(Err(IndexerError::from(e))).await;
                        return;
                    }
                }

                line_no += 1;
                if line.trim().is_empty() {
                    line.clear();
                    continue;
                }

                let parsed = parse_record(line.trim_end(), line_no);
                line.clear();
                let failed = parsed.is_err();
                if let Ok(record) = &parsed {
                    if start.map_or(false, |start| record.seq() < start) {
                        continue;
                    }
                }
                if tx.send(parsed).await.is_err() || failed {
                    return;
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn ledger_bounds(&self) -> IndexerResult<Option<LedgerBounds>> {
        let mut lines = self.open().await?;
        let mut line_no = 0;
        let mut bounds: Option<LedgerBounds> = None;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let seq = match parse_record(&line, line_no) {
                Ok(record) => record.seq(),
                Err(e) => {
                    warn!("Skipping unreadable record: {}", e);
                    continue;
                }
            };

            bounds = Some(match bounds {
                None => LedgerBounds {
                    first: seq,
                    last: seq,
                },
                Some(b) => LedgerBounds {
                    first: b.first.min(seq),
                    last: b.last.max(seq),
                },
            });
        }

        Ok(bounds)
    }
}
