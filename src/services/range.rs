//! Start positions and export ranges

use std::fmt;
use std::str::FromStr;

use crate::core::{IndexerError, IndexerResult, LedgerBounds, SourceError};

/// Where an export or ingest run begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPosition {
    /// Absolute sequence; 0 means the first known ledger
    Absolute(u32),
    /// `+N`: N ledgers after the first known ledger
    FromFirst(u32),
    /// `-N`: the N-th ledger counting back from the last known ledger
    FromLast(u32),
}

impl StartPosition {
    /// Whether resolving needs the source's ledger bounds
    pub fn needs_bounds(&self) -> bool {
        !matches!(self, StartPosition::Absolute(seq) if *seq > 0)
    }

    /// Resolve to an absolute sequence
    pub fn resolve(&self, bounds: Option<LedgerBounds>) -> IndexerResult<u32> {
        if let StartPosition::Absolute(seq) = self {
            if *seq > 0 {
                return Ok(*seq);
            }
        }

        let bounds = bounds.ok_or(IndexerError::Source(SourceError::Empty))?;
        let seq = match self {
            StartPosition::Absolute(_) => bounds.first,
            StartPosition::FromFirst(offset) => bounds.first.saturating_add(*offset),
            StartPosition::FromLast(offset) => {
                bounds.last.saturating_add(1).checked_sub(*offset).ok_or_else(|| {
                    IndexerError::Configuration(format!(
                        "Start offset -{} reaches before ledger 0",
                        offset
                    ))
                })?
            }
        };
        Ok(seq)
    }
}

impl Default for StartPosition {
    fn default() -> Self {
        StartPosition::Absolute(0)
    }
}

impl FromStr for StartPosition {
    type Err = IndexerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IndexerError::Configuration(format!("Invalid start position: {:?}", s));
        let s = s.trim();

        let (ctor, digits): (fn(u32) -> StartPosition, &str) = if let Some(rest) = s.strip_prefix('+') {
            (StartPosition::FromFirst, rest)
        } else if let Some(rest) = s.strip_prefix('-') {
            (StartPosition::FromLast, rest)
        } else {
            (StartPosition::Absolute, s)
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.parse().map(ctor).map_err(|_| invalid())
    }
}

impl fmt::Display for StartPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartPosition::Absolute(seq) => write!(f, "{}", seq),
            StartPosition::FromFirst(offset) => write!(f, "+{}", offset),
            StartPosition::FromLast(offset) => write!(f, "-{}", offset),
        }
    }
}

/// Half-open ledger range `[start, start + count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRange {
    start: u32,
    count: u32,
}

impl ExportRange {
    /// A range with no ledgers is rejected before any work happens
    pub fn new(start: u32, count: u32) -> IndexerResult<Self> {
        if count == 0 {
            return Err(IndexerError::EmptyRange { start, end: start });
        }
        start.checked_add(count).ok_or_else(|| {
            IndexerError::Configuration(format!("Range {}+{} overflows", start, count))
        })?;
        Ok(Self { start, count })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Resolve a CLI start/count pair. A missing count runs through the
    /// last known ledger.
    pub fn resolve(
        start: StartPosition,
        count: Option<u32>,
        bounds: Option<LedgerBounds>,
    ) -> IndexerResult<Self> {
        let first = start.resolve(bounds)?;
        let count = match count {
            Some(count) => count,
            None => {
                let bounds = bounds.ok_or(IndexerError::Source(SourceError::Empty))?;
                bounds.last.saturating_add(1).saturating_sub(first)
            }
        };
        Self::new(first, count)
    }

    /// Exclusive upper bound
    pub fn end(&self) -> u32 {
        self.start + self.count
    }

    pub fn contains(&self, seq: u32) -> bool {
        seq >= self.start && seq < self.end()
    }

    /// Split into consecutive sub-ranges of at most `size` ledgers
    pub fn chunks(&self, size: u32) -> Vec<ExportRange> {
        let size = size.max(1);
        let mut chunks = Vec::new();
        let mut start = self.start;
        while start < self.end() {
            let count = size.min(self.end() - start);
            chunks.push(ExportRange { start, count });
            start += count;
        }
        chunks
    }
}

impl fmt::Display for ExportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: LedgerBounds = LedgerBounds {
        first: 100,
        last: 199,
    };

    #[test]
    fn parses_signed_positions() {
        assert_eq!("250".parse::<StartPosition>().unwrap(), StartPosition::Absolute(250));
        assert_eq!("+10".parse::<StartPosition>().unwrap(), StartPosition::FromFirst(10));
        assert_eq!("-10".parse::<StartPosition>().unwrap(), StartPosition::FromLast(10));
        assert!("".parse::<StartPosition>().is_err());
        assert!("+".parse::<StartPosition>().is_err());
        assert!("ten".parse::<StartPosition>().is_err());
        assert!("1-2".parse::<StartPosition>().is_err());
    }

    #[test]
    fn resolves_against_bounds() {
        assert_eq!(StartPosition::Absolute(0).resolve(Some(BOUNDS)).unwrap(), 100);
        assert_eq!(StartPosition::Absolute(150).resolve(None).unwrap(), 150);
        assert_eq!(StartPosition::FromFirst(5).resolve(Some(BOUNDS)).unwrap(), 105);
        assert_eq!(StartPosition::FromLast(10).resolve(Some(BOUNDS)).unwrap(), 190);
        assert!(StartPosition::FromFirst(5).resolve(None).is_err());
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(matches!(
            ExportRange::new(100, 0),
            Err(IndexerError::EmptyRange { start: 100, .. })
        ));
    }

    #[test]
    fn overflowing_range_is_rejected() {
        assert!(matches!(
            ExportRange::new(u32::MAX - 1, 5),
            Err(IndexerError::Configuration(_))
        ));
        let last = ExportRange::new(u32::MAX - 1, 1).unwrap();
        assert_eq!(last.end(), u32::MAX);
    }

    #[test]
    fn missing_count_runs_to_last_ledger() {
        let range = ExportRange::resolve(StartPosition::FromLast(10), None, Some(BOUNDS)).unwrap();
        assert_eq!((range.start(), range.count()), (190, 10));
        assert_eq!(range.end(), 200);
    }

    #[test]
    fn chunks_cover_range_exactly() {
        let range = ExportRange::new(100, 120).unwrap();
        let chunks = range.chunks(50);
        assert_eq!(
            chunks,
            vec![
                ExportRange::new(100, 50).unwrap(),
                ExportRange::new(150, 50).unwrap(),
                ExportRange::new(200, 20).unwrap(),
            ]
        );
        assert!(range.contains(219));
        assert!(!range.contains(220));
    }
}
