//! Contract with the service that identifies cropped pieces.
//!
//! Nothing here talks to a network. An identifier receives piece files in
//! the order `extract` wrote them and answers with one result per file;
//! the file path (and its index) is the key results are correlated by.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// One ranked guess for a piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IdentificationResult {
    /// Candidates ranked best first
    Success { items: Vec<Candidate> },
    Failure {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
}

impl IdentificationResult {
    pub fn best(&self) -> Option<&Candidate> {
        match self {
            IdentificationResult::Success { items } => items.first(),
            IdentificationResult::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, IdentificationResult::Success { .. })
    }
}

pub trait PieceIdentifier {
    fn identify(&self, piece: &Path) -> IdentificationResult;

    /// Identify every piece, answering in the order given
    fn identify_all(&self, pieces: &[PathBuf]) -> Vec<(PathBuf, IdentificationResult)> {
        pieces
            .iter()
            .map(|p| (p.clone(), self.identify(p)))
            .collect()
    }
}

/// Enforces a minimum interval between calls made through one client
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Time left before the next call may proceed
    pub fn remaining(&self, now: Instant) -> Duration {
        let last = self.last_call.lock().unwrap_or_else(|e| e.into_inner());
        match *last {
            Some(at) => self.min_interval.saturating_sub(now.saturating_duration_since(at)),
            None => Duration::ZERO,
        }
    }

    /// Block until the interval since the previous call has passed, then record this call
    pub fn wait(&self) {
        let mut last = self.last_call.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

/// Unbounded memo of previously fetched values
#[derive(Debug)]
pub struct Memoized<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for Memoized<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Memoized<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert_with(&self, key: K, fetch: impl FnOnce(&K) -> V) -> V {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(value) = entries.get(&key) {
            return value.clone();
        }
        let value = fetch(&key);
        entries.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
