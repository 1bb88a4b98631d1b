use std::collections::{BTreeMap, HashMap};
use std::fs::Metadata;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::artifact::content::{self, SHA256};
use crate::language::{self, SAMPLE_LIMIT};
use crate::report::model::{Artifact, ArtifactLocation};

/// De-duplicated, insertion-ordered list of the files a run touched.
///
/// Identity is the location string exactly as given; no path normalization
/// happens, so `./a` and `a` are two artifacts. Serializes as the bare SARIF
/// `artifacts` array.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ArtifactRegistry {
    artifacts: Vec<Artifact>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    sample_len: usize,
}

impl Default for ArtifactRegistry {
    fn default() -> Self {
        Self::with_sample_len(SAMPLE_LIMIT)
    }
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose language sniffing reads at most `sample_len` bytes.
    pub fn with_sample_len(sample_len: usize) -> Self {
        Self {
            artifacts: Vec::new(),
            index: HashMap::new(),
            sample_len: sample_len.min(SAMPLE_LIMIT),
        }
    }

    /// Return the artifact for `location`, creating it on first sight.
    ///
    /// Creation takes the length from `metadata` and then reads the file once
    /// for its SHA-256 and a language sample. Either may be missing from the
    /// result if the read fails; registration itself never fails.
    pub fn record(&mut self, location: &str, metadata: &Metadata) -> &Artifact {
        if let Some(&idx) = self.index.get(location) {
            return &self.artifacts[idx];
        }

        let scan = content::scan(Path::new(location), self.sample_len);

        let mut hashes = BTreeMap::new();
        if let Some(digest) = scan.sha256 {
            hashes.insert(SHA256.to_string(), digest);
        }

        let source_language = scan
            .sample
            .as_deref()
            .and_then(|sample| language::classify(location, sample).confident_language())
            .map(str::to_string);

        debug!(
            location,
            length = metadata.len(),
            hashed = !hashes.is_empty(),
            language = source_language.as_deref().unwrap_or("-"),
            "recorded artifact"
        );

        let idx = self.artifacts.len();
        self.artifacts.push(Artifact {
            location: ArtifactLocation {
                uri: location.to_string(),
            },
            length: metadata.len(),
            hashes,
            source_language,
        });
        self.index.insert(location.to_string(), idx);

        &self.artifacts[idx]
    }

    /// Position of `location` in the artifact list, for SARIF `index` links.
    pub fn position(&self, location: &str) -> Option<usize> {
        self.index.get(location).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.artifacts.iter()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
