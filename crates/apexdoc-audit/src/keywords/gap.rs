//! Gap Analysis
//!
//! Set arithmetic between the keys found in configuration files and the
//! keys the reference document covers.

use super::{Classification, Extraction, GapClassifier, KeywordSet, ReferenceKeys};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Found vs documented keyword comparison
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Keys observed in configuration files
    pub found: KeywordSet,
    /// Keys the reference document covers
    pub documented: KeywordSet,
    /// `found - documented`
    pub missing: KeywordSet,
    /// `documented - found`
    pub unused: KeywordSet,
    /// `found ∩ documented`
    pub documented_found: KeywordSet,
}

impl GapAnalysis {
    /// Compute all set differences in one pass
    pub fn compute(found: &KeywordSet, documented: &KeywordSet) -> Self {
        Self {
            found: found.clone(),
            documented: documented.clone(),
            missing: found.difference(documented).cloned().collect(),
            unused: documented.difference(found).cloned().collect(),
            documented_found: found.intersection(documented).cloned().collect(),
        }
    }

    /// Share of found keys that are documented, in percent.
    ///
    /// Nothing found means nothing is undocumented, so this is 100.
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage_percent(&self) -> f64 {
        if self.found.is_empty() {
            return 100.0;
        }
        self.documented_found.len() as f64 / self.found.len() as f64 * 100.0
    }

    /// Bucket the missing keys
    pub fn classify_missing(&self, classifier: &GapClassifier) -> Classification {
        classifier.classify_all(&self.missing)
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Everything the gap reports render, in serializable form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapReport {
    pub timestamp: String,
    pub yaml_root: PathBuf,
    pub yaml_root_exists: bool,
    pub files_scanned: usize,
    pub structured_files: usize,
    /// Files whose keys came from the line-regex fallback
    pub fallback_files: Vec<PathBuf>,
    pub reference_doc: PathBuf,
    pub reference_exists: bool,
    pub coverage_percent: f64,
    pub analysis: GapAnalysis,
    pub missing_by_category: Classification,
}

impl GapReport {
    pub fn new(found: &Extraction, reference: &ReferenceKeys, classifier: &GapClassifier) -> Self {
        let analysis = GapAnalysis::compute(&found.keys, &reference.keys);
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            yaml_root: found.root.clone(),
            yaml_root_exists: found.root_exists,
            files_scanned: found.files_scanned(),
            structured_files: found.structured_count(),
            fallback_files: found
                .files
                .iter()
                .filter(|f| !f.outcome.is_structured())
                .map(|f| f.path.clone())
                .collect(),
            reference_doc: reference.path.clone(),
            reference_exists: reference.exists,
            coverage_percent: analysis.coverage_percent(),
            missing_by_category: analysis.classify_missing(classifier),
            analysis,
        }
    }
}
