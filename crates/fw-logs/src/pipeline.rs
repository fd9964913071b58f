//! Batch ingestion: parse each line with the declared format, persist the
//! records, and account for everything that could not be ingested.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::registry::ParserRegistry;
use crate::store::LogStore;
use crate::types::FirewallType;

/// Per-format tally of unparsed lines recognized by some parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCount {
    pub firewall_type: FirewallType,
    pub count: usize,
}

/// Batch-level diagnostic derived from the counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchWarning {
    /// No line was recognized by any registered parser.
    UnsupportedFormat { selected: FirewallType },
    /// Nothing ingested, but the content looks like another format.
    FormatMismatch {
        selected: FirewallType,
        suggested: FirewallType,
    },
}

impl std::fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat { selected } => write!(
                f,
                "no valid line found for {selected}: file content is not recognized by any supported firewall format"
            ),
            Self::FormatMismatch {
                selected,
                suggested,
            } => write!(
                f,
                "no valid line found for {selected}: file content looks like {suggested}"
            ),
        }
    }
}

/// Outcome of one ingestion call.
///
/// `processed + ignored` always equals the number of input lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub processed: usize,
    pub ignored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Candidate counters in registry order.
    pub candidates: Vec<CandidateCount>,
}

/// Drives one batch through the registry and into the store.
#[derive(Clone)]
pub struct IngestionPipeline {
    registry: Arc<ParserRegistry>,
    store: Arc<dyn LogStore>,
}

impl IngestionPipeline {
    pub fn new(registry: Arc<ParserRegistry>, store: Arc<dyn LogStore>) -> Self {
        Self { registry, store }
    }

    /// Ingest `lines` declared as `selected`, tagging every record with `file_id`.
    ///
    /// Never fails: malformed lines and store rejections are counted as
    /// ignored and the batch carries on.
    pub async fn process_batch(
        &self,
        lines: &[String],
        selected: FirewallType,
        file_id: &str,
    ) -> IngestSummary {
        let selected_parser = self.registry.get(selected);
        if selected_parser.is_none() {
            tracing::warn!(format = %selected, "no parser registered for selected format");
        }

        let mut processed = 0;
        let mut ignored = 0;
        let mut candidates = vec![0usize; self.registry.len()];
        let selected_slot = self
            .registry
            .iter()
            .position(|p| p.firewall_type() == selected);

        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                ignored += 1;
                continue;
            }

            if let Some(parser) = selected_parser
                && parser.can_parse(line)
            {
                match parser.parse(line) {
                    Ok(parsed) => {
                        let record = parsed.into_record(file_id);
                        match self.store.append(&record).await {
                            Ok(()) => processed += 1,
                            Err(e) => {
                                tracing::warn!(file_id, line = i + 1, error = %e, "failed to persist record");
                                // Recognized by the selected format, only the store said no.
                                if let Some(slot) = selected_slot {
                                    candidates[slot] += 1;
                                }
                                ignored += 1;
                            }
                        }
                        continue;
                    }
                    Err(failure) => {
                        tracing::debug!(file_id, line = i + 1, format = %selected, %failure, "line rejected");
                    }
                }
            }

            // Diagnostics only: which formats would have recognized this line?
            for (slot, parser) in candidates.iter_mut().zip(self.registry.iter()) {
                if parser.can_parse(line) {
                    *slot += 1;
                }
            }
            ignored += 1;
        }

        let candidates: Vec<CandidateCount> = self
            .registry
            .iter()
            .zip(candidates)
            .map(|(p, count)| CandidateCount {
                firewall_type: p.firewall_type(),
                count,
            })
            .collect();

        let warning = batch_warning(processed, &candidates, selected);

        tracing::info!(
            file_id,
            format = %selected,
            total = lines.len(),
            processed,
            ignored,
            warning = warning.as_ref().map(|w| w.to_string()),
            "batch ingested"
        );

        IngestSummary {
            processed,
            ignored,
            warning: warning.map(|w| w.to_string()),
            candidates,
        }
    }
}

/// Derive the batch warning from the counters alone.
///
/// Ties between candidate formats go to the first one registered.
pub fn batch_warning(
    processed: usize,
    candidates: &[CandidateCount],
    selected: FirewallType,
) -> Option<BatchWarning> {
    if processed > 0 {
        return None;
    }

    let mut best: Option<CandidateCount> = None;
    for c in candidates {
        if c.count > best.map_or(0, |b| b.count) {
            best = Some(*c);
        }
    }

    match best {
        None => Some(BatchWarning::UnsupportedFormat { selected }),
        Some(b) if b.firewall_type != selected => Some(BatchWarning::FormatMismatch {
            selected,
            suggested: b.firewall_type,
        }),
        Some(_) => None,
    }
}
