//! Per-batch dispatch of records into topology channels.
//!
//! Each record moves `Pending -> Classified -> Routed | Discarded | Failed`,
//! strictly one at a time and in input order. Configuration and topology are
//! fixed for the lifetime of a [`Router`]; reloading means building a new one.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use intentflow_classify::{IntentClassifier, KeywordClassifier, extract_with_diagnostics};
use intentflow_core::{ConfigurationError, FallbackPolicy, OutputTopology, Record, RouterConfig};
use intentflow_core::record::truncate_utf16;
use tracing::{debug, info, warn};

use crate::enrich::{Enrichment, INPUT_TEXT_LIMIT, annotate_error};
use crate::error::{RecordError, RouteError};

/// Where a successfully processed record ends up.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Routed { channel: usize, enrichment: Enrichment },
    Discarded,
}

/// Output of one batch.
#[derive(Debug, Clone, Default)]
pub struct RoutedBatch {
    /// One ordered sequence per topology channel.
    pub channels: Vec<Vec<Record>>,
    pub discarded: usize,
    pub failed: usize,
    /// Set when iteration stopped early; channels hold what was routed so far.
    pub cancelled: bool,
}

impl RoutedBatch {
    fn with_channels(count: usize) -> Self {
        Self {
            channels: vec![Vec::new(); count],
            ..Self::default()
        }
    }

    pub fn emitted(&self) -> usize {
        self.channels.iter().map(Vec::len).sum()
    }
}

pub struct Router<C = KeywordClassifier> {
    config: RouterConfig,
    topology: OutputTopology,
    classifier: C,
}

impl Router<KeywordClassifier> {
    /// Router using keyword classification with the configured threshold.
    pub fn new(config: RouterConfig) -> Result<Self, ConfigurationError> {
        let classifier =
            KeywordClassifier::new(config.case_sensitive, config.confidence_threshold);
        Self::with_classifier(config, classifier)
    }
}

impl<C: IntentClassifier> Router<C> {
    pub fn with_classifier(config: RouterConfig, classifier: C) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let topology = OutputTopology::build(&config.intents, config.fallback)?;
        Ok(Self {
            config,
            topology,
            classifier,
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn topology(&self) -> &OutputTopology {
        &self.topology
    }

    /// Route a full batch.
    pub fn route_batch(&self, records: Vec<Record>) -> Result<RoutedBatch, RouteError> {
        self.route_batch_until(records, &AtomicBool::new(false))
    }

    /// Route a batch, checking `cancel` before each record.
    ///
    /// In strict mode the first failing record aborts the batch. With
    /// `continue_on_fail` it is annotated and sent to the error channel instead.
    pub fn route_batch_until(
        &self,
        records: Vec<Record>,
        cancel: &AtomicBool,
    ) -> Result<RoutedBatch, RouteError> {
        let mut batch = RoutedBatch::with_channels(self.topology.len());

        for mut record in records {
            if cancel.load(Ordering::Relaxed) {
                batch.cancelled = true;
                info!(routed = batch.emitted(), "batch cancelled");
                break;
            }

            let item_index = record.item_index;
            match self.dispatch(&record) {
                Ok(Disposition::Routed {
                    channel,
                    enrichment,
                }) => {
                    enrichment.apply(&mut record, &timestamp());
                    batch.channels[channel].push(record);
                }
                Ok(Disposition::Discarded) => {
                    debug!(item = item_index, "record discarded");
                    batch.discarded += 1;
                }
                Err(source) if self.config.continue_on_fail => {
                    let channel = self.topology.error_index();
                    warn!(item = item_index, channel, error = %source, "record failed, continuing");
                    annotate_error(&mut record, &source.to_string(), &timestamp());
                    batch.channels[channel].push(record);
                    batch.failed += 1;
                }
                Err(source) => {
                    return Err(RouteError::Record { item_index, source });
                }
            }
        }

        info!(
            channels = batch.channels.len(),
            emitted = batch.emitted(),
            discarded = batch.discarded,
            failed = batch.failed,
            "batch routed"
        );
        Ok(batch)
    }

    /// Decide where one record goes without moving it.
    pub fn dispatch(&self, record: &Record) -> Result<Disposition, RecordError> {
        let text = record.text(&self.config.input_field);
        let classification = self
            .classifier
            .classify(&text, &self.config.intents)
            .map_err(RecordError::Classifier)?;

        debug!(
            item = record.item_index,
            intent = classification.matched_intent_key.as_deref().unwrap_or("-"),
            confidence = classification.confidence,
            "record classified"
        );

        if let Some(key) = classification.matched_intent_key.as_deref() {
            let channel = self
                .topology
                .channel_for(key)
                .ok_or_else(|| ConfigurationError::UnknownIntent(key.to_string()))?;
            let intent = self
                .config
                .intent(key)
                .ok_or_else(|| ConfigurationError::UnknownIntent(key.to_string()))?;
            let extraction = extract_with_diagnostics(intent, record);

            let mut enrichment = Enrichment::new(classification, &text);
            enrichment.extracted_parameters = extraction.parameters;
            enrichment.missing_parameters = extraction.missing_required;
            return Ok(Disposition::Routed {
                channel,
                enrichment,
            });
        }

        match self.config.fallback {
            FallbackPolicy::RouteToFallback => {
                let channel = self
                    .topology
                    .fallback_index()
                    .ok_or(ConfigurationError::NoChannels)?;
                Ok(Disposition::Routed {
                    channel,
                    enrichment: Enrichment::new(classification, &text),
                })
            }
            FallbackPolicy::Discard => Ok(Disposition::Discarded),
            FallbackPolicy::Error => Err(RecordError::NoIntentMatched {
                input_text: truncate_utf16(&text, INPUT_TEXT_LIMIT),
            }),
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}
