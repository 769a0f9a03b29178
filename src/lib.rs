use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod holders;
pub mod logging;
pub mod models;
pub mod routers;
pub mod services;

pub use crate::config::{load_config, AppConfig};
pub use errors::{FaultKind, PulseMonitorError, Result};
pub use holders::{AbnormalStore, AbnormalValuesHolder, JsonLinesStore};
pub use models::{
    AbnormalRecord, AttributeValue, BatchSummary, ChangeBatch, ChangeEvent, MeasurementRecord,
    NewImage, Range, RecordOutcome, SkipReason,
};
pub use services::{
    ChangeConsumer, HttpRangeResolver, PulseEvaluator, RangeProviderService, RangeRegistry,
    RangeResolver, RangeResponse,
};

#[derive(Clone)]
pub struct AnalyzerState {
    pub consumer: ChangeConsumer,
    pub store: Arc<dyn AbnormalStore>,
}

impl AnalyzerState {
    pub fn from_config(config: &AppConfig) -> Self {
        let store: Arc<dyn AbnormalStore> = match &config.abnormal_store_path {
            Some(path) => Arc::new(JsonLinesStore::new(path)),
            None => Arc::new(AbnormalValuesHolder::new()),
        };
        let evaluator = PulseEvaluator::new(
            Arc::new(HttpRangeResolver::new()),
            store.clone(),
            config.range_service_url.clone(),
        );

        AnalyzerState {
            consumer: ChangeConsumer::new(evaluator, config.max_concurrent()),
            store,
        }
    }
}

#[derive(Clone)]
pub struct ProviderState {
    pub provider: RangeProviderService,
}

impl ProviderState {
    pub fn from_config(config: &AppConfig) -> Self {
        let registry = match &config.ranges {
            Some(ranges) => RangeRegistry::new(ranges.clone()),
            None => RangeRegistry::default(),
        };

        ProviderState {
            provider: RangeProviderService::new(Arc::new(registry)),
        }
    }
}
