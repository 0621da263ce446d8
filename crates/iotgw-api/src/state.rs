//! Application state for the gateway API

use std::sync::Arc;

use iotgw_bus::BusReader;
use iotgw_core::CompletenessChecker;
use iotgw_gateway::{ProtocolProber, PublishDispatcher, SampleStore};

use crate::error::ApiError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<PublishDispatcher>,
    pub prober: Arc<ProtocolProber>,
    pub checker: Arc<CompletenessChecker>,
    pub samples: Arc<SampleStore>,
    /// Present only when a bus is configured and opened
    bus: Option<Arc<BusReader>>,
}

impl AppState {
    /// Create state without a bus
    pub fn new(
        dispatcher: PublishDispatcher,
        prober: ProtocolProber,
        checker: CompletenessChecker,
    ) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            prober: Arc::new(prober),
            checker: Arc::new(checker),
            samples: Arc::new(SampleStore::new()),
            bus: None,
        }
    }

    /// Replace the sample store
    pub fn with_samples(mut self, samples: SampleStore) -> Self {
        self.samples = Arc::new(samples);
        self
    }

    /// Attach an opened bus reader
    pub fn with_bus(mut self, bus: Arc<BusReader>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// The bus reader, or 503 when none is configured
    pub fn bus(&self) -> Result<&Arc<BusReader>, ApiError> {
        self.bus
            .as_ref()
            .ok_or_else(|| iotgw_core::GatewayError::BusUnavailable.into())
    }
}
