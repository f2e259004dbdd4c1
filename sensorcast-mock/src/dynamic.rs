use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sensorcast_core::{RawSample, SampleSource, SensorcastError, StreamSpec, TimeWindow};

/// Instruction for how a fetch should behave for a given sensor.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(SensorcastError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    fetch_rules: HashMap<u32, MockBehavior<Vec<RawSample>>>,
    fetch_requests: Vec<(StreamSpec, TimeWindow)>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `fetch` calls for a specific sensor id.
    pub async fn set_fetch_behavior(
        &self,
        sensor_id: u32,
        behavior: MockBehavior<Vec<RawSample>>,
    ) {
        let mut guard = self.state.lock().await;
        guard.fetch_rules.insert(sensor_id, behavior);
    }

    /// Return a copy of the request log, in call order.
    pub async fn get_fetch_requests(&self) -> Vec<(StreamSpec, TimeWindow)> {
        let guard = self.state.lock().await;
        guard.fetch_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.fetch_rules.clear();
        guard.fetch_requests.clear();
    }
}

/// A source that defers all behavior to an external controller.
///
/// Sensors without a configured behavior report `NotFound`. Returned samples
/// are filtered by the requested window.
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn SampleSource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn SampleSource>, controller)
    }
}

#[async_trait]
impl SampleSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    async fn fetch(
        &self,
        stream: &StreamSpec,
        window: &TimeWindow,
    ) -> Result<Vec<RawSample>, SensorcastError> {
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.fetch_requests.push((stream.clone(), *window));
            guard.fetch_rules.get(&stream.sensor_id).cloned()
        };
        match behavior {
            Some(MockBehavior::Return(samples)) => Ok(samples
                .into_iter()
                .filter(|s| window.contains(s.ts))
                .collect()),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(SensorcastError::not_found(format!(
                "samples for {stream}"
            ))),
        }
    }
}
