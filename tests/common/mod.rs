use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use tokio::sync::Semaphore;

use servicecart_rs::models::{CartItem, SourceError, SourceResult};
use servicecart_rs::sources::CartSource;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = servicecart_rs::init_observability("servicecart-test", "0.1.0", "debug", false);
});

/// Install the test tracing subscriber once per test binary
pub fn init_test_logging() {
    Lazy::force(&TRACING);
}

/// Two service bookings, 150000 total
pub fn sample_items() -> Vec<CartItem> {
    vec![
        CartItem {
            id: "a".to_string(),
            name: Some("Thai massage".to_string()),
            price: Some(dec!(100000)),
            time: Some("60 min".to_string()),
            store_name: Some("Spa One".to_string()),
            image: Some("assets/thai.png".to_string()),
        },
        CartItem::priced("b", dec!(50000)),
    ]
}

struct ScriptedLoad {
    result: Result<Vec<CartItem>, String>,
    gate: Option<Arc<Semaphore>>,
}

/// Cart source with a scripted sequence of load outcomes, for driving the
/// store through failure and interleaving scenarios deterministically.
///
/// Each `refresh` consumes one scripted load in order. A gated load parks
/// inside the source until the test releases its semaphore, letting a test
/// hold one refresh in flight while issuing another.
pub struct ScriptedCartSource {
    loads: Mutex<VecDeque<ScriptedLoad>>,
    removal_error: Mutex<Option<String>>,
    pub load_calls: AtomicUsize,
}

impl ScriptedCartSource {
    pub fn new() -> Self {
        Self {
            loads: Mutex::new(VecDeque::new()),
            removal_error: Mutex::new(None),
            load_calls: AtomicUsize::new(0),
        }
    }

    /// Script a successful load
    pub fn push_load(&self, items: Vec<CartItem>) {
        self.loads.lock().unwrap().push_back(ScriptedLoad {
            result: Ok(items),
            gate: None,
        });
    }

    /// Script a failing load
    pub fn push_load_failure(&self, message: &str) {
        self.loads.lock().unwrap().push_back(ScriptedLoad {
            result: Err(message.to_string()),
            gate: None,
        });
    }

    /// Script a successful load that parks until the returned semaphore
    /// receives a permit
    pub fn push_gated_load(&self, items: Vec<CartItem>) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.loads.lock().unwrap().push_back(ScriptedLoad {
            result: Ok(items),
            gate: Some(gate.clone()),
        });
        gate
    }

    /// Make every subsequent removal fail with the given message
    pub fn fail_removals(&self, message: &str) {
        *self.removal_error.lock().unwrap() = Some(message.to_string());
    }

    /// Let removals succeed again
    pub fn allow_removals(&self) {
        *self.removal_error.lock().unwrap() = None;
    }
}

impl Default for ScriptedCartSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartSource for ScriptedCartSource {
    async fn load_cart(&self) -> SourceResult<Vec<CartItem>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);

        let step = self
            .loads
            .lock()
            .unwrap()
            .pop_front()
            .expect("test issued more refreshes than scripted loads");

        if let Some(gate) = step.gate {
            let _permit = gate.acquire().await;
        }

        step.result
            .map_err(|message| SourceError::Unavailable { message })
    }

    async fn persist_removal(&self, _item_id: &str) -> SourceResult<()> {
        match self.removal_error.lock().unwrap().clone() {
            Some(message) => Err(SourceError::Unavailable { message }),
            None => Ok(()),
        }
    }
}
