//! Scripted `IntentClient` fakes for driving the session components
//! through deterministic gateway behavior under a paused runtime.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use flow_core::{
    IntentClient, IntentRequest, MethodCatalog, MethodInfo, PaymentError, PaymentIntent,
    PaymentResult, PaymentStatus,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Fake gateway client driven by scripted responses.
///
/// Status checks consume the scripted queue and fall back to `Pending`
/// once it runs dry. Create calls consume scripted failures and otherwise
/// mint a fresh intent (`pay_001`, `pay_002`, ...) whose validity window
/// is `validity` long; UPI requests get a QR URL.
pub(crate) struct ScriptedClient {
    statuses: Mutex<VecDeque<Result<PaymentStatus, String>>>,
    create_failures: Mutex<VecDeque<String>>,
    idempotency_keys: Mutex<Vec<String>>,
    status_calls: AtomicUsize,
    create_calls: AtomicUsize,
    validity: Duration,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::new()),
            create_failures: Mutex::new(VecDeque::new()),
            idempotency_keys: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            validity: Duration::seconds(900),
        }
    }

    /// Script the next status poll result
    pub fn with_status(self, result: Result<PaymentStatus, String>) -> Self {
        self.statuses.lock().unwrap().push_back(result);
        self
    }

    /// Script the next create call to fail
    pub fn with_create_failure(self, message: impl Into<String>) -> Self {
        self.create_failures.lock().unwrap().push_back(message.into());
        self
    }

    /// Set the validity window of minted intents
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Idempotency keys observed on create calls, in order
    pub fn idempotency_keys(&self) -> Vec<String> {
        self.idempotency_keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntentClient for ScriptedClient {
    async fn create_intent(&self, request: &IntentRequest) -> PaymentResult<PaymentIntent> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.idempotency_keys
            .lock()
            .unwrap()
            .push(request.idempotency_key.clone());

        if let Some(message) = self.create_failures.lock().unwrap().pop_front() {
            return Err(PaymentError::Network(message));
        }

        let id = format!("pay_{:03}", n);
        Ok(PaymentIntent {
            id: id.clone(),
            amount: request.amount,
            method: request.method,
            payment_url: format!("https://gateway.test/pay/{}", id),
            qr_code_url: request
                .method
                .supports_qr()
                .then(|| format!("https://gateway.test/qr/{}.png", id)),
            expires_at: Utc::now() + self.validity,
            created_at: Utc::now(),
        })
    }

    async fn check_status(&self, _intent_id: &str) -> PaymentResult<PaymentStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => Err(PaymentError::Network(message)),
            None => Ok(PaymentStatus::Pending),
        }
    }

    async fn list_methods(&self) -> PaymentResult<Vec<MethodInfo>> {
        Ok(MethodCatalog::built_in().methods)
    }
}
