use hostprefix_core::prelude::LabelSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn labels(pairs: &[(&str, &str)]) -> LabelSet {
    pairs.iter().copied().collect()
}

/// Label source that counts how often it is asked for labels.
#[derive(Clone)]
pub struct CountingLabels {
    labels: LabelSet,
    calls: Arc<AtomicUsize>,
}

impl CountingLabels {
    pub fn new(labels: LabelSet) -> Self {
        Self {
            labels,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn labels_fn(&self) -> impl Fn() -> LabelSet + Send + Sync + 'static {
        let labels = self.labels.clone();
        let calls = self.calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            labels.clone()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn assert_calls(&self, expected: usize) {
        let got = self.calls();
        if got != expected {
            panic!("labels fn call count mismatch\n  expected: {expected}\n  got: {got}");
        }
    }
}
