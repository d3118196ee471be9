use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Capped byte buffer that keeps only the most recent writes. Shared between
/// the stdout and stderr reader tasks of one plugin process, so the captured
/// tail interleaves both streams in arrival order.
#[derive(Clone)]
pub struct TailBuffer {
    inner: Arc<Mutex<VecDeque<u8>>>,
    cap: usize,
}

impl TailBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(cap.min(4096)))),
            cap,
        }
    }

    pub fn push(&self, data: &[u8]) {
        let mut g = self.inner.lock().unwrap();
        let data = if data.len() > self.cap {
            &data[data.len() - self.cap..]
        } else {
            data
        };
        let overflow = g.len().saturating_add(data.len()).saturating_sub(self.cap);
        if overflow > 0 {
            g.drain(..overflow);
        }
        g.extend(data);
    }

    /// Current contents decoded lossily; truncation can split a UTF-8
    /// sequence at the front.
    pub fn snapshot(&self) -> String {
        let g = self.inner.lock().unwrap();
        let bytes: Vec<u8> = g.iter().copied().collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
