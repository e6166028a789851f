//! Observer connection slot.
//!
//! An independent duplex text connection that receives mirrored control
//! events. At most one observer is attached at a time; it may attach before
//! or after the media connection, and the bridge functions without one.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Single slot holding the write handle of the attached observer, if any.
#[derive(Clone, Default)]
pub struct ObserverSlot {
    inner: Arc<Mutex<Option<mpsc::Sender<String>>>>,
}

impl ObserverSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer, replacing any previous one.
    pub fn attach(&self, sender: mpsc::Sender<String>) {
        *self.inner.lock() = Some(sender);
    }

    /// Detach the current observer.
    pub fn detach(&self) {
        *self.inner.lock() = None;
    }

    pub fn is_attached(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Mirror one raw control frame to the observer, best-effort.
    ///
    /// Returns false when no observer is attached or its queue is
    /// unavailable; the frame is dropped either way, never retried.
    pub fn mirror(&self, raw: &str) -> bool {
        let guard = self.inner.lock();
        match guard.as_ref() {
            Some(sender) => match sender.try_send(raw.to_string()) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("failed to mirror event to observer: {e}");
                    false
                }
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_without_observer_drops() {
        let slot = ObserverSlot::new();
        assert!(!slot.mirror(r#"{"type":"state","state":"idle"}"#));
    }

    #[test]
    fn test_mirror_reaches_attached_observer_verbatim() {
        let slot = ObserverSlot::new();
        let (tx, mut rx) = mpsc::channel(4);
        slot.attach(tx);

        let raw = r#"{"type":"transcript","final":false,"delta":"He"}"#;
        assert!(slot.mirror(raw));
        assert_eq!(rx.try_recv().unwrap(), raw);
    }

    #[test]
    fn test_detach_clears_slot() {
        let slot = ObserverSlot::new();
        let (tx, _rx) = mpsc::channel(4);
        slot.attach(tx);
        assert!(slot.is_attached());
        slot.detach();
        assert!(!slot.is_attached());
        assert!(!slot.mirror("{}"));
    }
}
