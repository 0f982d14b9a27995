use std::sync::Arc;
use tokio::sync::broadcast;

/// Lossy broadcast topic carrying render frames to whatever draws them.
///
/// Publishing never blocks; a slow subscriber lags and skips frames instead of
/// holding up the sampler.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    /// A topic keeping the last `capacity` frames for each subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns how many subscribers will see `msg`.
    pub fn publish(&self, msg: T) -> usize {
        self.tx.send(Arc::new(msg)).unwrap_or(0)
    }

    /// A receiver seeing every frame published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let topic: Topic<u32> = Topic::new(4);
        assert_eq!(topic.publish(1), 0);
        assert_eq!(topic.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_lags_instead_of_blocking() {
        let topic: Topic<u32> = Topic::new(2);
        let mut rx = topic.subscribe();
        for i in 0..5 {
            assert_eq!(topic.publish(i), 1);
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(3))));
        assert_eq!(*rx.try_recv().unwrap(), 3);
        assert_eq!(*rx.try_recv().unwrap(), 4);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}
