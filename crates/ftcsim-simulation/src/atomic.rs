use std::sync::atomic::{AtomicU64, Ordering};

/// An `f64` that can be shared between threads without a lock.
///
/// Stored as its bit pattern in an [`AtomicU64`]; all accesses are `SeqCst`.
#[derive(Debug, Default)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    /// Wraps `value`.
    pub fn new(value: f64) -> Self {
        AtomicF64 {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    /// Current value.
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }

    /// Replace the value.
    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::SeqCst);
    }

    /// Adds `delta` and returns the previous value.
    pub fn fetch_add(&self, delta: f64) -> f64 {
        let prev = self
            .bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some((f64::from_bits(bits) + delta).to_bits())
            })
            .unwrap_or_else(|bits| bits);
        f64::from_bits(prev)
    }

    /// Applies `f` to the stored value.
    pub fn update(&self, f: impl Fn(f64) -> f64) {
        let _ = self
            .bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some(f(f64::from_bits(bits)).to_bits())
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_load_store() {
        let a = AtomicF64::new(1.5);
        assert_eq!(a.load(), 1.5);
        a.store(-0.25);
        assert_eq!(a.load(), -0.25);
        assert_eq!(AtomicF64::default().load(), 0.0);
    }

    #[test]
    fn test_fetch_add_returns_previous() {
        let a = AtomicF64::new(2.0);
        assert_eq!(a.fetch_add(0.5), 2.0);
        assert_eq!(a.load(), 2.5);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let a = Arc::new(AtomicF64::new(0.0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let a = Arc::clone(&a);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        a.fetch_add(1.0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(a.load(), 4000.0);
    }

    #[test]
    fn test_update() {
        let a = AtomicF64::new(7.0);
        a.update(|v| v.rem_euclid(4.0));
        assert_eq!(a.load(), 3.0);
    }
}
