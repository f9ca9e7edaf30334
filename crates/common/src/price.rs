//! Live price seam
//!
//! Consumers of a live price (the pay-later workflow, the terminal views)
//! depend on [`PriceSource`] rather than on the feed that produces it, so
//! tests can supply deterministic prices.

use std::sync::atomic::{AtomicU64, Ordering};

/// A subscribable source of the latest price sample.
pub trait PriceSource: Send + Sync {
    /// Latest observed price, or `None` before the first sample arrives.
    fn latest_price(&self) -> Option<f64>;
}

/// A manually driven price source.
///
/// Holds a single price that tests (or one-shot commands) can move with
/// [`FixedPrice::set`].
#[derive(Debug)]
pub struct FixedPrice {
    bits: AtomicU64,
}

const UNSET: u64 = u64::MAX;

impl FixedPrice {
    pub fn new(price: f64) -> Self {
        Self {
            bits: AtomicU64::new(price.to_bits()),
        }
    }

    /// A source that has not produced any sample yet
    pub fn unset() -> Self {
        Self {
            bits: AtomicU64::new(UNSET),
        }
    }

    pub fn set(&self, price: f64) {
        self.bits.store(price.to_bits(), Ordering::SeqCst);
    }
}

impl PriceSource for FixedPrice {
    fn latest_price(&self) -> Option<f64> {
        match self.bits.load(Ordering::SeqCst) {
            UNSET => None,
            bits => Some(f64::from_bits(bits)),
        }
    }
}

impl<T: PriceSource + ?Sized> PriceSource for std::sync::Arc<T> {
    fn latest_price(&self) -> Option<f64> {
        (**self).latest_price()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_fixed_price() {
        let source = FixedPrice::new(2856.42);
        assert_eq!(source.latest_price(), Some(2856.42));

        source.set(3000.0);
        assert_eq!(source.latest_price(), Some(3000.0));
    }

    #[test]
    fn test_unset_price() {
        let source = FixedPrice::unset();
        assert_eq!(source.latest_price(), None);

        source.set(1.0);
        assert_eq!(source.latest_price(), Some(1.0));
    }

    #[test]
    fn test_shared_source() {
        let source = Arc::new(FixedPrice::new(10.0));
        let shared: Arc<dyn PriceSource> = source.clone();

        source.set(11.0);
        assert_eq!(shared.latest_price(), Some(11.0));
    }
}
