#[cfg(not(loom))]
pub(crate) mod export {
  pub(crate) mod sync {
    pub(crate) use parking_lot::RwLock;

    pub(crate) mod atomic {
      pub(crate) use std::sync::atomic::AtomicU64;
      pub(crate) use std::sync::atomic::Ordering;
    }
  }
}

#[cfg(loom)]
pub(crate) mod export {
  pub(crate) mod sync {
    use std::sync::PoisonError;

    /// Shim giving loom's lock the non-poisoning interface of `parking_lot`.
    pub(crate) struct RwLock<T> {
      inner: loom::sync::RwLock<T>,
    }

    impl<T> RwLock<T> {
      #[inline]
      pub(crate) fn new(value: T) -> Self {
        Self {
          inner: loom::sync::RwLock::new(value),
        }
      }

      #[inline]
      pub(crate) fn read(&self) -> loom::sync::RwLockReadGuard<'_, T> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
      }

      #[inline]
      pub(crate) fn write(&self) -> loom::sync::RwLockWriteGuard<'_, T> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
      }
    }

    pub(crate) mod atomic {
      pub(crate) use loom::sync::atomic::AtomicU64;
      pub(crate) use loom::sync::atomic::Ordering;
    }
  }
}

#[doc(inline)]
pub(crate) use self::export::*;
