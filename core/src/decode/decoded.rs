//! Decoded values and their backing store

use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

/// Frees the array buffers a decoded value owns.
///
/// Implemented for every `record!` type by walking its descriptor table,
/// and by hand for sum types built from records.
pub trait Release {
    fn release(&mut self);
}

/// A decoded value tied to the parsed tree it came from.
///
/// The tree is kept as the backing store until [`Decoded::release`] runs.
/// Release is idempotent: the second call finds no backing store and does
/// nothing.
#[derive(Clone, Debug)]
pub struct Decoded<V> {
    value: V,
    backing: Option<Arc<Value>>,
}

impl<V: Release> Decoded<V> {
    pub fn new(value: V, tree: Value) -> Self {
        Self {
            value,
            backing: Some(Arc::new(tree)),
        }
    }

    /// Release nested buffers and drop the backing store.
    ///
    /// Returns `false` when the value had already been released.
    pub fn release(&mut self) -> bool {
        if self.backing.take().is_none() {
            return false;
        }
        self.value.release();
        true
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.backing.is_none()
    }

    /// The source tree, while still held
    #[must_use]
    pub fn backing(&self) -> Option<&Value> {
        self.backing.as_deref()
    }
}

impl<V> Deref for Decoded<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.value
    }
}

/// Release and drop whatever `slot` holds
pub fn release_slot<V: Release>(slot: &mut Option<Decoded<V>>) -> bool {
    slot.take().map_or(false, |mut decoded| decoded.release())
}
