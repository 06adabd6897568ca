//! Live, re-queried views over persisted records.

use super::record::Record;
use super::todo_store::TodoStore;
use super::StoreResult;
use log::debug;
use std::marker::PhantomData;

/// Ordered view of every persisted record of kind `R`.
///
/// The view holds no rows of its own: every accessor queries the session
/// again, so it reflects all writes made through the same `TodoStore` after
/// the view was created.
pub struct LiveResults<'store, R: Record> {
    store: &'store TodoStore,
    _kind: PhantomData<fn() -> R>,
}

impl<'store, R: Record> LiveResults<'store, R> {
    pub(super) fn new(store: &'store TodoStore) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// Materializes the current contents in insertion order.
    pub fn snapshot(&self) -> StoreResult<Vec<R>> {
        let records = R::load_all(self.store.connection())?;
        debug!(
            "event=store_read module=store status=ok kind={} count={}",
            R::KIND.as_str(),
            records.len()
        );
        Ok(records)
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.snapshot()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Record at `index` in the current contents, if any.
    pub fn get(&self, index: usize) -> StoreResult<Option<R>> {
        Ok(self.snapshot()?.into_iter().nth(index))
    }
}
