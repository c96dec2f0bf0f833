//! Functionality for lazy-loading sequences off disk into memory.
//!
//! The main functionality is the very generic [`LazyLoader`]. This is generic over the loading
//! function and the key type. It holds the open reader and one key's worth of loaded data
//! in [`RefCell`]s, so lookups only need `&self`.
//!
use std::cell::RefCell;

use crate::error::SeqDataError;

/// A lazy-loader function that takes a reader type `R` and
/// uses it to load in data of type `T`.
type LoaderFunc<R, T, K> = Box<dyn Fn(&mut R, &K) -> Result<T, SeqDataError>>;

/// Lazy loader, which uses [`RefCell`] to store mutable reader and data, used for lazy loading and
/// storing one key's worth of data.
///
/// # Generics
///  * `R`: the reader type.
///  * `T`: the data type.
///  * `K`: the key type.
///
/// Because of the [`RefCell`]s, a [`LazyLoader`] is not [`Sync`]: each thread needs its own.
pub struct LazyLoader<R, T, K> {
    reader: RefCell<R>,
    loader: LoaderFunc<R, T, K>,
    cache: RefCell<Option<(K, T)>>,
}

impl<R, T, K: std::fmt::Debug> std::fmt::Debug for LazyLoader<R, T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = self.cache.borrow().as_ref().map(|(key, _)| format!("{:?}", key));
        f.debug_struct("LazyLoader")
            .field("key", &key)
            .finish_non_exhaustive()
    }
}

impl<R, T, K> LazyLoader<R, T, K>
where
    K: Clone + PartialEq,
{
    pub fn new<F>(reader: R, loader: F) -> LazyLoader<R, T, K>
    where
        F: Fn(&mut R, &K) -> Result<T, SeqDataError> + 'static,
    {
        LazyLoader {
            reader: RefCell::new(reader),
            loader: Box::new(loader),
            cache: RefCell::new(None),
        }
    }

    /// Return a `bool` indicating whether the specified `key` is cached.
    pub fn is_loaded(&self, key: &K) -> bool {
        matches!(&*self.cache.borrow(), Some((loaded, _)) if loaded == key)
    }

    /// Apply `func` to the data for `key`, loading it first (and evicting whatever was
    /// cached) if it is not the currently cached key.
    pub fn with_data<V, F>(&self, key: &K, func: F) -> Result<V, SeqDataError>
    where
        F: FnOnce(&T) -> V,
    {
        let mut cache = self.cache.borrow_mut();
        if let Some((loaded, data)) = &*cache {
            if loaded == key {
                return Ok(func(data));
            }
        }
        let data = (self.loader)(&mut self.reader.borrow_mut(), key)?;
        let value = func(&data);
        *cache = Some((key.clone(), data));
        Ok(value)
    }
}
