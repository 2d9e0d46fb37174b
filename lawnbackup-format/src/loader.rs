//! Background metadata loading for UI-driven archive inspection.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::host::ArchiveSource;
use crate::{Backup, Meta};

/// Callback slot invoked when a background load completes.
pub type MetaCallback = Box<dyn FnMut(Option<&Meta>) + Send>;

/// Where a loader is in its single-shot lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    /// Finished; `None` means the archive had no readable metadata, which
    /// is distinct from a load that has not happened yet.
    Loaded(Option<Meta>),
}

/// Loads just the metadata record of an archive off the calling thread.
///
/// One mutable callback slot, no cancellation: a load in flight runs to
/// completion even if nobody is listening. The callback is delivered
/// under the loader's lock, so two loads on the same loader can never
/// invoke it concurrently.
pub struct MetaLoader<S> {
    backup: Arc<Backup<S>>,
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    state: LoadState,
    callback: Option<MetaCallback>,
}

impl<S> MetaLoader<S>
where
    S: ArchiveSource + Send + Sync + 'static,
{
    pub fn new(backup: Arc<Backup<S>>) -> MetaLoader<S> {
        MetaLoader {
            backup,
            inner: Arc::new(Mutex::new(Inner {
                state: LoadState::Idle,
                callback: None,
            })),
        }
    }

    /// Install the completion callback, replacing any previous one.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: FnMut(Option<&Meta>) + Send + 'static,
    {
        self.inner.lock().unwrap().callback = Some(Box::new(callback));
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoadState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Kick off the background load, returning the worker's handle so
    /// callers that need a completion barrier can join it.
    pub fn load(&self) -> JoinHandle<()> {
        self.inner.lock().unwrap().state = LoadState::Loading;

        let backup = Arc::clone(&self.backup);
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            let meta = backup.meta().cloned();
            debug!(loaded = meta.is_some(), "meta load finished");

            let mut inner = inner.lock().unwrap();
            inner.state = LoadState::Loaded(meta.clone());
            if let Some(callback) = inner.callback.as_mut() {
                callback(meta.as_ref());
            }
        })
    }
}
