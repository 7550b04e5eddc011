//! Human-readable history of activity lifecycle transitions, persisted as one
//! JSON document in a key-value store.

use crate::{Error, LogSink, Priority, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key the history document is stored under.
pub const HISTORY_KEY: &str = "log_states_json";
/// Tag of the line logged for every recorded transition.
pub const LIFECYCLE_TAG: &str = "MainActivityActions";

/// A lifecycle callback of the host activity.
///
/// Bundle-carrying callbacks identify the bundle by an opaque number such as
/// its hash code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleEvent {
    Create { saved_state: Option<i32> },
    Start,
    Resume,
    Pause,
    Stop,
    Restart,
    Destroy,
    SaveInstanceState { state: i32, persistent_state: Option<i32> },
    RestoreInstanceState { state: i32 },
    LowMemory,
    ConfigurationChanged,
    TopResumedActivityChanged { is_top: bool },
    Finish,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LifecycleEvent::Create { saved_state: None } => f.write_str("onCreate()"),
            LifecycleEvent::Create {
                saved_state: Some(bundle),
            } => write!(
                f,
                "onCreate(savedInstanceState: Bundle?), bundle: {bundle}"
            ),
            LifecycleEvent::Start => f.write_str("onStart()"),
            LifecycleEvent::Resume => f.write_str("onResume()"),
            LifecycleEvent::Pause => f.write_str("onPause()"),
            LifecycleEvent::Stop => f.write_str("onStop()"),
            LifecycleEvent::Restart => f.write_str("onRestart()"),
            LifecycleEvent::Destroy => f.write_str("onDestroy()"),
            LifecycleEvent::SaveInstanceState {
                state,
                persistent_state: None,
            } => write!(f, "onSaveInstanceState(outState: Bundle), bundle: {state}"),
            LifecycleEvent::SaveInstanceState {
                state,
                persistent_state: Some(persistent),
            } => write!(
                f,
                "onSaveInstanceState(outState: Bundle, outPersistentState: PersistableBundle), \
                 bundle: {state}, persistentBundle: {persistent}"
            ),
            LifecycleEvent::RestoreInstanceState { state } => write!(
                f,
                "onRestoreInstanceState(savedInstanceState: Bundle), bundle: {state}"
            ),
            LifecycleEvent::LowMemory => f.write_str("onLowMemory()"),
            LifecycleEvent::ConfigurationChanged => {
                f.write_str("onConfigurationChanged(newConfig: Configuration)")
            }
            LifecycleEvent::TopResumedActivityChanged { is_top } => write!(
                f,
                "onTopResumedActivityChanged(), isTopResumedActivity = {is_top}"
            ),
            LifecycleEvent::Finish => f.write_str("finish()"),
        }
    }
}

/// String key-value storage, e.g. shared preferences.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object file, rewritten on every change.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> FileStore {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let text = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, text).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn put(&mut self, key: &str, value: String) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_owned(), value);
        self.write_all(&values)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryDocument {
    log_states: Vec<String>,
}

/// Ordered lifecycle history mirrored into a [`KeyValueStore`].
pub struct LifecycleRecorder<S: KeyValueStore> {
    store: S,
    states: Vec<String>,
    sink: Arc<dyn LogSink>,
}

impl<S: KeyValueStore + fmt::Debug> fmt::Debug for LifecycleRecorder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleRecorder")
            .field("store", &self.store)
            .field("states", &self.states)
            .finish()
    }
}

impl<S: KeyValueStore> LifecycleRecorder<S> {
    /// Restores the history saved in `store`; a missing or empty document
    /// starts a fresh one.
    pub fn load(store: S, sink: Arc<dyn LogSink>) -> Result<Self> {
        let states = match store.get(HISTORY_KEY)? {
            Some(json) if !json.is_empty() => serde_json::from_str::<HistoryDocument>(&json)?.log_states,
            _ => Vec::new(),
        };
        Ok(LifecycleRecorder {
            store,
            states,
            sink,
        })
    }

    /// Appends the event, saves the whole history and logs the event.
    ///
    /// When saving fails the event is dropped again, so memory and store
    /// keep agreeing.
    pub fn record(&mut self, event: LifecycleEvent) -> Result<()> {
        let text = event.to_string();
        self.states.push(text);
        if let Err(err) = self.save() {
            self.states.pop();
            return Err(err);
        }
        if let Some(text) = self.states.last() {
            self.sink.write(Priority::Info, LIFECYCLE_TAG, text);
        }
        Ok(())
    }

    /// Forgets the history, both in memory and in the store.
    pub fn clear(&mut self) -> Result<()> {
        self.states.clear();
        self.store.remove(HISTORY_KEY)?;
        self.save()
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn save(&mut self) -> Result<()> {
        let document = HistoryDocument {
            log_states: self.states.clone(),
        };
        self.store.put(HISTORY_KEY, serde_json::to_string(&document)?)
    }
}
