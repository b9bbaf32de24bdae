//! In-memory mock engine shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::engine::TranscodeEngine;
use crate::error::{MediaError, MediaResult};
use crate::plan::OUTPUT_NAME;
use crate::progress::ProgressCallback;

/// Mock engine backed by an in-memory working storage.
#[derive(Default)]
pub struct MockEngine {
    storage: Mutex<HashMap<String, Vec<u8>>>,
    load_calls: AtomicUsize,
    exec_calls: AtomicUsize,
    fail_next_load: AtomicBool,
    fail_on_exec: Mutex<Option<usize>>,
    exec_args: Mutex<Vec<Vec<String>>>,
}

impl MockEngine {
    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn exec_calls(&self) -> usize {
        self.exec_calls.load(Ordering::SeqCst)
    }

    /// Make the next load attempt fail.
    pub fn fail_next_load(&self) {
        self.fail_next_load.store(true, Ordering::SeqCst);
    }

    /// Make the n-th exec call (0-based) fail.
    pub fn fail_on_exec(&self, call: usize) {
        *self.fail_on_exec.lock().unwrap() = Some(call);
    }

    /// Names currently present in working storage.
    pub fn storage_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.storage.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    /// Argument lists passed to exec, in call order.
    pub fn recorded_args(&self) -> Vec<Vec<String>> {
        self.exec_args.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscodeEngine for MockEngine {
    async fn load(&self) -> MediaResult<()> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_load.swap(false, Ordering::SeqCst) {
            return Err(MediaError::EngineInitFailed("mock load failure".into()));
        }
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> MediaResult<()> {
        self.storage
            .lock()
            .unwrap()
            .insert(name.to_string(), data.to_vec());
        Ok(())
    }

    async fn read_file(&self, name: &str) -> MediaResult<Vec<u8>> {
        self.storage
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| MediaError::OutputMissing(name.to_string()))
    }

    async fn delete_file(&self, name: &str) -> MediaResult<()> {
        self.storage.lock().unwrap().remove(name);
        Ok(())
    }

    async fn exec(&self, args: &[String], _progress: Option<ProgressCallback>) -> MediaResult<()> {
        let call = self.exec_calls.fetch_add(1, Ordering::SeqCst);
        self.exec_args.lock().unwrap().push(args.to_vec());

        if *self.fail_on_exec.lock().unwrap() == Some(call) {
            return Err(MediaError::exec_failed("mock exec failure", None, Some(1)));
        }

        // Successful execution produces the output artifact.
        self.storage
            .lock()
            .unwrap()
            .insert(OUTPUT_NAME.to_string(), b"artifact".to_vec());
        Ok(())
    }
}
