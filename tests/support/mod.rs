//! Scriptable in-memory provider shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use ondevice_ai::prelude::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// What a session's blocking `execute` answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Return the input unchanged.
    Echo,
    Text(String),
    Detections(Vec<LanguageDetection>),
    Fail(ProviderError),
    /// Wait until aborted, then fail with an abort error.
    Pending,
}

/// What a session's `execute_streaming` produces.
#[derive(Debug, Clone)]
pub enum StreamScript {
    /// An async stream of the given items.
    Stream(Vec<Result<String, ProviderError>>),
    /// A pull-based reader over the given items.
    Reader(Vec<Result<String, ProviderError>>),
    /// Stream the given chunks, then never finish.
    Stall(Vec<String>),
    /// Refuse to open a stream.
    Fail(ProviderError),
}

#[derive(Default)]
pub struct Counters {
    pub availability: AtomicUsize,
    pub create_attempts: AtomicUsize,
    pub created: AtomicUsize,
    pub destroyed: AtomicUsize,
    pub executed: AtomicUsize,
    pub reader_releases: AtomicUsize,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct FakeProvider {
    availability: Mutex<Result<Availability, ProviderError>>,
    options: Mutex<Option<SupportedOptions>>,
    create_failures: Mutex<VecDeque<ProviderError>>,
    availability_gate: Mutex<Option<Arc<Notify>>>,
    stall_creates: AtomicBool,
    download_reports: Mutex<Vec<(f64, f64)>>,
    reply: Arc<Mutex<Reply>>,
    stream: Arc<Mutex<StreamScript>>,
    pub counters: Arc<Counters>,
    pub created_configs: Mutex<Vec<SessionConfig>>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Self::with_availability(Availability::Available)
    }

    pub fn with_availability(availability: Availability) -> Arc<Self> {
        Arc::new(Self {
            availability: Mutex::new(Ok(availability)),
            options: Mutex::new(None),
            create_failures: Mutex::new(VecDeque::new()),
            availability_gate: Mutex::new(None),
            stall_creates: AtomicBool::new(false),
            download_reports: Mutex::new(Vec::new()),
            reply: Arc::new(Mutex::new(Reply::Echo)),
            stream: Arc::new(Mutex::new(StreamScript::Stream(Vec::new()))),
            counters: Arc::new(Counters::default()),
            created_configs: Mutex::new(Vec::new()),
        })
    }

    pub fn set_availability(&self, availability: Result<Availability, ProviderError>) {
        *self.availability.lock().unwrap() = availability;
    }

    pub fn set_supported_options(&self, options: SupportedOptions) {
        *self.options.lock().unwrap() = Some(options);
    }

    /// Fail the next session creation with `err`.
    pub fn fail_next_create(&self, err: ProviderError) {
        self.create_failures.lock().unwrap().push_back(err);
    }

    /// Hold every availability check until the returned gate is notified.
    pub fn gate_availability(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.availability_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Make session creation wait until its abort signal fires.
    pub fn stall_creates(&self) {
        self.stall_creates.store(true, Ordering::SeqCst);
    }

    pub fn create_attempts(&self) -> usize {
        Counters::get(&self.counters.create_attempts)
    }

    /// Report these download progress steps during every creation.
    pub fn report_download(&self, steps: Vec<(f64, f64)>) {
        *self.download_reports.lock().unwrap() = steps;
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn set_stream(&self, script: StreamScript) {
        *self.stream.lock().unwrap() = script;
    }

    pub fn created(&self) -> usize {
        Counters::get(&self.counters.created)
    }

    pub fn destroyed(&self) -> usize {
        Counters::get(&self.counters.destroyed)
    }

    pub fn availability_calls(&self) -> usize {
        Counters::get(&self.counters.availability)
    }

    pub fn reader_releases(&self) -> usize {
        Counters::get(&self.counters.reader_releases)
    }
}

#[async_trait]
impl CapabilityProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn availability(
        &self,
        _kind: CapabilityKind,
        _config: &SessionConfig,
    ) -> Result<Availability, ProviderError> {
        self.counters.availability.fetch_add(1, Ordering::SeqCst);
        let gate = self.availability_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.availability.lock().unwrap().clone()
    }

    fn supported_options(&self, _kind: CapabilityKind) -> Option<SupportedOptions> {
        self.options.lock().unwrap().clone()
    }

    async fn create_session(
        &self,
        _kind: CapabilityKind,
        config: &SessionConfig,
        options: CreateSessionOptions,
    ) -> Result<Arc<dyn ProviderSession>, ProviderError> {
        self.counters.create_attempts.fetch_add(1, Ordering::SeqCst);
        if self.stall_creates.load(Ordering::SeqCst) {
            options.abort.cancelled().await;
            return Err(ProviderError::aborted());
        }
        if let Some(err) = self.create_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        for (loaded, total) in self.download_reports.lock().unwrap().iter() {
            options.monitor.report(*loaded, *total);
        }
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        self.created_configs.lock().unwrap().push(config.clone());
        Ok(Arc::new(FakeSession {
            reply: self.reply.clone(),
            stream: self.stream.clone(),
            counters: self.counters.clone(),
            destroyed: Mutex::new(false),
        }))
    }
}

pub struct FakeSession {
    reply: Arc<Mutex<Reply>>,
    stream: Arc<Mutex<StreamScript>>,
    counters: Arc<Counters>,
    destroyed: Mutex<bool>,
}

#[async_trait]
impl ProviderSession for FakeSession {
    async fn execute(
        &self,
        input: &str,
        options: ExecuteOptions,
    ) -> Result<SessionOutput, ProviderError> {
        self.counters.executed.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.lock().unwrap().clone();
        match reply {
            Reply::Echo => Ok(SessionOutput::Text(input.to_string())),
            Reply::Text(text) => Ok(SessionOutput::Text(text)),
            Reply::Detections(d) => Ok(SessionOutput::Detections(d)),
            Reply::Fail(err) => Err(err),
            Reply::Pending => {
                options.abort.cancelled().await;
                Err(ProviderError::aborted())
            }
        }
    }

    async fn execute_streaming(
        &self,
        _input: &str,
        _options: ExecuteOptions,
    ) -> Result<ChunkSource, ProviderError> {
        self.counters.executed.fetch_add(1, Ordering::SeqCst);
        let script = self.stream.lock().unwrap().clone();
        match script {
            StreamScript::Stream(items) => {
                Ok(ChunkSource::Stream(Box::pin(futures::stream::iter(items))))
            }
            StreamScript::Reader(items) => Ok(ChunkSource::Reader(Box::new(ScriptedReader {
                items: items.into(),
                counters: self.counters.clone(),
            }))),
            StreamScript::Stall(chunks) => {
                let items = futures::stream::iter(chunks.into_iter().map(Ok));
                Ok(ChunkSource::Stream(Box::pin(
                    items.chain(futures::stream::pending()),
                )))
            }
            StreamScript::Fail(err) => Err(err),
        }
    }

    fn destroy(&self) {
        let mut destroyed = self.destroyed.lock().unwrap();
        if !*destroyed {
            *destroyed = true;
            self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct ScriptedReader {
    items: VecDeque<Result<String, ProviderError>>,
    counters: Arc<Counters>,
}

#[async_trait]
impl ChunkReader for ScriptedReader {
    async fn read(&mut self) -> Result<Option<String>, ProviderError> {
        match self.items.pop_front() {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }

    fn release_lock(&mut self) {
        self.counters.reader_releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records every event a facade emits, by kind name.
pub struct EventLog<R> {
    events: Arc<Mutex<Vec<FacadeEvent<R>>>>,
}

impl<R: Clone + Send + Sync + 'static> EventLog<R> {
    pub fn attach(bus: &EventBus<R>) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        bus.on_any(move |event| sink.lock().unwrap().push(event.clone()));
        Self { events }
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind().as_str())
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    pub fn events(&self) -> Vec<FacadeEvent<R>> {
        self.events.lock().unwrap().clone()
    }

    pub fn chunks(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                FacadeEvent::StreamingChunk { chunk } => Some(chunk.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

pub fn chunks(parts: &[&str]) -> Vec<Result<String, ProviderError>> {
    parts.iter().map(|p| Ok(p.to_string())).collect()
}
