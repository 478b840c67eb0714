//! Request executor
//!
//! Runs one request against a leased session, either as a single awaited
//! result or as a stream of chunks. Both paths emit `started` before the
//! provider is invoked, shape the final text with the same strategy and end
//! with either `completed` or `error`. Aborted requests end silently.

use futures::StreamExt;
use std::marker::PhantomData;

use crate::config::FacadeConfig;
use crate::error::{AiError, classify_execution_error};
use crate::events::{EventBus, FacadeEvent};
use crate::kinds::{OperationKind, StreamingKind};
use crate::session::SessionLease;
use crate::streaming::{ChunkAccumulator, ExecutionStream, StreamPart, normalize_chunk_source};
use crate::traits::ExecuteOptions;
use crate::types::{ExecutionRequest, SessionOutput};
use crate::utils::cancel::AbortHandle;

/// Trips the request's provider-facing abort handle when dropped, so a
/// stream abandoned by its consumer stops generation upstream.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

pub struct RequestExecutor<K: OperationKind> {
    events: EventBus<K::Output>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: OperationKind> RequestExecutor<K> {
    pub fn new(events: EventBus<K::Output>) -> Self {
        Self {
            events,
            _kind: PhantomData,
        }
    }

    /// Blocking execution.
    pub async fn execute(
        &self,
        lease: &SessionLease,
        request: &ExecutionRequest,
        settings: &FacadeConfig,
    ) -> Result<K::Output, AiError> {
        let abort = lease.scope.child();
        let options = ExecuteOptions {
            context: request.auxiliary_context.clone(),
            abort: abort.clone(),
        };

        tracing::debug!(kind = %K::CAPABILITY, request_id = %request.id, "executing");
        self.events.emit(FacadeEvent::Started {
            request: request.clone(),
        });

        let outcome: Result<SessionOutput, AiError> = tokio::select! {
            biased;
            _ = request.abort.cancelled() => Err(AiError::Aborted),
            _ = abort.cancelled() => Err(AiError::Aborted),
            res = lease.session.execute(&request.primary_text, options) => {
                res.map_err(classify_execution_error)
            }
        };

        let result = outcome.and_then(|output| K::shape(request, output, settings));
        match result {
            Ok(result) => {
                tracing::debug!(kind = %K::CAPABILITY, request_id = %request.id, "completed");
                self.events.emit(FacadeEvent::Completed {
                    result: result.clone(),
                });
                Ok(result)
            }
            Err(err) => {
                abort.cancel();
                report_error::<K>(&self.events, &err);
                Err(err)
            }
        }
    }
}

impl<K: StreamingKind> RequestExecutor<K> {
    /// Streaming execution.
    ///
    /// The returned stream is lazy: chunks are pulled from the provider, and
    /// `streamingChunk` events emitted, only as the caller polls. `guard` is
    /// held until the stream finishes or is dropped.
    pub async fn execute_streaming<G>(
        &self,
        lease: SessionLease,
        request: ExecutionRequest,
        settings: FacadeConfig,
        guard: G,
    ) -> Result<ExecutionStream<K::Output>, AiError>
    where
        G: Send + 'static,
    {
        let abort = lease.scope.child();
        let options = ExecuteOptions {
            context: request.auxiliary_context.clone(),
            abort: abort.clone(),
        };

        tracing::debug!(kind = %K::CAPABILITY, request_id = %request.id, "starting stream");
        self.events.emit(FacadeEvent::Started {
            request: request.clone(),
        });

        let opened = tokio::select! {
            biased;
            _ = request.abort.cancelled() => Err(AiError::Aborted),
            _ = abort.cancelled() => Err(AiError::Aborted),
            res = lease.session.execute_streaming(&request.primary_text, options) => {
                res.map_err(classify_execution_error)
            }
        };
        let source = match opened {
            Ok(source) => source,
            Err(err) => {
                abort.cancel();
                report_error::<K>(&self.events, &err);
                return Err(err);
            }
        };

        let mut chunks = normalize_chunk_source(source);
        let events = self.events.clone();

        enum Step {
            Aborted,
            Item(Option<Result<String, crate::error::ProviderError>>),
        }

        let stream = async_stream::stream! {
            let _guard = guard;
            let _abort_on_drop = AbortOnDrop(abort.clone());
            let mut acc = ChunkAccumulator::new(settings.max_stream_buffer_bytes);

            loop {
                let step = tokio::select! {
                    biased;
                    _ = request.abort.cancelled() => Step::Aborted,
                    _ = abort.cancelled() => Step::Aborted,
                    item = chunks.next() => Step::Item(item),
                };

                match step {
                    Step::Aborted => {
                        tracing::debug!(
                            kind = %K::CAPABILITY,
                            request_id = %request.id,
                            chunks = acc.chunk_count(),
                            "stream aborted"
                        );
                        break;
                    }
                    Step::Item(Some(Ok(chunk))) => {
                        if let Err(err) = acc.push(&chunk) {
                            report_error::<K>(&events, &err);
                            yield Err(err);
                            break;
                        }
                        events.emit(FacadeEvent::StreamingChunk {
                            chunk: chunk.clone(),
                        });
                        yield Ok(StreamPart::Chunk(chunk));
                    }
                    Step::Item(Some(Err(provider_err))) => {
                        let err = classify_execution_error(provider_err);
                        if err.is_aborted() {
                            break;
                        }
                        report_error::<K>(&events, &err);
                        yield Err(err);
                        break;
                    }
                    Step::Item(None) => {
                        let chunk_count = acc.chunk_count();
                        let text = acc.into_text();
                        match K::shape(&request, SessionOutput::Text(text), &settings) {
                            Ok(result) => {
                                tracing::debug!(
                                    kind = %K::CAPABILITY,
                                    request_id = %request.id,
                                    chunks = chunk_count,
                                    "stream completed"
                                );
                                events.emit(FacadeEvent::Completed {
                                    result: result.clone(),
                                });
                                yield Ok(StreamPart::Completed(result));
                            }
                            Err(err) => {
                                report_error::<K>(&events, &err);
                                yield Err(err);
                            }
                        }
                        break;
                    }
                }
            }
            // Release the provider's reader before the facade goes back to Ready.
            drop(chunks);
        };
        Ok(Box::pin(stream))
    }
}

/// Publish a classified failure. Aborts are expected terminations and stay silent.
pub(crate) fn report_error<K: OperationKind>(events: &EventBus<K::Output>, err: &AiError) {
    if !err.is_reportable() {
        tracing::debug!(kind = %K::CAPABILITY, "request aborted");
        return;
    }
    tracing::warn!(kind = %K::CAPABILITY, error = %err, "request failed");
    events.emit(FacadeEvent::Error {
        message: err.to_string(),
    });
}
