//! Streaming execution tests
//!
//! Covers both provider chunk shapes (async stream and pull reader), the
//! chunk/result concatenation law, mid-stream failures and cancellation.

mod support;

use ondevice_ai::prelude::*;
use proptest::prelude::*;
use support::{Counters, EventLog, FakeProvider, Reply, StreamScript, chunks};

async fn drain<T>(mut stream: ExecutionStream<T>) -> Vec<Result<StreamPart<T>, AiError>> {
    let mut parts = Vec::new();
    while let Some(part) = stream.next().await {
        parts.push(part);
    }
    parts
}

#[tokio::test]
async fn streamed_chunks_concatenate_to_the_final_result() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Stream(chunks(&["Dear ", "team,", " thanks!"])));
    let writer = Writer::with_defaults(provider.clone());
    writer.create_session().await.unwrap();
    let log = EventLog::attach(writer.events());

    let stream = writer.write_streaming("a thank-you note", None).await.unwrap();
    assert_eq!(writer.state(), FacadeState::Busy);
    let parts = drain(stream).await;

    let streamed: Vec<String> = parts
        .iter()
        .filter_map(|p| p.as_ref().ok().and_then(|p| p.as_chunk()).map(str::to_string))
        .collect();
    assert_eq!(streamed, vec!["Dear ", "team,", " thanks!"]);

    let Some(Ok(StreamPart::Completed(result))) = parts.last() else {
        panic!("stream did not complete: {parts:?}");
    };
    assert_eq!(result.content, streamed.concat());
    assert_eq!(result.word_count, 3);
    assert_eq!(
        log.kinds(),
        vec![
            "started",
            "streamingChunk",
            "streamingChunk",
            "streamingChunk",
            "completed"
        ]
    );
    assert_eq!(log.chunks(), streamed);
    assert_eq!(writer.state(), FacadeState::Ready);
    assert_eq!(provider.created(), 1);
}

#[tokio::test]
async fn reader_sources_are_drained_and_released_once() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Reader(chunks(&["Short", " and", " sweet"])));
    let rewriter = Rewriter::with_defaults(provider.clone());

    let stream = rewriter
        .rewrite_streaming("Make this paragraph shorter please", None)
        .await
        .unwrap();
    let result = collect_completed(stream).await.unwrap();

    assert_eq!(result.content, "Short and sweet");
    assert_eq!(result.rewritten_length, 15);
    assert_eq!(provider.reader_releases(), 1);
    assert_eq!(rewriter.state(), FacadeState::Ready);
}

#[tokio::test]
async fn streaming_and_blocking_shape_identically() {
    let input = "x".repeat(100);
    let output = "y".repeat(60);

    let provider = FakeProvider::new();
    provider.set_reply(Reply::Text(output.clone()));
    provider.set_stream(StreamScript::Stream(chunks(&[&output[..25], &output[25..]])));
    let summarizer = Summarizer::with_defaults(provider);

    let blocking = summarizer.summarize(&input, None).await.unwrap();
    let streamed = collect_completed(summarizer.summarize_streaming(&input, None).await.unwrap())
        .await
        .unwrap();

    assert_eq!(blocking, streamed);
    assert_eq!(streamed.compression_ratio, 40);
}

#[tokio::test]
async fn reader_failure_mid_stream_ends_with_one_error() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Reader(vec![
        Ok("partial".to_string()),
        Err(ProviderError::named("UnknownError", "decoder crashed")),
        Ok("never delivered".to_string()),
    ]));
    let writer = Writer::with_defaults(provider.clone());
    writer.initialize().await.unwrap();
    let log = EventLog::attach(writer.events());

    let parts = drain(writer.write_streaming("a story", None).await.unwrap()).await;

    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], Ok(StreamPart::Chunk("partial".to_string())));
    assert!(matches!(&parts[1], Err(AiError::ExecutionFailed(m)) if m.contains("decoder crashed")));
    assert_eq!(log.count(EventKind::Error), 1);
    assert_eq!(log.count(EventKind::Completed), 0);
    assert_eq!(log.chunks(), vec!["partial"]);
    assert_eq!(provider.reader_releases(), 1);
    assert_eq!(writer.state(), FacadeState::Ready);
}

#[tokio::test]
async fn stream_failure_after_chunks_is_not_retried() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Stream(vec![
        Ok("a".to_string()),
        Ok("b".to_string()),
        Err(ProviderError::new("connection reset")),
    ]));
    let summarizer = Summarizer::with_defaults(provider.clone());
    let log = EventLog::attach(summarizer.events());

    let err = collect_completed(summarizer.summarize_streaming("some text", None).await.unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::ExecutionFailed(_)));
    assert_eq!(log.chunks(), vec!["a", "b"]);
    assert_eq!(Counters::get(&provider.counters.executed), 1);
}

#[tokio::test]
async fn refused_stream_is_reported() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Fail(ProviderError::named(
        "NotSupportedError",
        "streaming disabled",
    )));
    let writer = Writer::with_defaults(provider);
    writer.initialize().await.unwrap();
    let log = EventLog::attach(writer.events());

    let err = match writer.write_streaming("a note", None).await {
        Ok(_) => panic!("stream should not open"),
        Err(err) => err,
    };
    assert!(matches!(err, AiError::ExecutionFailed(_)));
    assert_eq!(log.kinds(), vec!["sessionCreated", "started", "error"]);
    assert_eq!(writer.state(), FacadeState::Ready);
}

#[tokio::test]
async fn cancel_mid_stream_ends_silently() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Stall(vec!["one".into(), "two".into()]));
    let writer = Writer::with_defaults(provider);
    writer.initialize().await.unwrap();
    let log = EventLog::attach(writer.events());

    let mut stream = writer.write_streaming("an endless story", None).await.unwrap();
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.as_chunk(), Some("one"));

    assert!(writer.cancel());
    assert!(stream.next().await.is_none());
    drop(stream);

    assert_eq!(log.count(EventKind::Error), 0);
    assert_eq!(log.count(EventKind::Completed), 0);
    assert_eq!(writer.state(), FacadeState::Ready);
    assert!(!writer.cancel());
}

#[tokio::test]
async fn dropping_a_stream_releases_the_facade() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Stall(vec!["one".into()]));
    let rewriter = Rewriter::with_defaults(provider);

    let mut stream = rewriter.rewrite_streaming("some text", None).await.unwrap();
    stream.next().await.unwrap().unwrap();
    assert_eq!(rewriter.state(), FacadeState::Busy);
    assert!(matches!(
        rewriter.rewrite("other text", None).await,
        Err(AiError::NotReady(_))
    ));

    drop(stream);
    assert_eq!(rewriter.state(), FacadeState::Ready);
}

#[tokio::test]
async fn session_invalidation_aborts_an_open_stream() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Stall(vec!["one".into()]));
    let writer = Writer::with_defaults(provider.clone());
    let log = EventLog::attach(writer.events());

    let mut stream = writer.write_streaming("a story", None).await.unwrap();
    stream.next().await.unwrap().unwrap();

    writer
        .set_session_config(SessionConfig::new().with_tone(Tone::Formal))
        .await;
    assert!(stream.next().await.is_none());
    assert_eq!(provider.destroyed(), 1);
    assert_eq!(log.count(EventKind::Error), 0);
}

#[tokio::test]
async fn stream_buffer_limit_fails_the_stream() {
    let provider = FakeProvider::new();
    provider.set_stream(StreamScript::Stream(chunks(&["12345", "67890", "overflow"])));
    let writer = Writer::new(
        provider,
        FacadeConfig::new().with_max_stream_buffer_bytes(Some(10)),
    )
    .unwrap();

    let parts = drain(writer.write_streaming("a note", None).await.unwrap()).await;
    assert_eq!(parts.len(), 3);
    assert!(matches!(parts[2], Err(AiError::ExecutionFailed(_))));
}

fn chunk_lists() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 ,.!?éü日本]{0,12}", 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn completed_text_is_the_concatenation_of_chunks(parts in chunk_lists()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (streamed, result) = rt.block_on(async {
            let provider = FakeProvider::new();
            provider.set_stream(StreamScript::Stream(
                parts.iter().cloned().map(Ok).collect(),
            ));
            let writer = Writer::with_defaults(provider);
            let stream = writer.write_streaming("prompt", None).await.unwrap();
            let mut streamed = Vec::new();
            let mut result = None;
            for part in drain(stream).await {
                match part.unwrap() {
                    StreamPart::Chunk(c) => streamed.push(c),
                    StreamPart::Completed(r) => result = Some(r),
                }
            }
            (streamed, result.unwrap())
        });

        prop_assert_eq!(&streamed, &parts);
        prop_assert_eq!(&result.content, &parts.concat());
        prop_assert_eq!(result.character_count, parts.concat().chars().count());
    }
}
