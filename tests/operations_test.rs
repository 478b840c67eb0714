//! Per-kind result shaping through the public facade surface.

mod support;

use ondevice_ai::prelude::*;
use support::{EventLog, FakeProvider, Reply};

#[tokio::test]
async fn summary_reports_compression() {
    let provider = FakeProvider::new();
    provider.set_reply(Reply::Text("s".repeat(60)));
    let summarizer = Summarizer::with_defaults(provider);

    let result = summarizer
        .summarize(&"w".repeat(100), Some("for a newsletter"))
        .await
        .unwrap();
    assert_eq!(result.original_length, 100);
    assert_eq!(result.summary_length, 60);
    assert_eq!(result.compression_ratio, 40);
}

#[tokio::test]
async fn rewrite_reports_absolute_change() {
    let provider = FakeProvider::new();
    provider.set_reply(Reply::Text("r".repeat(75)));
    let rewriter = Rewriter::with_defaults(provider);

    let result = rewriter.rewrite(&"o".repeat(50), None).await.unwrap();
    assert_eq!(result.original_length, 50);
    assert_eq!(result.rewritten_length, 75);
    assert_eq!(result.change_ratio, 50);
}

#[tokio::test]
async fn write_counts_words_and_characters() {
    let provider = FakeProvider::new();
    provider.set_reply(Reply::Text("Thanks for  a\ngreat quarter".into()));
    let writer = Writer::with_defaults(provider);

    let result = writer
        .write("thank the team", Some("quarterly review"))
        .await
        .unwrap();
    assert_eq!(result.word_count, 5);
    assert_eq!(result.character_count, 27);
}

#[tokio::test]
async fn detections_are_filtered_sorted_and_truncated() {
    let provider = FakeProvider::new();
    provider.set_reply(Reply::Detections(vec![
        LanguageDetection::new("en", 0.9),
        LanguageDetection::new("fr", 0.4),
        LanguageDetection::new("es", 0.6),
    ]));
    let detector = LanguageDetector::new(
        provider,
        FacadeConfig::new()
            .with_confidence_threshold(0.5)
            .with_max_suggestions(2),
    )
    .unwrap();

    let ranked = detector.detect("Hola, how are you?").await.unwrap();
    let languages: Vec<&str> = ranked.iter().map(|d| d.detected_language.as_str()).collect();
    assert_eq!(languages, vec!["en", "es"]);
}

#[tokio::test]
async fn detector_rejects_text_output() {
    let provider = FakeProvider::new();
    let detector = LanguageDetector::with_defaults(provider);
    let err = detector.detect("bonjour").await.unwrap_err();
    assert!(matches!(err, AiError::ExecutionFailed(_)));
}

#[tokio::test]
async fn completed_event_carries_the_shaped_result() {
    let provider = FakeProvider::new();
    provider.set_reply(Reply::Text("short".into()));
    let summarizer = Summarizer::with_defaults(provider);
    let log = EventLog::attach(summarizer.events());

    let returned = summarizer.summarize("a much longer text", None).await.unwrap();
    let completed: Vec<SummaryResult> = log
        .events()
        .into_iter()
        .filter_map(|e| match e {
            FacadeEvent::Completed { result } => Some(result),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![returned]);
}

#[tokio::test]
async fn started_event_carries_the_request() {
    let provider = FakeProvider::new();
    let writer = Writer::with_defaults(provider);
    let log = EventLog::attach(writer.events());

    let request = writer.request("an invitation").with_context("for friday");
    let id = request.id;
    writer.execute(request).await.unwrap();

    let started = log
        .events()
        .into_iter()
        .find_map(|e| match e {
            FacadeEvent::Started { request } => Some(request),
            _ => None,
        })
        .unwrap();
    assert_eq!(started.id, id);
    assert_eq!(started.primary_text, "an invitation");
    assert_eq!(started.auxiliary_context.as_deref(), Some("for friday"));
}

#[tokio::test]
async fn events_serialize_with_wire_names() {
    let provider = FakeProvider::new();
    let writer = Writer::with_defaults(provider);
    let log = EventLog::attach(writer.events());
    writer.write("hi", None).await.unwrap();

    let types: Vec<String> = log
        .events()
        .iter()
        .map(|e| serde_json::to_value(e).unwrap()["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        types,
        vec!["initialized", "sessionCreated", "started", "completed"]
    );
}

#[tokio::test]
async fn unsubscribed_handlers_stop_receiving() {
    let provider = FakeProvider::new();
    let writer = Writer::with_defaults(provider);
    let seen = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = seen.clone();
    let id = writer.events().on(EventKind::Completed, move |_| {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    });

    writer.write("one", None).await.unwrap();
    assert!(writer.events().off(EventKind::Completed, id));
    writer.write("two", None).await.unwrap();
    assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn option_getters_reflect_the_probed_schema() {
    let provider = FakeProvider::new();
    let summarizer = Summarizer::with_defaults(provider.clone());
    assert!(summarizer.supported_summary_types().is_empty());

    summarizer.initialize().await.unwrap();
    assert!(summarizer.supported_summary_types().contains(&SummaryType::Tldr));
    assert!(summarizer.supported_formats().contains(&Format::Markdown));
    assert!(summarizer.supported_lengths().contains(&Length::Long));
    assert!(summarizer.supported_languages().is_empty());
}
