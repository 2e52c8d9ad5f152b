//! Contract tests for the conversion dispatcher: every call returns a
//! uniform outcome, never an error, across supported and unsupported
//! routes.

use std::sync::{Arc, Mutex};

use holliday_core::{
    CompatibilityResolver, ConversionDispatcher, Dispatch, Format, FormatCatalog, ProgressSink,
    SourceFile,
};

fn logging_sink() -> (ProgressSink, Arc<Mutex<Vec<u8>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = Arc::clone(&log);
    let sink = ProgressSink::new(move |p| log_clone.lock().unwrap().push(p));
    (sink, log)
}

#[tokio::test]
async fn test_text_conversions_succeed_with_full_progress() {
    let dispatcher = ConversionDispatcher::new();
    let file = SourceFile::new("notes.txt", &b"one\ntwo\nthree"[..]);

    for target in [Format::Pdf, Format::Html, Format::Docx] {
        let (sink, log) = logging_sink();
        let outcome = dispatcher.convert(&file, target, &sink).await;

        assert!(outcome.success, "txt -> {} failed", target);
        assert!(outcome.data.is_some());
        assert!(outcome.error.is_none());

        let log = log.lock().unwrap();
        assert!(log.len() >= 3, "txt -> {}: too few milestones", target);
        assert!(log.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*log.last().unwrap(), 100);
    }
}

#[tokio::test]
async fn test_every_catalog_pair_converts_plain_inputs() {
    let dispatcher = ConversionDispatcher::new();

    // Plain-text-bodied sources are enough to drive the text routes.
    for (source, body) in [
        (Format::Txt, &b"hello"[..]),
        (Format::Html, &b"<p>hello</p>"[..]),
        (Format::Rtf, &br"{\rtf1 hello\par}"[..]),
    ] {
        for &target in FormatCatalog::targets(source) {
            let name = format!("input.{}", source.extension());
            let file = SourceFile::new(name, body);
            let outcome = dispatcher
                .convert(&file, target, &ProgressSink::discard())
                .await;
            assert!(
                outcome.success,
                "{} -> {} failed: {:?}",
                source, target, outcome.error
            );
        }
    }
}

#[tokio::test]
async fn test_unsupported_pairs_fail_without_panicking() {
    let dispatcher = ConversionDispatcher::new();

    let cases = [
        ("book.docx", Format::Epub),
        ("photo.jpg", Format::Txt),
        ("sheet.xlsx", Format::Docx),
        ("page.pdf", Format::Html),
    ];

    for (name, target) in cases {
        let file = SourceFile::new(name, &b"irrelevant"[..]);
        let outcome = dispatcher
            .convert(&file, target, &ProgressSink::discard())
            .await;

        assert!(!outcome.success);
        assert!(outcome.data.is_none());
        let error = outcome.error.unwrap();
        assert!(
            error.contains("is not supported"),
            "unexpected error for {}: {}",
            name,
            error
        );
    }
}

#[tokio::test]
async fn test_malformed_inputs_fail_without_panicking() {
    let dispatcher = ConversionDispatcher::new();

    let cases = [
        ("broken.pdf", Format::Txt),
        ("broken.docx", Format::Txt),
        ("broken.xlsx", Format::Txt),
        ("broken.png", Format::Pdf),
        ("broken.jpg", Format::Pdf),
    ];

    for (name, target) in cases {
        let file = SourceFile::new(name, &b"garbage bytes that parse as nothing"[..]);
        let outcome = dispatcher
            .convert(&file, target, &ProgressSink::discard())
            .await;

        assert!(!outcome.success, "{} should have failed", name);
        assert!(outcome.error.is_some());
        assert!(outcome.data.is_none());
    }
}

#[tokio::test]
async fn test_composed_route_reports_both_halves() {
    let dispatcher = ConversionDispatcher::new();
    let (sink, log) = logging_sink();

    let html = b"<html><body><p>Hello</p><p>World</p></body></html>";
    let file = SourceFile::new("page.html", &html[..]);
    let outcome = dispatcher.convert(&file, Format::Pdf, &sink).await;
    assert!(outcome.success);

    let log = log.lock().unwrap();
    assert!(log.iter().any(|&p| p <= 50));
    assert!(log.iter().any(|&p| p > 50));
    assert!(log.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(*log.last().unwrap(), 100);
}

#[tokio::test]
async fn test_output_filename_follows_target() {
    let dispatcher = ConversionDispatcher::new();
    let file = SourceFile::new("My Report.v2.txt", &b"hello"[..]);

    let outcome = dispatcher
        .convert(&file, Format::Pdf, &ProgressSink::discard())
        .await;
    assert_eq!(outcome.filename, "My Report.v2.pdf");

    // Failures still carry the derived filename.
    let file = SourceFile::new("bad.docx", &b"zip?"[..]);
    let outcome = dispatcher
        .convert(&file, Format::Txt, &ProgressSink::discard())
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.filename, "bad.txt");
}

#[tokio::test]
async fn test_resolver_matches_dispatcher_support() {
    let dispatcher = ConversionDispatcher::new();

    // Any target offered for a txt selection must actually convert.
    let targets = CompatibilityResolver::resolve(["notes.txt"]);
    assert!(!targets.is_empty());

    for target in targets {
        let file = SourceFile::new("notes.txt", &b"hello"[..]);
        let outcome = dispatcher
            .convert(&file, target, &ProgressSink::discard())
            .await;
        assert!(outcome.success, "resolver offered {} but it failed", target);
    }

    // Disjoint selections resolve to nothing.
    assert!(CompatibilityResolver::resolve(["a.pdf", "b.jpg"]).is_empty());
}
