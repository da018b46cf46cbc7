use std::io;
use std::sync::{Arc, Mutex};

use sequin::{EqualityComparer, KeyedBucketStore};
use tracing_subscriber::fmt::MakeWriter;

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `body` with warnings captured, returning the log text
fn capture_warnings(body: impl FnOnce()) -> String {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, body);
    captured.text()
}

/// Case-insensitive equality over a case-sensitive hash
fn mismatched() -> EqualityComparer<&'static str> {
    EqualityComparer::new(
        |a: &&str, b: &&str| a.eq_ignore_ascii_case(b),
        |s: &&str| s.bytes().map(i32::from).sum(),
    )
}

#[test]
fn test_equal_keys_with_different_hashes_are_reported() {
    let mut store = KeyedBucketStore::new(mismatched());
    let log = capture_warnings(|| {
        assert!(store.insert_unique("Go", 1));
        assert!(store.insert_unique("GO", 2));
    });
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&"GO"), Some(&2));
    assert!(log.contains("WARN"), "log was: {log}");
    assert!(log.contains("equal keys hash differently"), "log was: {log}");
}

#[test]
fn test_consistent_comparer_is_silent() {
    let mut store = KeyedBucketStore::new(EqualityComparer::default());
    let log = capture_warnings(|| {
        for word in ["go", "rust", "go", "zig"] {
            store.insert_unique(word, ());
        }
    });
    assert_eq!(store.len(), 3);
    assert!(log.is_empty(), "log was: {log}");
}
