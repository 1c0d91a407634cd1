//! Concurrent callers on one entity

use delegata_core::{
    Call, Capabilities, CapabilityGroup, Catalog, DelegateError, DelegateId, Entity, FeatureStore,
    Kind, Options, Registry, Value,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier, OnceLock};
use std::thread;
use std::time::Duration;

struct Document {
    text: String,
    features: FeatureStore,
}

impl Document {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            features: FeatureStore::new(),
        }
    }
}

impl Entity for Document {
    fn language(&self) -> &str {
        "en"
    }

    fn features(&self) -> &FeatureStore {
        &self.features
    }
}

fn slow_segmenter(
    calls: Arc<AtomicUsize>,
) -> impl Fn(&Document, &Options) -> Result<Value, DelegateError> + Send + Sync {
    move |document: &Document, _options: &Options| {
        calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(json!(document.text.split(". ").collect::<Vec<_>>()))
    }
}

fn segmenters(calls: &Arc<AtomicUsize>) -> Capabilities<Document> {
    let group = CapabilityGroup::builder("segment", "segmenters", Kind::Processors)
        .delegates(["tactful", "punkt", "stanford"])
        .preset("quick_segment", Options::new())
        .build()
        .unwrap();
    let mut catalog = Catalog::new();
    for id in ["tactful", "punkt", "stanford"] {
        catalog.register("segment", id, slow_segmenter(calls.clone()));
    }

    Capabilities::builder()
        .registry(Registry::new().with(group).unwrap())
        .catalog(catalog)
        .build()
        .unwrap()
}

#[test]
fn test_annotator_computed_once_across_threads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let caps = segmenters(&calls);
    let document = Document::new("One. Two. Three.");

    let results: Vec<Value> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| caps.run(&document, "segment").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|r| r == &json!(["One", "Two", "Three."])));
}

#[test]
fn test_separate_entities_compute_independently() {
    let calls = Arc::new(AtomicUsize::new(0));
    let caps = segmenters(&calls);
    let documents: Vec<Document> = (0..4)
        .map(|i| Document::new(&format!("Doc {i}. End.")))
        .collect();

    thread::scope(|scope| {
        for document in &documents {
            let caps = &caps;
            scope.spawn(move || caps.run(document, "segment").unwrap());
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert!(documents.iter().all(|d| d.features.contains("segment")));
}

#[test]
fn test_preset_relabel_is_atomic() {
    let calls = Arc::new(AtomicUsize::new(0));
    let caps = segmenters(&calls);
    let document = Document::new("One. Two.");

    thread::scope(|scope| {
        scope.spawn(|| caps.run(&document, "quick_segment").unwrap());
        scope.spawn(|| caps.run(&document, "segment").unwrap());
    });

    // The preset always ends up holding a value; the base method recomputes
    // only when it ran after the relabel
    assert!(document.features.contains("quick_segment"));
    let expected = if document.features.contains("segment") { 2 } else { 1 };
    assert_eq!(calls.load(Ordering::SeqCst), expected);
}

static NESTED: OnceLock<Capabilities<Document>> = OnceLock::new();

#[test]
fn test_delegate_may_call_other_operations() {
    let tokenize = CapabilityGroup::builder("tokenize", "tokenizers", Kind::Processors)
        .delegates(["perl"])
        .default_delegate("perl")
        .build()
        .unwrap();
    let parse = CapabilityGroup::builder("parse", "parsers", Kind::Processors)
        .delegates(["stanford"])
        .build()
        .unwrap();
    let catalog = Catalog::new()
        .with("tokenize", "perl", |d: &Document, _o: &Options| {
            Ok::<Value, DelegateError>(json!(d.text.split_whitespace().collect::<Vec<_>>()))
        })
        .with("parse", "stanford", |d: &Document, _o: &Options| -> Result<Value, DelegateError> {
            let caps = NESTED.get().ok_or("capabilities not installed")?;
            // Same thread re-enters the feature store for another feature
            let tokens = caps.run(d, "tokenize")?;
            let again = caps.call(d, "tokenize", Call::new().delegate("perl"))?;
            assert_eq!(tokens, again);
            Ok(json!({"tree": tokens}))
        });

    let caps = Capabilities::builder()
        .registry(Registry::new().with(tokenize).unwrap().with(parse).unwrap())
        .catalog(catalog)
        .build()
        .unwrap();
    let caps = NESTED.get_or_init(|| caps);

    let document = Document::new("dogs bark");
    let value = caps.run(&document, "parse").unwrap();
    assert_eq!(value, json!({"tree": ["dogs", "bark"]}));
    assert_eq!(
        document.features.names(),
        vec!["parse".to_string(), "tokenize".to_string()]
    );
}

static CROSSED: OnceLock<Capabilities<Document>> = OnceLock::new();

/// `pretokenize` calls `parse`, whose delegate calls `tokenize`
fn crossed() -> &'static Capabilities<Document> {
    CROSSED.get_or_init(|| {
        let tokenize = CapabilityGroup::builder("tokenize", "tokenizers", Kind::Processors)
            .delegates(["perl"])
            .default_delegate("perl")
            .preprocessor(
                "pretokenize",
                |d: &Document, _delegate: Option<&DelegateId>, _o: &Options| {
                    thread::sleep(Duration::from_millis(20));
                    let tree = crossed().run(d, "parse")?;
                    Ok(json!({"pretokenized": d.text, "tree": tree}))
                },
            )
            .build()
            .unwrap();
        let parse = CapabilityGroup::builder("parse", "parsers", Kind::Processors)
            .delegates(["stanford"])
            .default_delegate("stanford")
            .build()
            .unwrap();
        let catalog = Catalog::new()
            .with("tokenize", "perl", |d: &Document, _o: &Options| {
                Ok::<Value, DelegateError>(json!(d.text.split_whitespace().collect::<Vec<_>>()))
            })
            .with("parse", "stanford", |d: &Document, _o: &Options| -> Result<Value, DelegateError> {
                thread::sleep(Duration::from_millis(20));
                let tokens = crossed().run(d, "tokenize")?;
                Ok(json!({"tree": tokens}))
            });

        Capabilities::builder()
            .registry(Registry::new().with(tokenize).unwrap().with(parse).unwrap())
            .catalog(catalog)
            .build()
            .unwrap()
    })
}

#[test]
fn test_operations_nested_in_opposite_order_across_threads() {
    let caps = crossed();
    let document = Arc::new(Document::new("dogs bark"));
    let barrier = Arc::new(Barrier::new(2));
    let (sender, receiver) = mpsc::channel();

    for name in ["pretokenize", "parse"] {
        let document = Arc::clone(&document);
        let barrier = Arc::clone(&barrier);
        let sender = sender.clone();
        thread::spawn(move || {
            barrier.wait();
            let result = caps.run(&document, name).map_err(|e| e.to_string());
            let _ = sender.send((name, result));
        });
    }
    drop(sender);

    for _ in 0..2 {
        let (name, result) = receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("both operations finish");
        assert!(result.is_ok(), "{name}: {result:?}");
    }
    assert!(document.features.contains("parse"));
    assert!(document.features.contains("pretokenize"));
}
