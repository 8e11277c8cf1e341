//! Shared fixtures for unit tests

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::generation::InferenceError;
use crate::providers::LlmProvider;

/// Build a one-page PDF with one line of text per entry
pub fn build_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("TL", vec![14.into()]),
        Operation::new("Td", vec![50.into(), 800.into()]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Lines of a paper long enough to pass the minimum-text check
pub fn sample_paper_lines() -> Vec<&'static str> {
    vec![
        "Attention Is All You Need",
        "The dominant sequence transduction models are based on complex recurrent",
        "or convolutional neural networks that include an encoder and a decoder.",
        "We propose a new simple network architecture the Transformer based solely",
        "on attention mechanisms dispensing with recurrence and convolutions entirely.",
        "Experiments on two machine translation tasks show these models to be superior",
        "in quality while being more parallelizable and requiring less time to train.",
    ]
}

/// In-memory provider returning a canned reply or error
pub struct StubLlm {
    ready: bool,
    reply: Result<String, InferenceError>,
    health_calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubLlm {
    pub fn ready(reply: &str) -> Self {
        Self {
            ready: true,
            reply: Ok(reply.to_string()),
            health_calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            reply: Err(InferenceError::NotReady),
            ..Self::ready("")
        }
    }

    pub fn failing(err: InferenceError) -> Self {
        Self {
            reply: Err(err),
            ..Self::ready("")
        }
    }

    pub fn health_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.health_calls)
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.prompts.lock().push(prompt.to_string());
        self.reply.clone()
    }

    async fn health_check(&self) -> bool {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.ready
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    fn endpoint(&self) -> &str {
        "http://stub"
    }
}
