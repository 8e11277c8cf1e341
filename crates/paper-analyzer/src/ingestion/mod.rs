//! Paper ingestion: PDF text extraction and word-window chunking

mod chunker;
mod parser;
mod processor;

pub use chunker::TextChunker;
pub use parser::{clean_extracted_text, ExtractionMethod, ParsedDocument, PdfParser};
pub use processor::IngestPipeline;
