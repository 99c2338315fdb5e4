use std::sync::Arc;

use kuching::application::ports::{FileLoader, FileLoaderError};
use kuching::domain::{ContentType, Document};
use kuching::infrastructure::text_processing::{CompositeFileLoader, PlainTextAdapter};

#[tokio::test]
async fn given_text_document_when_loading_then_delegates_to_text_adapter() {
    let loader = CompositeFileLoader::with_defaults();

    let text_bytes = b"Hello plain text";
    let document = Document::new(
        "readme.txt".to_string(),
        ContentType::Text,
        text_bytes.len() as u64,
    );

    let result = loader.extract_text(text_bytes, &document).await;

    assert_eq!(result.unwrap(), "Hello plain text");
}

#[tokio::test]
async fn given_markdown_document_when_loading_then_delegates_to_text_adapter() {
    let loader = CompositeFileLoader::with_defaults();

    let text_bytes = b"# Heading\n\nBody";
    let document = Document::new(
        "notes.md".to_string(),
        ContentType::Markdown,
        text_bytes.len() as u64,
    );

    let result = loader.extract_text(text_bytes, &document).await;

    assert_eq!(result.unwrap(), "# Heading\n\nBody");
}

#[tokio::test]
async fn given_unregistered_content_type_when_loading_then_returns_unsupported() {
    let text_adapter: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
    let loader = CompositeFileLoader::new(vec![(ContentType::Text, text_adapter)]);

    let data = b"%PDF-1.4";
    let document = Document::new(
        "lecture.pdf".to_string(),
        ContentType::Pdf,
        data.len() as u64,
    );

    let result = loader.extract_text(data, &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
