use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

/// Loader for `.txt` and `.md` uploads. Decoding is permissive, invalid
/// UTF-8 sequences are replaced rather than rejected, since student notes
/// arrive in every encoding under the sun. The text itself is kept verbatim;
/// markdown structure such as indented code blocks must survive.
pub struct PlainTextAdapter;

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if !matches!(
            document.content_type,
            ContentType::Text | ContentType::Markdown
        ) {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let text = String::from_utf8_lossy(data).trim().to_string();
        if text.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        Ok(text)
    }
}
