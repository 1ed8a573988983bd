//! services/engine/src/adapters/extract.rs
//!
//! This module contains the text-extraction adapter. Extraction is an
//! opaque converter as far as the core is concerned; this implementation
//! handles plain UTF-8 text uploads.

use async_trait::async_trait;
use voxbook_core::ports::{PortError, PortResult, TextExtractionService};

/// An adapter that implements `TextExtractionService` for plain-text files.
#[derive(Clone, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractionService for PlainTextExtractor {
    async fn extract(&self, data: &[u8]) -> PortResult<String> {
        String::from_utf8(data.to_vec())
            .map_err(|e| PortError::Unexpected(format!("upload is not valid UTF-8 text: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn valid_utf8_passes_through() {
        let text = PlainTextExtractor.extract("Hello\nWorld".as_bytes()).await.unwrap();
        assert_eq!(text, "Hello\nWorld");
    }

    #[tokio::test]
    async fn invalid_utf8_is_reported() {
        let err = PlainTextExtractor.extract(&[0xff, 0xfe, 0x00]).await.unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }
}
