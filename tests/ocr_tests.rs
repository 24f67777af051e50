#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use gastos_bot::extractor;
    use gastos_bot::ocr::{clean_ocr_text, TextExtractor};

    /// Stub OCR returning canned text, standing in for the remote endpoint.
    struct FixedText(&'static str);

    #[async_trait]
    impl TextExtractor for FixedText {
        async fn extract_text(&self, _image: &[u8]) -> Result<String> {
            Ok(clean_ocr_text(self.0))
        }
    }

    #[test]
    fn test_clean_ocr_text_strips_noise() {
        let raw = "  COTO supermercado  \n\n   $500  \n";
        assert_eq!(clean_ocr_text(raw), "COTO supermercado\n$500");
    }

    #[test]
    fn test_clean_ocr_text_empty_input() {
        assert_eq!(clean_ocr_text("   \n \n"), "");
    }

    #[tokio::test]
    async fn test_photo_pipeline_with_stubbed_ocr() {
        // Photo path minus Telegram: bytes -> OCR text -> expense record.
        let ocr: Box<dyn TextExtractor> = Box::new(FixedText(
            "TICKET 2025-03-09\nCOTO supermercado\nTOTAL $1,234.56",
        ));

        let text = ocr.extract_text(b"fake image bytes").await.unwrap();
        let record = extractor::extract(&text);

        assert_eq!(record.date, "2025-03-09");
        assert_eq!(record.category, "supermercado");
        assert_eq!(record.description, text);
    }
}
