//! Enhancement request gateway.
//!
//! Turns a selected file into a base64 payload, sends it to the image model
//! together with the restoration prompt and pulls the returned image back out
//! of the response.

pub mod gemini;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::{DEFAULT_RESULT_MEDIA_TYPE, RESTORATION_PROMPT};
use crate::error::GatewayError;

pub use gemini::{
    Candidate, Content, GeminiClient, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineData, Part,
};

/// Image bytes in their transport encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub media_type: String,
}

impl EncodedImage {
    pub fn from_bytes(bytes: &[u8], media_type: impl Into<String>) -> Self {
        Self {
            data: general_purpose::STANDARD.encode(bytes),
            media_type: media_type.into(),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, GatewayError> {
        general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| GatewayError::MalformedResponse(format!("invalid base64 payload: {e}")))
    }
}

/// Read everything from `reader` and base64-encode it.
pub async fn encode_file<R>(mut reader: R, media_type: &str) -> Result<EncodedImage, GatewayError>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    Ok(EncodedImage::from_bytes(&bytes, media_type))
}

/// Transport to a generative model.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GatewayError>;
}

#[derive(Clone)]
pub struct Gateway {
    model: Arc<dyn ImageModel>,
}

impl Gateway {
    pub fn new(model: Arc<dyn ImageModel>) -> Self {
        Self { model }
    }

    /// Send one restoration request for `image`.
    ///
    /// Single shot: there is no retry and no timeout beyond what the
    /// transport applies.
    pub async fn request_enhancement(
        &self,
        image: &EncodedImage,
    ) -> Result<EncodedImage, GatewayError> {
        let request = GenerateContentRequest::restoration(image, RESTORATION_PROMPT);

        tracing::info!(
            media_type = %image.media_type,
            payload_len = image.data.len(),
            "Sending enhancement request"
        );

        let response = self.model.generate_content(&request).await?;
        let enhanced = extract_image(response)?;

        // Reject undecodable payloads here so the result is always downloadable.
        enhanced.decode()?;

        tracing::info!(
            media_type = %enhanced.media_type,
            payload_len = enhanced.data.len(),
            "Received enhanced image"
        );
        Ok(enhanced)
    }
}

/// Find the first inline image in the first candidate.
pub fn extract_image(response: GenerateContentResponse) -> Result<EncodedImage, GatewayError> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    for part in parts {
        if let Some(text) = part.text.as_deref() {
            tracing::debug!(text, "Model returned text part");
        }
        if let Some(inline) = part.inline_data {
            if inline.data.is_empty() {
                continue;
            }
            let media_type = inline
                .mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RESULT_MEDIA_TYPE.to_string());
            return Ok(EncodedImage {
                data: inline.data,
                media_type,
            });
        }
    }

    Err(GatewayError::NoImagePart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "device unplugged",
            )))
        }
    }

    struct CannedModel {
        response: Mutex<Option<Result<GenerateContentResponse, GatewayError>>>,
        seen: Mutex<Vec<GenerateContentRequest>>,
    }

    impl CannedModel {
        fn new(response: Result<GenerateContentResponse, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(response)),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ImageModel for CannedModel {
        async fn generate_content(
            &self,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, GatewayError> {
            self.seen.lock().unwrap().push(request.clone());
            self.response
                .lock()
                .unwrap()
                .take()
                .expect("model called more than once")
        }
    }

    fn response_with(parts: Vec<Part>) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts,
                }),
            }],
        }
    }

    #[tokio::test]
    async fn test_encode_file_is_lossless() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
        let encoded = encode_file(&bytes[..], "image/jpeg").await.unwrap();
        assert_eq!(encoded.media_type, "image/jpeg");
        assert_eq!(encoded.decode().unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_encode_file_empty_input() {
        let encoded = encode_file(&b""[..], "image/png").await.unwrap();
        assert_eq!(encoded.data, "");
        assert!(encoded.decode().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_encode_file_propagates_read_error() {
        let err = encode_file(FailingReader, "image/png").await.unwrap_err();
        assert!(matches!(err, GatewayError::Read(_)));
    }

    #[test]
    fn test_extract_image_skips_text_parts() {
        let response = response_with(vec![
            Part::text("Here is your restored photo."),
            Part::inline("aGVsbG8=", Some("image/webp")),
        ]);
        let image = extract_image(response).unwrap();
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.media_type, "image/webp");
    }

    #[test]
    fn test_extract_image_defaults_media_type() {
        let response = response_with(vec![Part::inline("aGVsbG8=", None)]);
        let image = extract_image(response).unwrap();
        assert_eq!(image.media_type, DEFAULT_RESULT_MEDIA_TYPE);
    }

    #[test]
    fn test_extract_image_text_only_is_missing_image() {
        let response = response_with(vec![Part::text("I cannot edit this photo.")]);
        assert!(extract_image(response).unwrap_err().is_missing_image());
    }

    #[test]
    fn test_extract_image_no_candidates_is_missing_image() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert!(extract_image(response).unwrap_err().is_missing_image());
    }

    #[test]
    fn test_extract_image_only_scans_first_candidate() {
        let mut response = response_with(vec![Part::text("no image")]);
        response.candidates.push(Candidate {
            content: Some(Content {
                role: None,
                parts: vec![Part::inline("aGVsbG8=", Some("image/png"))],
            }),
        });
        assert!(extract_image(response).unwrap_err().is_missing_image());
    }

    #[tokio::test]
    async fn test_request_enhancement_sends_prompt_and_image() {
        let model = CannedModel::new(Ok(response_with(vec![
            Part::text("done"),
            Part::inline("iVBORw0KGgo=", Some("image/png")),
        ])));
        let gateway = Gateway::new(model.clone());
        let source = EncodedImage::from_bytes(b"\xFF\xD8\xFFjpeg", "image/jpeg");

        let result = gateway.request_enhancement(&source).await.unwrap();
        assert_eq!(result.media_type, "image/png");
        assert_eq!(result.data, "iVBORw0KGgo=");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let parts = &seen[0].contents[0].parts;
        let inline = parts[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.data, source.data);
        assert_eq!(inline.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(parts[1].text.as_deref(), Some(RESTORATION_PROMPT));
        assert_eq!(
            seen[0].generation_config.response_modalities,
            vec!["IMAGE".to_string(), "TEXT".to_string()]
        );
    }

    #[tokio::test]
    async fn test_request_enhancement_rejects_undecodable_payload() {
        let model = CannedModel::new(Ok(response_with(vec![Part::inline(
            "%%not base64%%",
            Some("image/png"),
        )])));
        let gateway = Gateway::new(model);
        let source = EncodedImage::from_bytes(b"x", "image/jpeg");

        let err = gateway.request_enhancement(&source).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_request_enhancement_passes_transport_errors_through() {
        let model = CannedModel::new(Err(GatewayError::Status {
            status: 500,
            body: "boom".to_string(),
        }));
        let gateway = Gateway::new(model);
        let source = EncodedImage::from_bytes(b"x", "image/jpeg");

        let err = gateway.request_enhancement(&source).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 500, .. }));
    }
}
