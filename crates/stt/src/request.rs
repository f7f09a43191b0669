use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart},
};

use crate::error::SttError;

/// Name used when an upload arrives without a usable filename
pub const DEFAULT_UPLOAD_NAME: &str = "audio.wav";

/// One `file` part of a multipart form
#[derive(Debug, Clone)]
pub struct Upload {
    /// Final path component of the client-supplied name
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    pub fn new(filename: &str, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            filename: sanitize_filename(filename),
            content_type,
            data,
        }
    }
}

/// Reduce a client-supplied name to its last path component
pub fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(DEFAULT_UPLOAD_NAME)
        .to_string()
}

/// Extractor for multipart forms carrying one or more `file` parts
///
/// Other fields are ignored. At least one file is required. The body size
/// is bounded by the router's `DefaultBodyLimit`.
pub struct ExtractUploads(pub Vec<Upload>);

/// Body limit for audio and document uploads (64 MiB)
pub const UPLOAD_LIMIT_BYTES: usize = 64 << 20;

impl<S> FromRequest<S> for ExtractUploads
where
    S: Send + Sync,
{
    type Rejection = SttError;

    async fn from_request(request: http::Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = request
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("multipart/form-data") {
            return Err(SttError::InvalidRequest(
                "expected 'Content-Type: multipart/form-data'".to_string(),
            ));
        }

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| SttError::InvalidRequest(format!("failed to parse multipart form: {e}")))?;

        let mut uploads = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| SttError::InvalidRequest(format!("failed to read multipart form: {e}")))?
        {
            if field.name() != Some("file") {
                continue;
            }

            let filename = field.file_name().unwrap_or(DEFAULT_UPLOAD_NAME).to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| SttError::InvalidRequest(format!("failed to read file data: {e}")))?;

            uploads.push(Upload::new(&filename, content_type, data));
        }

        if uploads.is_empty() {
            return Err(SttError::InvalidRequest(
                "missing required 'file' field in multipart form".to_string(),
            ));
        }

        Ok(Self(uploads))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_lose_directories() {
        assert_eq!(sanitize_filename("greeting.mp3"), "greeting.mp3");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename(r"C:\Users\me\clip.wav"), "clip.wav");
    }

    #[test]
    fn empty_names_fall_back_to_default() {
        assert_eq!(sanitize_filename(""), DEFAULT_UPLOAD_NAME);
        assert_eq!(sanitize_filename("uploads/"), DEFAULT_UPLOAD_NAME);
        assert_eq!(sanitize_filename(".."), DEFAULT_UPLOAD_NAME);
    }

    fn multipart_request(body: &str) -> http::Request<Body> {
        http::Request::builder()
            .method("POST")
            .uri("/")
            .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=X")
            .body(Body::from(body.replace('\n', "\r\n")))
            .unwrap()
    }

    #[tokio::test]
    async fn collects_every_file_part() {
        let body = "--X
Content-Disposition: form-data; name=\"file\"; filename=\"dir/a.wav\"
Content-Type: audio/wav

AAAA
--X
Content-Disposition: form-data; name=\"note\"

ignored
--X
Content-Disposition: form-data; name=\"file\"; filename=\"b.mp3\"
Content-Type: audio/mpeg

BBBB
--X--
";

        let ExtractUploads(uploads) = ExtractUploads::from_request(multipart_request(body), &()).await.unwrap();

        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].filename, "a.wav");
        assert_eq!(uploads[0].content_type.as_deref(), Some("audio/wav"));
        assert_eq!(&uploads[0].data[..], b"AAAA");
        assert_eq!(uploads[1].filename, "b.mp3");
    }

    #[tokio::test]
    async fn form_without_file_is_rejected() {
        let body = "--X
Content-Disposition: form-data; name=\"note\"

hi
--X--
";

        let result = ExtractUploads::from_request(multipart_request(body), &()).await;

        assert!(matches!(result, Err(SttError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn non_multipart_is_rejected() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let result = ExtractUploads::from_request(request, &()).await;

        assert!(matches!(result, Err(SttError::InvalidRequest(_))));
    }
}
