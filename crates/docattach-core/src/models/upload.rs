//! Upload payload model

/// A local file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as it should appear on the remote service.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type reported by the picker, if any.
    pub content_type: Option<String>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// MIME type to send, guessed from the file name when none was reported.
    #[must_use]
    pub fn mime_type(&self) -> String {
        crate::blob::infer_mime_type(self.content_type.as_deref(), &self.name)
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UploadFile")
            .field("name", &self.name)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("content_type", &self.content_type)
            .finish()
    }
}
