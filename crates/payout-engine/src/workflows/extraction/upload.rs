use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Empty file")]
    Empty,
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
}

/// Rate-card image received from a caller.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Lower-cased extension, empty when the name has none.
    pub fn extension(&self) -> String {
        match self.filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => String::new(),
        }
    }

    fn declared_image_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .filter(|value| value.starts_with("image/"))
    }

    /// Accepts by extension or by declared content type; either is enough.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let extension = self.extension();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) && self.declared_image_type().is_none()
        {
            return Err(UploadError::UnsupportedType(self.filename.clone()));
        }

        Ok(())
    }

    /// MIME type used in the data URL sent to the model.
    pub fn mime_type(&self) -> String {
        if let Some(declared) = self.declared_image_type() {
            return declared.to_string();
        }

        mime_guess::from_path(&self.filename)
            .first()
            .filter(|guess| guess.type_() == mime::IMAGE)
            .map(|guess| guess.essence_str().to_string())
            .unwrap_or_else(|| "image/png".to_string())
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}
