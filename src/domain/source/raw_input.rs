use std::path::Path;

/// Where the bytes came from, as far as format resolution cares
#[derive(Debug, Clone, PartialEq)]
pub enum SourceHint {
    /// Uploaded file name
    FileName(String),
    /// Downloaded resource
    Url {
        url: String,
        content_type: Option<String>,
    },
    None,
}

/// Immutable input bytes plus their hint; consumed once by an ingestor.
#[derive(Debug, Clone)]
pub struct RawInput {
    pub bytes: Vec<u8>,
    pub hint: SourceHint,
}

impl RawInput {
    pub fn upload(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            hint: SourceHint::FileName(file_name.into()),
        }
    }

    pub fn download(url: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            hint: SourceHint::Url {
                url: url.into(),
                content_type,
            },
        }
    }

    /// Lowercased extension of the file name, or of the URL path
    /// (query string and fragment ignored).
    pub fn extension(&self) -> Option<String> {
        let path = match &self.hint {
            SourceHint::FileName(name) => name.clone(),
            SourceHint::Url { url, .. } => match url::Url::parse(url) {
                Ok(parsed) => parsed.path().to_string(),
                Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
            },
            SourceHint::None => return None,
        };
        Path::new(&path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    pub fn content_type(&self) -> Option<&str> {
        match &self.hint {
            SourceHint::Url { content_type, .. } => content_type.as_deref(),
            _ => None,
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(self.hint, SourceHint::FileName(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_file_name() {
        let input = RawInput::upload("Export.CSV", Vec::new());
        assert_eq!(input.extension().as_deref(), Some("csv"));
        assert!(input.is_upload());
    }

    #[test]
    fn test_extension_from_url_ignores_query() {
        let input = RawInput::download("https://host/data/feed.xml?token=abc", None, Vec::new());
        assert_eq!(input.extension().as_deref(), Some("xml"));

        let bare = RawInput::download("https://host/download", None, Vec::new());
        assert_eq!(bare.extension(), None);
    }
}
