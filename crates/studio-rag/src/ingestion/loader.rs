//! Content loaders for uploaded files and article URLs

use std::path::{Path, PathBuf};
use std::time::Duration;

use scraper::{Html, Selector};
use tempfile::TempDir;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Document, FileType, SourceKind};

use super::parser::{hash_content, FileParser};

/// Maximum number of sources accepted per process action
pub const MAX_SOURCES: usize = 3;

/// Result of a load: the documents plus any inputs skipped with a warning
#[derive(Debug)]
pub struct LoadOutcome {
    pub documents: Vec<Document>,
    pub skipped: Vec<String>,
}

/// Loader for uploaded files
///
/// Bytes are staged through a scoped temporary directory that is removed on
/// every exit path, including parse failures.
pub struct FileLoader {
    staging_root: Option<PathBuf>,
}

impl FileLoader {
    /// Create a loader staging under the system temp directory
    pub fn new() -> Self {
        Self { staging_root: None }
    }

    /// Create a loader staging under a specific directory
    pub fn with_staging_root(root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: Some(root.into()),
        }
    }

    /// Load up to [`MAX_SOURCES`] files into documents
    ///
    /// Unsupported extensions are skipped with a warning; a parse failure of
    /// a supported type aborts the load. Zero loadable documents is an
    /// input-validation error.
    pub fn load(&self, files: &[(String, Vec<u8>)]) -> Result<LoadOutcome> {
        let staging = self.create_staging()?;

        let mut documents = Vec::new();
        let mut skipped = Vec::new();

        for (name, bytes) in files.iter().take(MAX_SOURCES) {
            let extension = Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            let file_type = FileType::from_extension(&extension);

            if !file_type.is_supported() {
                tracing::warn!("skipping unsupported file type: {}", name);
                skipped.push(name.clone());
                continue;
            }

            let staged_path = staging
                .path()
                .join(format!("{}.{}", Uuid::new_v4(), extension));
            std::fs::write(&staged_path, bytes)?;

            let data = std::fs::read(&staged_path)?;
            let parsed = FileParser::parse(name, &data)?;

            tracing::info!(
                "loaded {} ({} chars of {})",
                name,
                parsed.content.len(),
                parsed.file_type.display_name()
            );

            let mut document = Document::new(
                name.clone(),
                SourceKind::File(file_type),
                parsed.content,
                parsed.content_hash,
            );
            document.metadata = parsed.metadata;
            documents.push(document);
        }

        // Staging directory is dropped here on all paths, removing the
        // staged copies

        if documents.is_empty() {
            return Err(Error::invalid_input(
                "no loadable documents among the uploaded files",
            ));
        }

        Ok(LoadOutcome { documents, skipped })
    }

    fn create_staging(&self) -> Result<TempDir> {
        let builder_result = match &self.staging_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                tempfile::Builder::new()
                    .prefix("studio-rag-staging-")
                    .tempdir_in(root)
            }
            None => tempfile::Builder::new()
                .prefix("studio-rag-staging-")
                .tempdir(),
        };
        builder_result.map_err(Error::Io)
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Loader for article URLs
pub struct UrlLoader {
    client: reqwest::Client,
}

impl UrlLoader {
    /// Create a loader with the given request timeout
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::Http)?;
        Ok(Self { client })
    }

    /// Keep only entries with an http(s) scheme, capped at [`MAX_SOURCES`]
    ///
    /// Runs before any network call; zero valid URLs is an input-validation
    /// error.
    pub fn validate(urls: &[String]) -> Result<Vec<String>> {
        let valid: Vec<String> = urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
            .take(MAX_SOURCES)
            .collect();

        if valid.is_empty() {
            return Err(Error::invalid_input(
                "at least one URL starting with http:// or https:// is required",
            ));
        }

        Ok(valid)
    }

    /// Fetch each valid URL and extract its article text
    pub async fn load(&self, urls: &[String]) -> Result<LoadOutcome> {
        let valid = Self::validate(urls)?;

        let mut documents = Vec::new();
        let mut skipped = Vec::new();

        for url in valid {
            tracing::info!("fetching {}", url);
            let response = self.client.get(&url).send().await?.error_for_status()?;
            let html = response.text().await?;
            let text = extract_article_text(&html);

            if text.trim().is_empty() {
                tracing::warn!("no article text extracted from {}", url);
                skipped.push(url);
                continue;
            }

            let content_hash = hash_content(&text);
            documents.push(Document::new(url, SourceKind::Url, text, content_hash));
        }

        if documents.is_empty() {
            return Err(Error::invalid_input(
                "no article text could be extracted from the given URLs",
            ));
        }

        Ok(LoadOutcome { documents, skipped })
    }
}

/// Pull readable article text out of an HTML page
///
/// Prefers structural text elements; falls back to the whole body when a
/// page uses none of them.
fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let text_selector =
        Selector::parse("p, h1, h2, h3, h4, li, blockquote").expect("static selector");
    let mut blocks = Vec::new();
    for element in document.select(&text_selector) {
        let block = element.text().collect::<Vec<_>>().join(" ");
        let block = block.split_whitespace().collect::<Vec<_>>().join(" ");
        if !block.is_empty() {
            blocks.push(block);
        }
    }

    if !blocks.is_empty() {
        return blocks.join("\n\n");
    }

    let body_selector = Selector::parse("body").expect("static selector");
    document
        .select(&body_selector)
        .next()
        .map(|body| {
            body.text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}
