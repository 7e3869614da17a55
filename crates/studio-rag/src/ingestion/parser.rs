//! Multi-format file parser

use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::FileType;

/// Parsed document with extracted text and metadata
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
    /// Content hash for deduplication
    pub content_hash: String,
    /// Document metadata (page counts, row counts, ...)
    pub metadata: HashMap<String, String>,
}

/// Multi-format file parser
pub struct FileParser;

impl FileParser {
    /// Parse a file based on its extension
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        let file_type = FileType::from_extension(&extension);

        if !file_type.is_supported() {
            return Err(Error::UnsupportedFileType(extension));
        }

        match file_type {
            FileType::Pdf => Self::parse_pdf(filename, data),
            FileType::Docx => Self::parse_docx(filename, data),
            FileType::Csv => Self::parse_csv(filename, data),
            FileType::Txt | FileType::Markdown => Self::parse_text(data, file_type),
            FileType::Unknown => Err(Error::UnsupportedFileType(extension)),
        }
    }

    /// Parse PDF document
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let content = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("pdf-extract failed for {}: {}, trying fallback", filename, e);
                Self::extract_pdf_text_fallback(filename, data)?
            }
        };

        let content = normalize_extracted_text(&content);
        if content.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "no text content could be extracted from PDF",
            ));
        }

        let mut metadata = HashMap::new();
        if let Ok(doc) = lopdf::Document::load_mem(data) {
            metadata.insert("pages".to_string(), doc.get_pages().len().to_string());
        }

        Ok(ParsedDocument {
            file_type: FileType::Pdf,
            content_hash: hash_content(&content),
            content,
            metadata,
        })
    }

    /// Fallback PDF text extraction reading content streams with lopdf
    fn extract_pdf_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("failed to load PDF: {}", e)))?;

        let mut all_text = String::new();
        for (page_num, _) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) if !text.trim().is_empty() => {
                    all_text.push_str(&text);
                    all_text.push('\n');
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("no extractable text on page {}: {}", page_num, e);
                }
            }
        }

        if all_text.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(all_text)
    }

    /// Parse DOCX document
    fn parse_docx(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        if content.trim().is_empty() {
            return Err(Error::file_parse(filename, "document contains no text"));
        }

        Ok(ParsedDocument {
            file_type: FileType::Docx,
            content_hash: hash_content(&content),
            content,
            metadata: HashMap::new(),
        })
    }

    /// Parse CSV file into header-labelled rows
    fn parse_csv(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let mut reader = csv::Reader::from_reader(data);
        let mut content = String::new();
        let mut rows = 0usize;

        let headers = reader
            .headers()
            .map_err(|e| Error::file_parse(filename, e.to_string()))?
            .clone();
        content.push_str(&headers.iter().collect::<Vec<_>>().join(" | "));
        content.push('\n');

        for record in reader.records() {
            let record = record.map_err(|e| Error::file_parse(filename, e.to_string()))?;
            content.push_str(&record.iter().collect::<Vec<_>>().join(" | "));
            content.push('\n');
            rows += 1;
        }

        let mut metadata = HashMap::new();
        metadata.insert("rows".to_string(), rows.to_string());

        Ok(ParsedDocument {
            file_type: FileType::Csv,
            content_hash: hash_content(&content),
            content,
            metadata,
        })
    }

    /// Parse plain text or markdown
    fn parse_text(data: &[u8], file_type: FileType) -> Result<ParsedDocument> {
        let content = String::from_utf8_lossy(data).to_string();

        Ok(ParsedDocument {
            file_type,
            content_hash: hash_content(&content),
            content,
            metadata: HashMap::new(),
        })
    }
}

/// Normalize text pulled out of PDFs: fold typographic punctuation to ASCII,
/// drop null bytes, and collapse blank lines
fn normalize_extracted_text(text: &str) -> String {
    let text = text
        .replace('\0', "")
        .replace(['\u{2010}', '\u{2011}', '\u{2013}'], "-")
        .replace('\u{2014}', "--")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{2022}', "* ")
        .replace('\u{2026}', "...")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl");

    text.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hash content for deduplication
pub(crate) fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
