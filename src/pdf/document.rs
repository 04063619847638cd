use crate::error::{Error, Result};
use crate::output::OutputFile;
use crate::page_range::PageRange;
use lopdf::{Document, Object};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    /// Parse the PDF at `path`.
    ///
    /// Anything lopdf cannot load, an encrypted document, or a document with
    /// no pages is reported as [`Error::SourceUnreadable`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let unreadable = |reason: String| Error::SourceUnreadable {
            path: path.to_path_buf(),
            reason,
        };

        let doc = Document::load(path).map_err(|e| unreadable(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(unreadable("document is password-protected".into()));
        }
        if doc.get_pages().is_empty() {
            return Err(unreadable("document has no pages".into()));
        }

        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object(*info_ref) {
                info.title = get_string_from_dict(dict, b"Title");
                info.author = get_string_from_dict(dict, b"Author");
                info.subject = get_string_from_dict(dict, b"Subject");
                info.creator = get_string_from_dict(dict, b"Creator");
            }
        }

        info.page_count = self.page_count();
        info.encrypted = self.doc.is_encrypted();
        info.file_size_mb = std::fs::metadata(&self.path)
            .map(|m| m.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);
        info
    }

    /// Extract a contiguous page range into a new standalone document
    pub fn extract_range(&self, range: PageRange) -> Document {
        let mut new_doc = self.doc.clone();

        let pages_to_delete: Vec<u32> = self
            .doc
            .get_pages()
            .into_keys()
            .filter(|num| *num < range.start || *num > range.end)
            .collect();

        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }
        new_doc.prune_objects();
        new_doc
    }

    /// Write every output chunk in order, stopping at the first failure.
    ///
    /// `on_written` runs after each file is on disk. Files written before a
    /// failure are left in place.
    pub fn split_into<F>(&self, outputs: &[OutputFile], mut on_written: F) -> Result<usize>
    where
        F: FnMut(&OutputFile),
    {
        for (completed, output) in outputs.iter().enumerate() {
            let mut chunk = self.extract_range(output.range);
            save(&mut chunk, &output.path).map_err(|reason| Error::WriteFailed {
                path: output.path.clone(),
                completed,
                reason,
            })?;
            on_written(output);
        }
        Ok(outputs.len())
    }
}

/// Save to a file, truncating anything already there
fn save(doc: &mut Document, path: &Path) -> std::result::Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer).map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub page_count: u32,
    pub encrypted: bool,
    pub file_size_mb: f64,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        // UTF-16 BE
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16(&u16_chars).ok()
    } else {
        // PDFDocEncoding, treated as Latin-1
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}
