use crate::errors::ConcatError;
use crate::utils::read_file_content;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Xml,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub index: usize,
    pub source: String,
    pub content: String,
}

/// The bundle handed to the output sink: root file first, then its
/// dependencies in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub documents: Vec<DocumentEntry>,
}

/// Reads every file in `paths` and numbers the entries from 1.
pub async fn assemble(paths: &[PathBuf]) -> Result<OutputDocument, ConcatError> {
    let mut documents = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        debug!("Assembling file: {}", path.display());
        let content = read_file_content(path).await?;
        trace!("Read {} bytes from {}", content.len(), path.display());
        documents.push(DocumentEntry {
            index: i + 1,
            source: path.display().to_string(),
            content,
        });
    }
    Ok(OutputDocument { documents })
}

impl OutputDocument {
    pub fn render(&self, format: OutputFormat) -> Result<String, ConcatError> {
        match format {
            OutputFormat::Xml => self.to_xml(),
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConcatError::SerializationError(e.to_string())),
        }
    }

    /// Tab-indented XML. Whitespace is only added between elements, never
    /// inside `<source>` or `<document_content>`.
    ///
    /// The declaration says XML 1.1 only when some file holds a C0 control
    /// character (form feed, vertical tab, ...) that XML 1.0 cannot carry even
    /// as a character reference.
    pub fn to_xml(&self) -> Result<String, ConcatError> {
        let mut version = "1.0";
        for entry in &self.documents {
            for text in [&entry.source, &entry.content] {
                if let Some(c) = text.chars().find(|c| unrepresentable_in_xml(*c)) {
                    return Err(ConcatError::SerializationError(format!(
                        "{} contains U+{:04X}, which XML cannot represent; use --format json",
                        entry.source, c as u32
                    )));
                }
                if text.chars().any(requires_xml_11) {
                    version = "1.1";
                }
            }
        }

        let mut xml = format!("<?xml version=\"{}\" encoding=\"UTF-8\"?>\n<documents>\n", version);
        for entry in &self.documents {
            xml.push_str(&format!("\t<document index=\"{}\">\n", entry.index));
            xml.push_str(&format!("\t\t<source>{}</source>\n", escape_xml(&entry.source)));
            xml.push_str("\t\t<document_content>");
            xml.push_str(&escape_xml(&entry.content));
            xml.push_str("</document_content>\n");
            xml.push_str("\t</document>\n");
        }
        xml.push_str("</documents>\n");
        Ok(xml)
    }
}

fn unrepresentable_in_xml(c: char) -> bool {
    matches!(c, '\0' | '\u{FFFE}' | '\u{FFFF}')
}

fn requires_xml_11(c: char) -> bool {
    c < ' ' && !matches!(c, '\t' | '\n' | '\r')
}

/// Escapes markup characters. Carriage returns, other control characters
/// and U+2028 become character references so line-ending normalization
/// (1.0 or 1.1 rules) cannot alter them.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\t' | '\n' => escaped.push(c),
            c if c.is_control() || c == '\u{2028}' => {
                escaped.push_str(&format!("&#{};", c as u32))
            }
            c => escaped.push(c),
        }
    }
    escaped
}
