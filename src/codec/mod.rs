//! Multi-format note codec
//!
//! Three symmetric encode/decode pairs over a note's (title, content) pair,
//! selected by a closed format enum. The JSON property names (`Title`,
//! `Content`) and the XML root/element names (`NoteDTO`, `Title`, `Content`)
//! are the compatibility surface with previously exported files and must not
//! change.
//!
//! The txt format is lossy by design: content is stored after the title line
//! and decoded by concatenating all remaining lines with no delimiter, so
//! embedded newlines in content do not survive a round trip.

use serde::{Deserialize, Serialize};

pub const TXT_EXTENSION: &str = "txt";
pub const JSON_EXTENSION: &str = "json";
pub const XML_EXTENSION: &str = "xml";

/// The wire formats a note can be exported to / imported from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteFormat {
    Txt,
    Json,
    Xml,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unsupported format: {0}")]
    Unsupported(String),
    #[error("malformed {format} payload: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },
}

impl NoteFormat {
    /// Parse the `format` query tag; unknown tags are rejected before any
    /// codec is invoked
    pub fn from_tag(tag: &str) -> Result<Self, FormatError> {
        match tag {
            TXT_EXTENSION => Ok(NoteFormat::Txt),
            JSON_EXTENSION => Ok(NoteFormat::Json),
            XML_EXTENSION => Ok(NoteFormat::Xml),
            other => Err(FormatError::Unsupported(other.to_string())),
        }
    }

    /// Parse a filename extension, case-insensitively
    pub fn from_extension(extension: &str) -> Result<Self, FormatError> {
        Self::from_tag(&extension.to_lowercase())
    }

    pub fn extension(&self) -> &'static str {
        match self {
            NoteFormat::Txt => TXT_EXTENSION,
            NoteFormat::Json => JSON_EXTENSION,
            NoteFormat::Xml => XML_EXTENSION,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            NoteFormat::Txt => "text/plain",
            NoteFormat::Json => "application/json",
            NoteFormat::Xml => "application/xml",
        }
    }
}

/// The (title, content) pair as it appears on the wire
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDocument {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Content", default)]
    pub content: String,
}

impl NoteDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Encode a note document into the given format's byte representation
pub fn encode(format: NoteFormat, doc: &NoteDocument) -> Result<Vec<u8>, FormatError> {
    match format {
        NoteFormat::Txt => Ok(format!("{}\n{}", doc.title, doc.content).into_bytes()),
        NoteFormat::Json => serde_json::to_vec(doc).map_err(|e| FormatError::Malformed {
            format: JSON_EXTENSION,
            reason: e.to_string(),
        }),
        NoteFormat::Xml => quick_xml::se::to_string_with_root("NoteDTO", doc)
            .map(String::into_bytes)
            .map_err(|e| FormatError::Malformed {
                format: XML_EXTENSION,
                reason: e.to_string(),
            }),
    }
}

/// Decode bytes in the given format back into a note document
pub fn decode(format: NoteFormat, bytes: &[u8]) -> Result<NoteDocument, FormatError> {
    match format {
        NoteFormat::Txt => decode_txt(bytes),
        NoteFormat::Json => {
            serde_json::from_slice(bytes).map_err(|e| FormatError::Malformed {
                format: JSON_EXTENSION,
                reason: e.to_string(),
            })
        }
        NoteFormat::Xml => {
            let text = std::str::from_utf8(bytes).map_err(|e| FormatError::Malformed {
                format: XML_EXTENSION,
                reason: e.to_string(),
            })?;
            quick_xml::de::from_str(text).map_err(|e| FormatError::Malformed {
                format: XML_EXTENSION,
                reason: e.to_string(),
            })
        }
    }
}

/// First line (trimmed) becomes the title; every following line is
/// concatenated with no delimiter and trimmed to form the content.
fn decode_txt(bytes: &[u8]) -> Result<NoteDocument, FormatError> {
    let text = std::str::from_utf8(bytes).map_err(|e| FormatError::Malformed {
        format: TXT_EXTENSION,
        reason: e.to_string(),
    })?;

    let mut lines = text.lines();
    let title = match lines.next() {
        Some(line) => line.trim().to_string(),
        None => {
            return Err(FormatError::Malformed {
                format: TXT_EXTENSION,
                reason: "empty file".to_string(),
            })
        }
    };
    let content = lines.collect::<String>().trim().to_string();

    Ok(NoteDocument { title, content })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!(
            NoteFormat::from_tag("pdf"),
            Err(FormatError::Unsupported("pdf".to_string()))
        );
        assert_eq!(
            NoteFormat::from_tag(""),
            Err(FormatError::Unsupported(String::new()))
        );
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(NoteFormat::from_extension("TXT"), Ok(NoteFormat::Txt));
        assert_eq!(NoteFormat::from_extension("Json"), Ok(NoteFormat::Json));
        assert_eq!(NoteFormat::from_extension("XML"), Ok(NoteFormat::Xml));
        assert!(NoteFormat::from_extension("docx").is_err());
    }

    #[test]
    fn test_txt_encode() {
        let bytes = encode(NoteFormat::Txt, &NoteDocument::new("T", "C")).unwrap();
        assert_eq!(bytes, b"T\nC");
    }

    #[test]
    fn test_txt_round_trip_is_lossy_on_newlines() {
        let doc = NoteDocument::new("Shopping", "milk\neggs\nbread");
        let bytes = encode(NoteFormat::Txt, &doc).unwrap();
        let decoded = decode(NoteFormat::Txt, &bytes).unwrap();

        // The title survives; internal newlines in content collapse.
        assert_eq!(decoded.title, "Shopping");
        assert_eq!(decoded.content, "milkeggsbread");
    }

    #[test]
    fn test_txt_decode_trims_title() {
        let decoded = decode(NoteFormat::Txt, b"  Title  \nbody").unwrap();
        assert_eq!(decoded.title, "Title");
        assert_eq!(decoded.content, "body");
    }

    #[test]
    fn test_txt_empty_input_is_malformed() {
        assert!(decode(NoteFormat::Txt, b"").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let doc = NoteDocument::new("X", "Y");
        let bytes = encode(NoteFormat::Json, &doc).unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&bytes).unwrap(),
            serde_json::json!({"Title": "X", "Content": "Y"})
        );
        assert_eq!(decode(NoteFormat::Json, &bytes).unwrap(), doc);
    }

    #[test]
    fn test_json_unknown_and_missing_properties() {
        let decoded =
            decode(NoteFormat::Json, br#"{"Title":"X","Color":"blue"}"#).unwrap();
        assert_eq!(decoded.title, "X");
        assert_eq!(decoded.content, "");
    }

    #[test]
    fn test_json_malformed_rejected() {
        assert!(decode(NoteFormat::Json, b"{not json").is_err());
    }

    #[test]
    fn test_xml_round_trip() {
        let doc = NoteDocument::new("A <tricky> title", "body & soul");
        let bytes = encode(NoteFormat::Xml, &doc).unwrap();
        assert_eq!(decode(NoteFormat::Xml, &bytes).unwrap(), doc);
    }

    #[test]
    fn test_xml_element_names_are_stable() {
        let bytes = encode(NoteFormat::Xml, &NoteDocument::new("T", "C")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("<NoteDTO>"));
        assert!(text.contains("<Title>T</Title>"));
        assert!(text.contains("<Content>C</Content>"));
    }

    #[test]
    fn test_xml_decodes_exported_file_shape() {
        let xml = "<NoteDTO><Title>X</Title><Content>Y</Content></NoteDTO>";
        let decoded = decode(NoteFormat::Xml, xml.as_bytes()).unwrap();
        assert_eq!(decoded, NoteDocument::new("X", "Y"));
    }

    #[test]
    fn test_xml_malformed_rejected() {
        assert!(decode(NoteFormat::Xml, b"<NoteDTO><Title>").is_err());
        assert!(decode(NoteFormat::Xml, &[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(NoteFormat::Txt.mime_type(), "text/plain");
        assert_eq!(NoteFormat::Json.mime_type(), "application/json");
        assert_eq!(NoteFormat::Xml.mime_type(), "application/xml");
    }
}
