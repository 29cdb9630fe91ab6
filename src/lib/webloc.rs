use std::{fmt::Display, io::Write};

use plist::{Value, XmlWriteOptions};
use serde::Serialize;
use thiserror::Error;

const URL_KEY: &str = "URL";

/// The contents of a `.webloc` file: a single URL bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeblocDocument {
    #[serde(rename = "URL")]
    url: String,
}

/// The ways a document can fail to be a webloc.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed property list: {0}")]
    Plist(#[from] plist::Error),
    #[error("the property list root must be a dictionary, found {found}")]
    RootNotDict { found: &'static str },
    #[error("no `URL` key in the property list")]
    MissingUrl,
    #[error("the `URL` key must hold a string, found {found}")]
    UrlNotString { found: &'static str },
    #[error("`{}` cannot be stored in an XML property list", .character.escape_unicode())]
    UnrepresentableChar { character: char },
}

impl WeblocDocument {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parse a webloc from the bytes of an XML property list.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        decode(bytes)
    }

    /// Serialize to the bytes of an XML property list.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        encode(self)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), Error> {
        if let Some(character) = self.url.chars().find(|&c| !is_xml_char(c)) {
            return Err(Error::UnrepresentableChar { character });
        }
        let options = XmlWriteOptions::default().indent(b' ', 4);
        plist::to_writer_xml_with_options(writer, self, &options)?;
        Ok(())
    }
}

impl Display for WeblocDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

/// Extract the `URL` string from an XML property list.
///
/// The value is returned verbatim: it is not trimmed and not checked for
/// URL syntax. Keys other than `URL` are ignored whatever they hold.
pub fn decode(bytes: &[u8]) -> Result<WeblocDocument, Error> {
    let mut dict = match Value::from_reader_xml(bytes)? {
        Value::Dictionary(dict) => dict,
        other => {
            return Err(Error::RootNotDict {
                found: kind(&other),
            });
        }
    };
    match dict.remove(URL_KEY) {
        Some(Value::String(url)) => Ok(WeblocDocument::new(url)),
        Some(other) => Err(Error::UrlNotString {
            found: kind(&other),
        }),
        None => Err(Error::MissingUrl),
    }
}

/// Serialize a webloc as an XML property list, newline-terminated.
pub fn encode(doc: &WeblocDocument) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(doc.url.len() + 256);
    doc.write_to(&mut out)?;
    if out.last() != Some(&b'\n') {
        out.push(b'\n');
    }
    Ok(out)
}

/// The `Char` production of XML 1.0.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "an array",
        Value::Dictionary(_) => "a dictionary",
        Value::Boolean(_) => "a boolean",
        Value::Data(_) => "data",
        Value::Date(_) => "a date",
        Value::Real(_) => "a real",
        Value::Integer(_) => "an integer",
        Value::String(_) => "a string",
        _ => "an unsupported value",
    }
}
