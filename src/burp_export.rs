//! Reading proxy history exports: a root element holding one `item` per
//! captured request/response pair.

use crate::encoding::{decode_standard_base64, latin1_decode, latin1_encode, to_standard_base64};
use crate::errors::ExportError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Items {
    #[serde(rename = "item", default)]
    items: Vec<CapturedItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapturedItem {
    pub method: String,
    #[serde(default)]
    pub path: String,
    pub url: String,
    pub request: EncodedBlob,
    #[serde(default)]
    pub response: Option<EncodedBlob>,
}

impl CapturedItem {
    /// Raw bytes and text of the captured request. An element without any
    /// content is an error.
    pub fn decode_request(&self) -> Result<(Vec<u8>, String), ExportError> {
        if self.request.text.is_empty() {
            return Err(ExportError::EmptyRequest(self.url.clone()));
        }
        return self.request.decode();
    }
}

/// Element text that is base64 when its `base64` attribute says `true`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodedBlob {
    #[serde(rename = "@base64", default)]
    base64: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
}

impl EncodedBlob {
    pub fn new(text: &str, base64: bool) -> EncodedBlob {
        return EncodedBlob {
            base64: Some(base64.to_string()),
            text: text.to_string(),
        };
    }

    pub fn is_base64(&self) -> bool {
        return self.base64.as_deref() == Some("true");
    }

    /// Element text with XML line-break normalization applied (`\r\n` and a
    /// lone `\r` both read as `\n`), trimmed.
    pub fn text(&self) -> String {
        return self.text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string();
    }

    /// Raw bytes and their latin-1 text form.
    pub fn decode(&self) -> Result<(Vec<u8>, String), ExportError> {
        if self.is_base64() {
            let bytes = decode_standard_base64(&self.text())?;
            let text = latin1_decode(&bytes);
            return Ok((bytes, text));
        }
        let text = self.text();
        return Ok((latin1_encode(&text)?, text));
    }

    /// Standard base64 of the content; empty when there is no content.
    pub fn to_base64(&self) -> Result<String, ExportError> {
        let text = self.text();
        if text.is_empty() {
            return Ok(String::new());
        }
        if self.is_base64() {
            return Ok(text);
        }
        return Ok(to_standard_base64(&latin1_encode(&text)?));
    }
}

pub fn parse_export(xml: &str) -> Result<Vec<CapturedItem>, ExportError> {
    let root: Items = quick_xml::de::from_str(xml)?;
    return Ok(root.items);
}

pub fn read_export(path: &Path) -> Result<Vec<CapturedItem>> {
    let xml = fs::read_to_string(path).with_context(|| format!("couldn't read {}", path.display()))?;
    return parse_export(&xml).with_context(|| format!("while parsing export {}", path.display()));
}
