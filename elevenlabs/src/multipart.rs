//! Multipart form bodies.
//!
//! Bodies are assembled as a plain list of parts so they can be inspected
//! before they are handed to reqwest.

use bytes::Bytes;
use reqwest::multipart;
use serde::Serialize;

use super::error::{Error, Result};

/// A single part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// A plain text field.
    Text { name: String, value: String },
    /// A file upload.
    File {
        name: String,
        file_name: String,
        data: Bytes,
    },
}

impl Part {
    /// Returns the form field name of this part.
    pub fn name(&self) -> &str {
        match self {
            Part::Text { name, .. } | Part::File { name, .. } => name,
        }
    }
}

/// A multipart form body under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    parts: Vec<Part>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text field.
    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.push(Part::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Appends a text field only when the value is set.
    pub fn optional<T: ToString>(&mut self, name: &str, value: Option<&T>) -> &mut Self {
        if let Some(value) = value {
            self.text(name, value.to_string());
        }
        self
    }

    /// Appends a JSON-encoded text field.
    pub fn json<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<&mut Self> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| Error::Encode(format!("{}: {}", name, e)))?;
        Ok(self.text(name, encoded))
    }

    /// Appends a file part.
    pub fn file(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> &mut Self {
        self.parts.push(Part::File {
            name: name.into(),
            file_name: file_name.into(),
            data: data.into(),
        });
        self
    }

    /// Returns all parts in insertion order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns the values of all text fields with the given name.
    pub fn fields(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the value of the first text field with the given name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields(name).into_iter().next()
    }

    /// Returns the file parts as `(field name, file name, data)`.
    pub fn files(&self) -> Vec<(&str, &str, &Bytes)> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::File {
                    name,
                    file_name,
                    data,
                } => Some((name.as_str(), file_name.as_str(), data)),
                _ => None,
            })
            .collect()
    }

    /// Converts the body into a reqwest form.
    pub fn into_form(self) -> multipart::Form {
        self.parts
            .into_iter()
            .fold(multipart::Form::new(), |form, part| match part {
                Part::Text { name, value } => form.text(name, value),
                Part::File {
                    name,
                    file_name,
                    data,
                } => form.part(
                    name,
                    multipart::Part::stream(data).file_name(file_name),
                ),
            })
    }
}
