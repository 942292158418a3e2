use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use derive_setters::Setters;
use serde::Deserialize;

use crate::{Error, Result};

/// A contiguous byte range of one file, together with the file metadata that
/// was observed when the range was planned.
///
/// The descriptor is a claim, not a verified fact: it does not check that the
/// file exists or that `start + length` fits inside `file_size`. Readers are
/// expected to reconcile it against the live file (see
/// [`FileSplit::reconcile`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "crate::wire::FileSplitPayload")]
pub struct FileSplit {
    path: String,
    start: i64,
    length: i64,
    file_size: i64,
    file_modified_time: i64,
    extra_file_info: Option<Bytes>,
    custom_split_info: BTreeMap<String, String>,
}

impl FileSplit {
    /// Creates a validated split descriptor.
    ///
    /// `custom_split_info` is collected into a map owned by the descriptor, so
    /// later changes to the caller's source collection are not observed.
    ///
    /// # Errors
    /// - `InvalidArgument` if `start`, `length`, `file_size` or
    ///   `file_modified_time` is negative
    pub fn new<K, V>(
        path: impl Into<String>,
        start: i64,
        length: i64,
        file_size: i64,
        file_modified_time: i64,
        extra_file_info: Option<Bytes>,
        custom_split_info: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        check_non_negative("start", start)?;
        check_non_negative("length", length)?;
        check_non_negative("fileSize", file_size)?;
        check_non_negative("fileModifiedTime", file_modified_time)?;

        Ok(Self {
            path: path.into(),
            start,
            length,
            file_size,
            file_modified_time,
            extra_file_info,
            custom_split_info: custom_split_info
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        })
    }

    pub fn builder() -> FileSplitBuilder {
        FileSplitBuilder::default()
    }

    /// Copies this descriptor into a builder, for deriving a modified split.
    pub fn to_builder(&self) -> FileSplitBuilder {
        FileSplitBuilder {
            path: Some(self.path.clone()),
            start: self.start,
            length: self.length,
            file_size: self.file_size,
            file_modified_time: self.file_modified_time,
            extra_file_info: self.extra_file_info.clone(),
            custom_split_info: self.custom_split_info.clone(),
        }
    }

    /// Absolute path or URI of the file containing the split.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Offset of the first byte of the split.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Number of bytes in the split.
    pub fn length(&self) -> i64 {
        self.length
    }

    /// Size of the whole file when the split was planned.
    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    /// Modification time of the file when the split was planned, in the
    /// producer's epoch unit.
    pub fn file_modified_time(&self) -> i64 {
        self.file_modified_time
    }

    /// Producer-defined opaque payload. `None` and an empty payload are
    /// distinct.
    pub fn extra_file_info(&self) -> Option<&Bytes> {
        self.extra_file_info.as_ref()
    }

    pub fn custom_split_info(&self) -> &BTreeMap<String, String> {
        &self.custom_split_info
    }

    /// Offset one past the last byte of the split.
    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns true if the range lies inside the recorded `file_size`.
    pub fn is_within_file(&self) -> bool {
        self.end() <= self.file_size
    }
}

fn check_non_negative(field: &'static str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(Error::InvalidArgument { field, value });
    }
    Ok(())
}

impl fmt::Display for FileSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.path, self.start, self.end())
    }
}

/// Incrementally assembles a [`FileSplit`]. Unset numeric fields default to
/// zero, an unset payload to `None` and unset annotations to an empty map.
#[derive(Debug, Clone, Default, Setters)]
#[setters(into, strip_option)]
pub struct FileSplitBuilder {
    path: Option<String>,
    start: i64,
    length: i64,
    file_size: i64,
    file_modified_time: i64,
    extra_file_info: Option<Bytes>,
    custom_split_info: BTreeMap<String, String>,
}

impl FileSplitBuilder {
    /// Adds a single annotation, replacing any previous value for `key`.
    pub fn custom_split_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_split_info.insert(key.into(), value.into());
        self
    }

    /// # Errors
    /// - `NullReference` if no path was set
    /// - `InvalidArgument` if any numeric field is negative
    pub fn build(self) -> Result<FileSplit> {
        let path = self.path.ok_or(Error::NullReference { field: "path" })?;
        FileSplit::new(
            path,
            self.start,
            self.length,
            self.file_size,
            self.file_modified_time,
            self.extra_file_info,
            self.custom_split_info,
        )
    }
}
