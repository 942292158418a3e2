use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::{Error, FileSplit, Result};

/// Wire shape accepted on decode. Unknown keys are ignored so older readers
/// tolerate newer producers.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename = "FileSplit", rename_all = "camelCase")]
pub(crate) struct FileSplitPayload {
    path: String,
    #[schemars(range(min = 0))]
    start: i64,
    #[schemars(range(min = 0))]
    length: i64,
    #[schemars(range(min = 0))]
    file_size: i64,
    #[schemars(range(min = 0))]
    file_modified_time: i64,
    /// Base64 (standard alphabet) encoded opaque payload
    #[serde(default)]
    extra_file_info: Option<String>,
    #[serde(default)]
    custom_split_info: Option<BTreeMap<String, String>>,
}

impl TryFrom<FileSplitPayload> for FileSplit {
    type Error = Error;

    fn try_from(payload: FileSplitPayload) -> Result<Self> {
        let extra_file_info = payload
            .extra_file_info
            .map(|encoded| STANDARD.decode(encoded).map(Bytes::from))
            .transpose()
            .map_err(Error::MalformedExtraFileInfo)?;

        FileSplit::new(
            payload.path,
            payload.start,
            payload.length,
            payload.file_size,
            payload.file_modified_time,
            extra_file_info,
            payload.custom_split_info.unwrap_or_default(),
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileSplitView<'a> {
    path: &'a str,
    start: i64,
    length: i64,
    file_size: i64,
    file_modified_time: i64,
    extra_file_info: Option<String>,
    custom_split_info: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a FileSplit> for FileSplitView<'a> {
    fn from(split: &'a FileSplit) -> Self {
        Self {
            path: split.path(),
            start: split.start(),
            length: split.length(),
            file_size: split.file_size(),
            file_modified_time: split.file_modified_time(),
            extra_file_info: split.extra_file_info().map(|bytes| STANDARD.encode(bytes)),
            custom_split_info: split.custom_split_info(),
        }
    }
}

impl Serialize for FileSplit {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        FileSplitView::from(self).serialize(serializer)
    }
}

impl FileSplit {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::MalformedPayload)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(Error::MalformedPayload)
    }

    /// Decodes a split from its JSON wire form, re-running construction
    /// validation.
    ///
    /// # Errors
    /// - `MalformedPayload` if a required field is missing or mistyped
    /// - `MalformedExtraFileInfo` if `extraFileInfo` is not valid base64
    /// - `InvalidArgument` if a numeric field is negative
    pub fn from_json(json: &str) -> Result<Self> {
        let payload = serde_json::from_str::<FileSplitPayload>(json).map_err(|error| {
            debug!(error = %error, "Malformed file split payload");
            Error::MalformedPayload(error)
        })?;
        Self::from_payload(payload)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let payload = serde_json::from_value::<FileSplitPayload>(value).map_err(|error| {
            debug!(error = %error, "Malformed file split payload");
            Error::MalformedPayload(error)
        })?;
        Self::from_payload(payload)
    }

    fn from_payload(payload: FileSplitPayload) -> Result<Self> {
        let path = payload.path.clone();
        Self::try_from(payload).inspect_err(|error| {
            debug!(path = %path, error = %error, "Rejected file split payload");
        })
    }

    /// JSON schema of the wire form.
    pub fn json_schema() -> RootSchema {
        schemars::schema_for!(FileSplitPayload)
    }
}
