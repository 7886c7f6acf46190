//! Binary attachments (resources) carried by a note.

use crate::domain::Guid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A binary payload attached to a note.
///
/// Attachments are fetched together with their parent note. The payload is
/// only present when the note was fetched with resource data; identity and
/// MIME type are always present.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    guid: Guid,
    mime: String,
    #[serde(default, with = "payload", skip_serializing_if = "Option::is_none")]
    data: Option<Vec<u8>>,
}

impl Attachment {
    /// Creates an attachment with its payload.
    pub fn new(guid: Guid, mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            guid,
            mime: mime.into(),
            data: Some(data.into()),
        }
    }

    /// Creates an attachment carrying metadata only.
    pub fn metadata_only(guid: Guid, mime: impl Into<String>) -> Self {
        Self {
            guid,
            mime: mime.into(),
            data: None,
        }
    }

    /// Returns the attachment's identity, unique within its note.
    pub fn guid(&self) -> &Guid {
        &self.guid
    }

    /// Returns the declared MIME type.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Returns the raw payload, if it was fetched.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Drops the payload, keeping metadata.
    pub fn without_data(mut self) -> Self {
        self.data = None;
        self
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("guid", &self.guid)
            .field("mime", &self.mime)
            .field("data_len", &self.data.as_ref().map(Vec::len))
            .finish()
    }
}

/// Base64 encoding of payloads in JSON documents.
mod payload {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match data {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| {
                STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
