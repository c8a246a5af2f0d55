use chrono::Utc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::common::{ErrorKind, Result};

// Entry is one record of the storage log.
// set appends an active entry, remove appends a deleted one (tombstone).
#[derive(PartialEq, Debug)]
pub(super) struct Entry {
    header: Header,
    body: Body,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Invalid = 0,
    Active = 1,
    Deleted = 2,
}

#[derive(PartialEq, Debug)]
struct Header {
    key_bytes: usize,
    value_bytes: usize,
    // milliseconds since January 1,1970 UTC
    timestamp_ms: i64,
    state: State,
    crc_checksum: u32,
}

#[derive(PartialEq, Debug)]
struct Body {
    key: String,
    value: Option<String>,
}

/// Decoded view of a log entry, deleted ones included.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDump {
    pub key: String,
    pub value: Option<String>,
    pub timestamp_ms: i64,
    pub is_deleted: bool,
}

impl Entry {
    const HEADER_BYTES: usize = 8 // key_bytes
        + 8 // value_bytes
        + 8 // timestamp_ms
        + 1 // state
        + 4 // crc_checksum
    ;

    // Upper bound for key and value. Larger lengths mean a corrupted header.
    const MAX_FIELD_BYTES: usize = 1024 * 1024;

    // Fails when key or value exceed what decode_from accepts.
    pub(super) fn active(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let body = Body {
            key: key.into(),
            value: Some(value.into()),
        };
        Entry::check_len(&body)?;
        Ok(Entry::with_body(body, State::Active))
    }

    pub(super) fn deleted(key: impl Into<String>) -> Self {
        let body = Body {
            key: key.into(),
            value: None,
        };
        Entry::with_body(body, State::Deleted)
    }

    fn check_len(body: &Body) -> Result<()> {
        let key_bytes = body.key.len();
        let value_bytes = body.value.as_ref().map(String::len).unwrap_or(0);
        if key_bytes > Entry::MAX_FIELD_BYTES || value_bytes > Entry::MAX_FIELD_BYTES {
            return Err(ErrorKind::EntryTooLarge {
                key_bytes,
                value_bytes,
            }
            .into());
        }
        Ok(())
    }

    fn with_body(body: Body, state: State) -> Self {
        let header = Header {
            key_bytes: body.key.len(),
            value_bytes: body.value.as_ref().map(String::len).unwrap_or(0),
            timestamp_ms: Utc::now().timestamp_millis(),
            state,
            crc_checksum: 0,
        };

        let mut entry = Self { header, body };
        entry.header.crc_checksum = entry.calc_crc_checksum();
        entry
    }

    // Write binary expression to writer.
    // return written bytes.
    // flush is left to the caller.
    pub(super) async fn encode_to<W: AsyncWriteExt + Unpin>(&self, mut writer: W) -> Result<usize> {
        debug_assert!(self.assert());

        writer.write_u64(self.header.key_bytes as u64).await?;
        writer.write_u64(self.header.value_bytes as u64).await?;
        writer.write_i64(self.header.timestamp_ms).await?;
        writer.write_u8(self.header.state as u8).await?;
        writer.write_u32(self.header.crc_checksum).await?;

        writer.write_all(self.body.key.as_bytes()).await?;
        if let Some(value) = &self.body.value {
            writer.write_all(value.as_bytes()).await?;
        }

        Ok(self.encoded_len())
    }

    // Construct Entry from reader.
    // Entries whose checksum does not match are rejected.
    pub(super) async fn decode_from<R: AsyncReadExt + Unpin>(
        mut reader: R,
    ) -> Result<(usize, Self)> {
        // calling order is important.
        let key_bytes = reader.read_u64().await? as usize;
        let value_bytes = reader.read_u64().await? as usize;
        let timestamp_ms = reader.read_i64().await?;
        let state = State::from(reader.read_u8().await?);
        let crc_checksum = reader.read_u32().await?;

        if key_bytes > Entry::MAX_FIELD_BYTES || value_bytes > Entry::MAX_FIELD_BYTES {
            return Err(ErrorKind::EntryDecode {
                description: format!(
                    "entry length out of range. key_bytes: {} value_bytes: {}",
                    key_bytes, value_bytes
                ),
            }
            .into());
        }

        let header = Header {
            key_bytes,
            value_bytes,
            timestamp_ms,
            state,
            crc_checksum,
        };

        let mut buf = Vec::with_capacity(header.body_len());
        let n = (&mut reader)
            .take(header.body_len() as u64)
            .read_to_end(&mut buf)
            .await?;
        if n < header.body_len() {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }

        let value = buf.split_off(header.key_bytes);
        let key = String::from_utf8(buf).map_err(|e| ErrorKind::EntryDecode {
            description: e.to_string(),
        })?;
        let value = if state == State::Active {
            Some(String::from_utf8(value).map_err(|e| ErrorKind::EntryDecode {
                description: e.to_string(),
            })?)
        } else {
            None
        };

        let entry = Self {
            header,
            body: Body { key, value },
        };

        if entry.header.state == State::Invalid {
            return Err(ErrorKind::EntryDecode {
                description: format!("invalid entry state. key: {}", entry.body.key),
            }
            .into());
        }
        if !entry.assert() {
            return Err(ErrorKind::ChecksumMismatch {
                key: entry.body.key,
            }
            .into());
        }

        Ok((entry.encoded_len(), entry))
    }

    pub(super) fn is_active(&self) -> bool {
        self.header.state == State::Active
    }

    pub(super) fn take_key_value(self) -> (String, Option<String>) {
        (self.body.key, self.body.value)
    }

    pub(super) fn dump(self) -> EntryDump {
        EntryDump {
            is_deleted: self.header.state == State::Deleted,
            timestamp_ms: self.header.timestamp_ms,
            key: self.body.key,
            value: self.body.value,
        }
    }

    fn calc_crc_checksum(&self) -> u32 {
        let mut h = crc32fast::Hasher::new();
        h.update(
            [
                (self.header.key_bytes as u64).to_be_bytes(),
                (self.header.value_bytes as u64).to_be_bytes(),
                self.header.timestamp_ms.to_be_bytes(),
            ]
            .concat()
            .as_ref(),
        );

        h.update((self.header.state as u8).to_be_bytes().as_ref());
        h.update(self.body.key.as_bytes());
        if let Some(value) = &self.body.value {
            h.update(value.as_bytes());
        }
        h.finalize()
    }

    // Assert entry data consistency.
    fn assert(&self) -> bool {
        self.header.key_bytes == self.body.key.len()
            && self.header.value_bytes == self.body.value.as_ref().map(String::len).unwrap_or(0)
            && self.header.crc_checksum == self.calc_crc_checksum()
    }

    fn encoded_len(&self) -> usize {
        Entry::HEADER_BYTES + self.header.body_len()
    }
}

impl From<u8> for State {
    fn from(n: u8) -> Self {
        match n {
            1 => State::Active,
            2 => State::Deleted,
            _ => State::Invalid,
        }
    }
}

impl Header {
    fn body_len(&self) -> usize {
        self.key_bytes + self.value_bytes
    }
}
