//! Assets: immutable named blobs served by an asset provider.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read};

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::Serialize;

/// Seconds between the Unix epoch and `0001-01-01T00:00:00Z`.
const ZERO_TIME_UNIX_SECS: i64 = -62_135_596_800;

/// Modification time of an asset.
///
/// Embedded assets carry no filesystem timestamp, so every one of them
/// reports [`ModifiedTime::unknown`]: the zero time `0001-01-01 00:00:00 UTC`.
/// Callers must treat that value as "no information", not as a real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModifiedTime(DateTime<Utc>);

impl ModifiedTime {
    /// The fixed sentinel reported for assets without a timestamp.
    pub fn unknown() -> Self {
        Self(DateTime::from_timestamp(ZERO_TIME_UNIX_SECS, 0).unwrap_or_default())
    }

    /// Wrap a real timestamp (e.g. from file metadata).
    pub fn at(time: DateTime<Utc>) -> Self {
        Self(time)
    }

    /// `true` for the sentinel value.
    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for ModifiedTime {
    fn default() -> Self {
        Self::unknown()
    }
}

impl From<std::time::SystemTime> for ModifiedTime {
    fn from(time: std::time::SystemTime) -> Self {
        Self(DateTime::<Utc>::from(time))
    }
}

/// Renders as `0001-01-01 00:00:00 +0000 UTC`.
impl fmt::Display for ModifiedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S %z UTC"))
    }
}

/// MD5 digest of an asset's content, kept as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Compute the digest of `content`.
    pub fn of(content: &[u8]) -> Self {
        Self(hex::encode(Md5::digest(content)))
    }

    /// The 32 hex digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Metadata returned by [`AssetFile::stat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetInfo {
    pub path: String,
    pub size: u64,
    pub modified: ModifiedTime,
}

impl AssetInfo {
    /// Final path segment, e.g. `about.tmpl` for `pages/about.tmpl`.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// An open handle over one asset's content.
///
/// The content is shared with the provider where possible (embedded assets
/// are borrowed straight from the binary). The handle keeps a read cursor so
/// it can be consumed through [`io::Read`].
#[derive(Debug, Clone)]
pub struct AssetFile {
    path: String,
    content: Cow<'static, [u8]>,
    modified: ModifiedTime,
    cursor: usize,
}

impl AssetFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<Cow<'static, [u8]>>,
        modified: ModifiedTime,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            modified,
            cursor: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The full content regardless of the read cursor.
    pub fn contents(&self) -> &[u8] {
        &self.content
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Read everything from the cursor to the end.
    ///
    /// A second call on the same handle returns an empty buffer.
    pub fn read_all(&mut self) -> Vec<u8> {
        let rest = self.content[self.cursor..].to_vec();
        self.cursor = self.content.len();
        rest
    }

    pub fn stat(&self) -> AssetInfo {
        AssetInfo {
            path: self.path.clone(),
            size: self.size(),
            modified: self.modified,
        }
    }

    pub fn digest(&self) -> ContentDigest {
        ContentDigest::of(&self.content)
    }
}

impl Read for AssetFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = &self.content[self.cursor..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.cursor += n;
        Ok(n)
    }
}

/// Check that `path` names an asset inside a provider's root.
///
/// Valid paths are slash separated and relative: no leading or trailing
/// slash, no empty, `.` or `..` segments, and no backslashes.
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && !path.contains('\\')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
