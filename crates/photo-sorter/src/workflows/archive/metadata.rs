use std::collections::BTreeMap;
use std::future::Future;
use std::io::Cursor;
use std::path::Path;

use tracing::debug;

use super::domain::DateCandidate;
use super::filename::FilenameDateParser;

/// Extensions whose embedded metadata is worth reading.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const PNG_CREATION_TIME: &str = "Creation Time";

/// Date-bearing tags, in ascending precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataTag {
    CreationDate,
    DateTime,
    DateTimeOriginal,
}

impl MetadataTag {
    pub fn ordered() -> [MetadataTag; 3] {
        [
            MetadataTag::CreationDate,
            MetadataTag::DateTime,
            MetadataTag::DateTimeOriginal,
        ]
    }
}

/// A tag as reported by a reader: the raw value and its human-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagValue {
    pub value: String,
    pub description: String,
}

impl TagValue {
    pub fn described(description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            value: description.clone(),
            description,
        }
    }

    fn text(&self) -> Option<&str> {
        [self.description.trim(), self.value.trim()]
            .into_iter()
            .find(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataTagSet {
    tags: BTreeMap<MetadataTag, TagValue>,
}

impl MetadataTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tag: MetadataTag, value: TagValue) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn insert(&mut self, tag: MetadataTag, value: TagValue) {
        self.tags.insert(tag, value);
    }

    pub fn get(&self, tag: MetadataTag) -> Option<&TagValue> {
        self.tags.get(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The date string to decode. A later tag in [`MetadataTag::ordered`]
    /// overrides an earlier one.
    pub fn date_string(&self) -> Option<&str> {
        let mut selected = None;
        for tag in MetadataTag::ordered() {
            if let Some(text) = self.get(tag).and_then(TagValue::text) {
                selected = Some(text);
            }
        }
        selected
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("unable to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable exif data: {0}")]
    Exif(#[from] exif::Error),
    #[error("metadata reader task failed: {0}")]
    Task(String),
}

/// Source of embedded metadata for a file on disk.
pub trait MetadataReader: Send + Sync {
    fn read_tags(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<MetadataTagSet, MetadataError>> + Send;
}

/// Reads EXIF date tags, plus the PNG `Creation Time` text chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataReader;

impl MetadataReader for ExifMetadataReader {
    async fn read_tags(&self, path: &Path) -> Result<MetadataTagSet, MetadataError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_embedded_tags(&path))
            .await
            .map_err(|err| MetadataError::Task(err.to_string()))?
    }
}

fn read_embedded_tags(path: &Path) -> Result<MetadataTagSet, MetadataError> {
    let bytes = std::fs::read(path)?;
    let mut tags = MetadataTagSet::new();

    if let Some(created) = png_creation_time(&bytes) {
        tags.insert(MetadataTag::CreationDate, TagValue::described(created));
    }

    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(&bytes)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(tags),
        Err(err) if !tags.is_empty() => {
            debug!(path = %path.display(), error = %err, "ignoring unreadable exif block");
            return Ok(tags);
        }
        Err(err) => return Err(err.into()),
    };

    for (exif_tag, tag) in [
        (exif::Tag::DateTime, MetadataTag::DateTime),
        (exif::Tag::DateTimeOriginal, MetadataTag::DateTimeOriginal),
    ] {
        if let Some(field) = exif.get_field(exif_tag, exif::In::PRIMARY) {
            tags.insert(tag, exif_tag_value(field));
        }
    }

    Ok(tags)
}

fn exif_tag_value(field: &exif::Field) -> TagValue {
    let description = match &field.value {
        exif::Value::Ascii(parts) => parts
            .first()
            .map(|raw| {
                String::from_utf8_lossy(raw)
                    .trim_end_matches('\0')
                    .trim()
                    .to_string()
            })
            .unwrap_or_default(),
        _ => String::new(),
    };

    TagValue {
        value: field.display_value().to_string(),
        description,
    }
}

/// The `Creation Time` keyword of a PNG, from a `tEXt`, `zTXt` or `iTXt`
/// chunk ahead of the image data.
fn png_creation_time(bytes: &[u8]) -> Option<String> {
    if !bytes.starts_with(PNG_SIGNATURE) {
        return None;
    }

    let reader = match png::Decoder::new(Cursor::new(bytes)).read_info() {
        Ok(reader) => reader,
        Err(err) => {
            debug!(error = %err, "ignoring unreadable png header");
            return None;
        }
    };
    let info = reader.info();

    info.uncompressed_latin1_text
        .iter()
        .find(|chunk| chunk.keyword == PNG_CREATION_TIME)
        .map(|chunk| chunk.text.clone())
        .or_else(|| {
            info.compressed_latin1_text
                .iter()
                .find(|chunk| chunk.keyword == PNG_CREATION_TIME)
                .and_then(|chunk| chunk.get_text().ok())
        })
        .or_else(|| {
            info.utf8_text
                .iter()
                .find(|chunk| chunk.keyword == PNG_CREATION_TIME)
                .and_then(|chunk| chunk.get_text().ok())
        })
}

pub(crate) fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Infers a capture date from a file's embedded metadata.
#[derive(Debug, Clone)]
pub struct MetadataDateParser<R> {
    reader: R,
    filename: FilenameDateParser,
}

impl<R: MetadataReader> MetadataDateParser<R> {
    pub fn new(reader: R, filename: FilenameDateParser) -> Self {
        Self { reader, filename }
    }

    pub async fn parse(&self, path: &Path) -> DateCandidate {
        if !has_supported_extension(path) {
            return DateCandidate::invalid();
        }

        let tags = match self.reader.read_tags(path).await {
            Ok(tags) => tags,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "metadata unavailable");
                return DateCandidate::invalid();
            }
        };

        match tags.date_string() {
            Some(text) => self.filename.parse(text),
            None => DateCandidate::invalid(),
        }
    }
}
