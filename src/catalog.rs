//! Static catalog of background images
//!
//! The catalog is generated from a fixed keyword list: entry `i` takes keyword
//! `i % len` and pins a distinct picture through the service's `lock` parameter.

/// Base URL of the placeholder image service
pub const IMAGE_SERVICE_BASE_URL: &str = "https://loremflickr.com";

/// Keywords cycled across the catalog entries
pub static KEYWORDS: [&str; 8] = [
    "nature",
    "landscape",
    "mountain",
    "ocean",
    "forest",
    "sky",
    "city",
    "architecture",
];

/// Number of images kept in the catalog
pub const IMAGE_COUNT: usize = 24;

/// Requested image width in pixels
pub const IMAGE_WIDTH: u32 = 1920;

/// Requested image height in pixels
pub const IMAGE_HEIGHT: u32 = 1080;

/// A single image the cache should contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Logical name, also the file stem on disk
    pub name: String,
    /// Remote source of the image
    pub url: String,
}

impl ImageRef {
    /// Local filename for this image (`<name>.jpg`)
    pub fn filename(&self) -> String {
        format!("{}.jpg", self.name)
    }
}

/// Ordered set of image references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<ImageRef>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_keywords(
            IMAGE_SERVICE_BASE_URL,
            &KEYWORDS,
            IMAGE_COUNT,
            IMAGE_WIDTH,
            IMAGE_HEIGHT,
        )
    }
}

impl Catalog {
    /// Builds a catalog by cycling `keywords` across `count` entries
    ///
    /// # Arguments
    /// * `base_url` - Image service root, without a trailing slash
    /// * `keywords` - Search terms, reused in order once exhausted
    /// * `count` - Number of entries to generate
    /// * `width` / `height` - Requested dimensions embedded in each URL
    ///
    /// An empty keyword list yields an empty catalog.
    pub fn from_keywords(
        base_url: &str,
        keywords: &[&str],
        count: usize,
        width: u32,
        height: u32,
    ) -> Self {
        if keywords.is_empty() {
            return Self::from_entries(Vec::new());
        }

        let base_url = base_url.trim_end_matches('/');
        let entries = (0..count)
            .map(|index| {
                let keyword = keywords[index % keywords.len()];
                ImageRef {
                    name: format!("{}-{:02}", keyword, index),
                    url: format!(
                        "{}/{}/{}/{}?lock={}",
                        base_url, width, height, keyword, index
                    ),
                }
            })
            .collect();

        Self::from_entries(entries)
    }

    /// Wraps an explicit list of references
    pub fn from_entries(entries: Vec<ImageRef>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ImageRef] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `filename` belongs to one of the catalog entries
    pub fn contains_filename(&self, filename: &str) -> bool {
        self.entries.iter().any(|entry| entry.filename() == filename)
    }
}
