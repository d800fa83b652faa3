use std::fmt::Display;

const DEFAULT_IMAGE_ROOT: &str = "https://image.tmdb.org/t/p";

/// Size token of the image server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// w185, cast and crew portraits
    Profile,
    /// w500
    #[default]
    Poster,
    /// w1280
    Backdrop,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Profile => "w185",
            ImageSize::Poster => "w500",
            ImageSize::Backdrop => "w1280",
            ImageSize::Original => "original",
        }
    }
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns catalog image paths into absolute URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    root: String,
}

impl Default for ImageUrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_ROOT)
    }
}

impl ImageUrlBuilder {
    pub fn new(root: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    /// `<root>/<size><path>`; catalog paths carry their own leading slash.
    /// An empty path yields an empty URL, anything else is passed through.
    pub fn url(&self, path: &str, size: ImageSize) -> String {
        if path.is_empty() {
            return String::new();
        }
        format!("{}/{}{}", self.root, size, path)
    }

    /// Same as [`url`](Self::url) for an optional catalog path
    pub fn url_opt(&self, path: Option<&str>, size: ImageSize) -> String {
        self.url(path.unwrap_or_default(), size)
    }

    pub fn poster(&self, path: &str) -> String {
        self.url(path, ImageSize::Poster)
    }

    pub fn backdrop(&self, path: &str) -> String {
        self.url(path, ImageSize::Backdrop)
    }

    pub fn profile(&self, path: &str) -> String {
        self.url(path, ImageSize::Profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_default_size_is_poster() {
        let images = ImageUrlBuilder::default();
        assert_eq!(
            images.url("/abc.jpg", ImageSize::default()),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_empty_path_yields_empty_url() {
        let images = ImageUrlBuilder::default();
        assert_eq!(images.url("", ImageSize::Backdrop), "");
        assert_eq!(images.url_opt(None, ImageSize::Poster), "");
    }

    #[test]
    fn test_size_helpers() {
        let images = ImageUrlBuilder::new("http://img.local/t/p/");
        assert_eq!(images.poster("/p.jpg"), "http://img.local/t/p/w500/p.jpg");
        assert_eq!(images.backdrop("/b.jpg"), "http://img.local/t/p/w1280/b.jpg");
        assert_eq!(images.profile("/c.jpg"), "http://img.local/t/p/w185/c.jpg");
        assert_eq!(
            images.url("/o.png", ImageSize::Original),
            "http://img.local/t/p/original/o.png"
        );
    }
}
