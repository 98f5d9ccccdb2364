use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    /// Exact encoding size a clip must offer to be usable.
    pub fn target_size(self) -> (u32, u32) {
        match self {
            Orientation::Landscape => (1920, 1080),
            Orientation::Portrait => (1080, 1920),
        }
    }

    /// At least the target size and exactly 16:9 (or 9:16 for portrait).
    pub fn accepts(self, width: u32, height: u32) -> bool {
        let (min_w, min_h) = self.target_size();
        if width < min_w || height < min_h {
            return false;
        }
        let (w, h) = (u64::from(width), u64::from(height));
        match self {
            Orientation::Landscape => w * 9 == h * 16,
            Orientation::Portrait => h * 9 == w * 16,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            other => Err(format!(
                "orientation must be 'landscape' or 'portrait', got '{other}'"
            )),
        }
    }
}

/// One downloadable rendition of a clip.
#[derive(Clone, Debug, PartialEq)]
pub struct FootageEncoding {
    pub width: u32,
    pub height: u32,
    pub url: String,
}

/// A stock clip returned by a footage search.
#[derive(Clone, Debug, PartialEq)]
pub struct FootageCandidate {
    pub width: u32,
    pub height: u32,
    /// Seconds.
    pub duration: f64,
    pub encodings: Vec<FootageEncoding>,
}

/// Footage assigned to an interval; `url == None` means nothing suitable was found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FootageMatch {
    pub url: Option<String>,
}

impl FootageMatch {
    pub fn found(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    pub fn none() -> Self {
        Self { url: None }
    }

    pub fn is_none(&self) -> bool {
        self.url.is_none()
    }
}

/// Identity shared by every encoding of one clip: the URL up to its first `.hd`.
pub fn clip_identity(url: &str) -> &str {
    url.split(".hd").next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact_landscape(Orientation::Landscape, 1920, 1080, true)]
    #[case::uhd_landscape(Orientation::Landscape, 3840, 2160, true)]
    #[case::too_small(Orientation::Landscape, 1280, 720, false)]
    #[case::wrong_ratio(Orientation::Landscape, 2048, 1080, false)]
    #[case::portrait_in_landscape(Orientation::Landscape, 1080, 1920, false)]
    #[case::exact_portrait(Orientation::Portrait, 1080, 1920, true)]
    #[case::uhd_portrait(Orientation::Portrait, 2160, 3840, true)]
    #[case::landscape_in_portrait(Orientation::Portrait, 1920, 1080, false)]
    fn test_accepts(
        #[case] orientation: Orientation,
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(orientation.accepts(width, height), expected);
    }

    #[test]
    fn test_target_size() {
        assert_eq!(Orientation::Landscape.target_size(), (1920, 1080));
        assert_eq!(Orientation::Portrait.target_size(), (1080, 1920));
    }

    #[rstest]
    #[case::hd_suffix(
        "https://videos.example.com/video-files/123/123-hd_1920_1080_25fps.mp4",
        "https://videos.example.com/video-files/123/123-hd_1920_1080_25fps.mp4"
    )]
    #[case::dot_hd(
        "https://player.example.com/external/42.hd.mp4?s=abc",
        "https://player.example.com/external/42"
    )]
    #[case::no_marker("https://x.example/clip.mp4", "https://x.example/clip.mp4")]
    fn test_clip_identity(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(clip_identity(url), expected);
    }

    #[test]
    fn test_orientation_from_str() {
        assert_eq!("Portrait".parse::<Orientation>(), Ok(Orientation::Portrait));
        assert!("square".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_footage_match_constructors() {
        assert!(FootageMatch::none().is_none());
        assert_eq!(FootageMatch::found("u").url.as_deref(), Some("u"));
    }
}
