//! Canvas size presets
//!
//! Fixed table of common canvas sizes, selectable by slug or display label.

/// A named canvas size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Short identifier used on the command line and in config files
    pub slug: &'static str,
    /// Human readable label
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const PRESETS: [Preset; 4] = [
    Preset { slug: "square", label: "Square (1:1)", width: 1080, height: 1080 },
    Preset { slug: "classic-tv", label: "Classic TV (4:3)", width: 1200, height: 900 },
    Preset { slug: "widescreen", label: "Widescreen (16:9)", width: 1920, height: 1080 },
    Preset { slug: "tumblr-header", label: "Tumblr Header", width: 3000, height: 1055 },
];

/// Slug of the preset used when nothing else is chosen
pub const DEFAULT_PRESET: &str = "square";

impl Preset {
    /// Slug or label match, case-insensitive, surrounding whitespace ignored
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.slug.eq_ignore_ascii_case(name) || self.label.eq_ignore_ascii_case(name)
    }
}

/// Find a preset by slug or label (case-insensitive)
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.matches(name))
}

/// Comma separated list of slugs, for error messages
pub fn preset_slugs() -> String {
    PRESETS.iter().map(|p| p.slug).collect::<Vec<_>>().join(", ")
}

/// Index of a preset in `PRESETS`, used by the viewer to cycle.
/// Accepts the same names as [`find_preset`].
pub fn preset_index(name: &str) -> Option<usize> {
    PRESETS.iter().position(|p| p.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_slug_and_label() {
        assert_eq!(find_preset("widescreen").map(|p| (p.width, p.height)), Some((1920, 1080)));
        assert_eq!(find_preset("Classic TV (4:3)").map(|p| p.slug), Some("classic-tv"));
        assert_eq!(find_preset("TUMBLR-HEADER").map(|p| p.width), Some(3000));
        assert!(find_preset("poster").is_none());
    }

    #[test]
    fn test_default_preset_exists() {
        let preset = find_preset(DEFAULT_PRESET).unwrap();
        assert_eq!((preset.width, preset.height), (1080, 1080));
    }

    #[test]
    fn test_slug_list() {
        assert_eq!(preset_slugs(), "square, classic-tv, widescreen, tumblr-header");
        assert_eq!(preset_index("widescreen"), Some(2));
    }

    #[test]
    fn test_index_accepts_labels_and_any_case() {
        assert_eq!(preset_index("Widescreen (16:9)"), Some(2));
        assert_eq!(preset_index("WIDESCREEN"), Some(2));
        assert_eq!(preset_index(" classic tv (4:3) "), Some(1));
        assert_eq!(preset_index("poster"), None);

        // every name find_preset resolves has an index
        for preset in &PRESETS {
            for name in [preset.slug, preset.label] {
                assert_eq!(find_preset(name).map(|p| p.slug), preset_index(name).map(|i| PRESETS[i].slug));
            }
        }
    }
}
