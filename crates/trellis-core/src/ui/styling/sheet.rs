//! Style sheet configuration
//!
//! Widgets never look styling up from a global. A [`StyleSheet`] is passed
//! into each widget constructor, and the widget copies the fields it needs.
//! Style sheets can be persisted as a compact postcard blob through their
//! [`StyleConfig`] form.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use super::colors::{
    COLOR_ACCENT, COLOR_ACCENT_DIM, COLOR_BACKGROUND, COLOR_FOREGROUND, COLOR_STROKE, DARK_GRAY,
    WHITE,
};
use crate::ui::core::{CUE_NAME_CAPACITY, CueName};

/// Default cue played when a widget becomes highlighted
pub const HIGHLIGHTED_CUE: &str = "highlighted";

/// Default cue played when a widget is clicked
pub const CLICKED_CUE: &str = "clicked";

/// Default cue played when a menu entry changes its selection
pub const SELECTION_CHANGE_CUE: &str = "selection_change";

/// Error types for style configuration
#[derive(Debug, Error)]
pub enum StyleError {
    /// Persisted bytes are not a valid style config
    #[error("Style config could not be decoded: {0}")]
    Decode(postcard::Error),

    /// Style config could not be serialized
    #[error("Style config could not be encoded: {0}")]
    Encode(postcard::Error),

    /// Cue name does not fit in a [`CueName`]
    #[error("Cue name longer than {max} bytes")]
    CueNameTooLong {
        /// Maximum cue name length
        max: usize,
    },
}

/// Result type for style operations
pub type StyleResult<T> = Result<T, StyleError>;

/// Build a [`CueName`], rejecting names that do not fit.
pub fn cue_name(name: &str) -> StyleResult<CueName> {
    CueName::try_from(name).map_err(|_| StyleError::CueNameTooLong {
        max: CUE_NAME_CAPACITY,
    })
}

/// Every style field a widget recognizes.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    /// Fill of panels and button faces
    pub background_color: Rgb565,

    /// Fill while highlighted; also used for scrollbars by default
    pub highlighted_background_color: Rgb565,

    /// Fill while the click debounce is running
    pub clicked_background_color: Rgb565,

    /// Label text
    pub text_color: Rgb565,

    /// Label text while highlighted
    pub highlighted_text_color: Rgb565,

    /// Panel outline, if any
    pub outline_color: Option<Rgb565>,

    /// Scrollbar fill
    pub scrollbar_color: Rgb565,

    /// Cue requested when a widget becomes highlighted
    pub highlighted_sound: CueName,

    /// Cue requested when a widget is clicked
    pub clicked_sound: CueName,

    /// Cue requested when a menu entry changes selection
    pub selection_change_sound: CueName,

    /// Widgets built from this sheet request no cues at all
    pub quiet: bool,
}

impl Default for StyleSheet {
    /// Returns the dark style sheet
    fn default() -> Self {
        Self::dark()
    }
}

impl StyleSheet {
    /// Light text on dark panels
    pub fn dark() -> Self {
        Self {
            background_color: COLOR_FOREGROUND,
            highlighted_background_color: COLOR_ACCENT,
            clicked_background_color: COLOR_ACCENT_DIM,
            text_color: WHITE,
            highlighted_text_color: COLOR_BACKGROUND,
            outline_color: Some(COLOR_STROKE),
            scrollbar_color: COLOR_ACCENT,
            highlighted_sound: default_cue(HIGHLIGHTED_CUE),
            clicked_sound: default_cue(CLICKED_CUE),
            selection_change_sound: default_cue(SELECTION_CHANGE_CUE),
            quiet: false,
        }
    }

    /// Dark text on white panels
    pub fn light() -> Self {
        Self {
            background_color: WHITE,
            text_color: DARK_GRAY,
            highlighted_text_color: WHITE,
            ..Self::dark()
        }
    }

    /// Same sheet with cue requests disabled.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Replace the highlight and click cue names.
    pub fn with_cues(mut self, highlighted: &str, clicked: &str) -> StyleResult<Self> {
        self.highlighted_sound = cue_name(highlighted)?;
        self.clicked_sound = cue_name(clicked)?;
        Ok(self)
    }

    pub fn from_config(config: &StyleConfig) -> Self {
        Self {
            background_color: from_raw(config.background),
            highlighted_background_color: from_raw(config.highlighted_background),
            clicked_background_color: from_raw(config.clicked_background),
            text_color: from_raw(config.text),
            highlighted_text_color: from_raw(config.highlighted_text),
            outline_color: config.outline.map(from_raw),
            scrollbar_color: from_raw(config.scrollbar),
            highlighted_sound: config.highlighted_sound.clone(),
            clicked_sound: config.clicked_sound.clone(),
            selection_change_sound: config.selection_change_sound.clone(),
            quiet: config.quiet,
        }
    }

    pub fn to_config(&self) -> StyleConfig {
        StyleConfig {
            background: to_raw(self.background_color),
            highlighted_background: to_raw(self.highlighted_background_color),
            clicked_background: to_raw(self.clicked_background_color),
            text: to_raw(self.text_color),
            highlighted_text: to_raw(self.highlighted_text_color),
            outline: self.outline_color.map(to_raw),
            scrollbar: to_raw(self.scrollbar_color),
            highlighted_sound: self.highlighted_sound.clone(),
            clicked_sound: self.clicked_sound.clone(),
            selection_change_sound: self.selection_change_sound.clone(),
            quiet: self.quiet,
        }
    }

    /// Decode a style sheet persisted with [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> StyleResult<Self> {
        let config: StyleConfig = postcard::from_bytes(bytes).map_err(StyleError::Decode)?;
        Ok(Self::from_config(&config))
    }

    pub fn to_bytes(&self) -> StyleResult<Vec<u8>> {
        postcard::to_allocvec(&self.to_config()).map_err(StyleError::Encode)
    }
}

/// Persisted form of a [`StyleSheet`], colors as raw RGB565 words.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StyleConfig {
    pub background: u16,
    pub highlighted_background: u16,
    pub clicked_background: u16,
    pub text: u16,
    pub highlighted_text: u16,
    pub outline: Option<u16>,
    pub scrollbar: u16,
    pub highlighted_sound: CueName,
    pub clicked_sound: CueName,
    pub selection_change_sound: CueName,
    pub quiet: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleSheet::default().to_config()
    }
}

fn default_cue(name: &str) -> CueName {
    // Built-in names are short literals.
    CueName::try_from(name).unwrap_or_default()
}

fn to_raw(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

fn from_raw(raw: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cues() {
        let style = StyleSheet::default();
        assert_eq!(style.highlighted_sound.as_str(), HIGHLIGHTED_CUE);
        assert_eq!(style.clicked_sound.as_str(), CLICKED_CUE);
        assert!(!style.quiet);
    }

    #[test]
    fn test_persisted_sheet_restores_every_field() {
        let style = StyleSheet::light()
            .quiet()
            .with_cues("menu_hover", "menu_select")
            .unwrap();

        let bytes = style.to_bytes().unwrap();
        let restored = StyleSheet::from_bytes(&bytes).unwrap();

        assert_eq!(restored, style);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = StyleSheet::from_bytes(&[0xff, 0xff, 0xff]);
        assert!(matches!(result, Err(StyleError::Decode(_))));
    }

    #[test]
    fn test_overlong_cue_name_is_rejected() {
        let long = "a-cue-name-that-does-not-fit-in-thirty-two-bytes";
        let result = StyleSheet::default().with_cues(long, "clicked");
        assert!(matches!(result, Err(StyleError::CueNameTooLong { max: 32 })));
    }
}
