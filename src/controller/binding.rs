//! Capabilities the controller needs from a concrete UI.

use serde::Serialize;
use std::sync::Arc;

/// Display regions whose visibility the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    OriginalImage,
    OriginalPlaceholder,
    EnhancedImage,
    EnhancedPlaceholder,
    Loader,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::OriginalImage,
        Region::OriginalPlaceholder,
        Region::EnhancedImage,
        Region::EnhancedPlaceholder,
        Region::Loader,
    ];
}

/// User-operable controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    FileInput,
    Enhance,
    Download,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::FileInput, Control::Enhance, Control::Download];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Original,
    Enhanced,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 2] = [ImageSlot::Original, ImageSlot::Enhanced];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageSlot::Original => "original",
            ImageSlot::Enhanced => "enhanced",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.as_str() == name)
    }
}

/// Image content handed to a binding for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

/// A file the user asked to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

pub trait UiBinding {
    fn set_visible(&mut self, region: Region, visible: bool);

    fn set_enabled(&mut self, control: Control, enabled: bool);

    /// Show `image` in `slot`, or clear the slot with `None`.
    fn set_image(&mut self, slot: ImageSlot, image: Option<DisplayImage>);

    /// Raise a user-visible notice.
    fn alert(&mut self, message: &str);

    fn save(&mut self, download: Download);
}
