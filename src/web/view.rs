//! Browser-side rendering state.
//!
//! The page script never decides anything on its own: it fetches a
//! [`ViewSnapshot`] and applies it verbatim.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::controller::{Control, DisplayImage, Download, ImageSlot, Phase, Region, UiBinding};

#[derive(Debug, Default)]
pub struct WebView {
    visible: BTreeMap<Region, bool>,
    enabled: BTreeMap<Control, bool>,
    original: Option<(u64, DisplayImage)>,
    enhanced: Option<(u64, DisplayImage)>,
    revision: u64,
    alerts: Vec<String>,
    download: Option<Download>,
}

/// Serialized for `GET /api/view`.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub phase: Phase,
    pub visible: BTreeMap<Region, bool>,
    pub enabled: BTreeMap<Control, bool>,
    pub original: Option<ImageRef>,
    pub enhanced: Option<ImageRef>,
    pub alerts: Vec<String>,
}

/// Where the page loads a slot's image from. The revision changes with the
/// content so the browser never shows a cached, stale image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRef {
    pub src: String,
    pub media_type: String,
}

impl WebView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; pending alerts are handed out once.
    pub fn snapshot(&mut self, phase: Phase) -> ViewSnapshot {
        ViewSnapshot {
            phase,
            visible: self.visible.clone(),
            enabled: self.enabled.clone(),
            original: image_ref(ImageSlot::Original, self.original.as_ref()),
            enhanced: image_ref(ImageSlot::Enhanced, self.enhanced.as_ref()),
            alerts: std::mem::take(&mut self.alerts),
        }
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&DisplayImage> {
        let entry = match slot {
            ImageSlot::Original => self.original.as_ref(),
            ImageSlot::Enhanced => self.enhanced.as_ref(),
        };
        entry.map(|(_, image)| image)
    }

    pub fn take_download(&mut self) -> Option<Download> {
        self.download.take()
    }
}

fn image_ref(slot: ImageSlot, entry: Option<&(u64, DisplayImage)>) -> Option<ImageRef> {
    entry.map(|(revision, image)| ImageRef {
        src: format!("/api/image/{}?rev={revision}", slot.as_str()),
        media_type: image.media_type.clone(),
    })
}

impl UiBinding for WebView {
    fn set_visible(&mut self, region: Region, visible: bool) {
        self.visible.insert(region, visible);
    }

    fn set_enabled(&mut self, control: Control, enabled: bool) {
        self.enabled.insert(control, enabled);
    }

    fn set_image(&mut self, slot: ImageSlot, image: Option<DisplayImage>) {
        let entry = image.map(|image| {
            self.revision += 1;
            (self.revision, image)
        });
        match slot {
            ImageSlot::Original => self.original = entry,
            ImageSlot::Enhanced => self.enhanced = entry,
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn save(&mut self, download: Download) {
        self.download = Some(download);
    }
}
