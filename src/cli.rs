//! Headless binding used by `photo-restorer enhance`.

use anyhow::Context as _;
use std::path::Path;

use crate::controller::{
    Control, Controller, DisplayImage, Download, ImageSlot, Phase, Region, SourceImage, UiBinding,
};
use crate::gateway::Gateway;

/// Logs what a screen would show and keeps the saved file for the caller.
#[derive(Debug, Default)]
pub struct TerminalBinding {
    notices: Vec<String>,
    download: Option<Download>,
}

impl TerminalBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn take_download(&mut self) -> Option<Download> {
        self.download.take()
    }
}

impl UiBinding for TerminalBinding {
    fn set_visible(&mut self, region: Region, visible: bool) {
        tracing::trace!(?region, visible, "region");
    }

    fn set_enabled(&mut self, control: Control, enabled: bool) {
        tracing::trace!(?control, enabled, "control");
    }

    fn set_image(&mut self, slot: ImageSlot, image: Option<DisplayImage>) {
        if let Some(image) = image {
            tracing::debug!(?slot, media_type = %image.media_type, size = image.bytes.len(), "image");
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
        self.notices.push(message.to_string());
    }

    fn save(&mut self, download: Download) {
        self.download = Some(download);
    }
}

/// Run one photo through select, enhance and download, writing the result
/// to `output`.
pub async fn enhance_file(
    gateway: &Gateway,
    input: &Path,
    output: &Path,
) -> anyhow::Result<Download> {
    let source = SourceImage::open(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut controller = Controller::new(TerminalBinding::new());
    controller.on_file_selected(source);
    controller.on_enhance_clicked(gateway).await;

    if controller.phase() != Phase::Result {
        anyhow::bail!("Enhancement of {} failed", input.display());
    }

    controller.on_download_clicked();
    let download = controller
        .ui_mut()
        .take_download()
        .ok_or_else(|| anyhow::anyhow!("No enhanced image to save"))?;

    tokio::fs::write(output, &download.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        output = %output.display(),
        size = download.bytes.len(),
        "Wrote enhanced photo"
    );
    Ok(download)
}
