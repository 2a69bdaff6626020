//! UI state controller.
//!
//! Owns the photo, the enhanced result and the four-state machine
//! (`Empty`, `Ready`, `Loading`, `Result`) that decides what a
//! [`UiBinding`] shows and which controls it enables.

pub mod binding;
pub mod source;

use serde::Serialize;

use crate::config::DOWNLOAD_FILE_NAME;
use crate::error::GatewayError;
use crate::gateway::{encode_file, EncodedImage, Gateway};

pub use binding::{Control, DisplayImage, Download, ImageSlot, Region, UiBinding};
pub use source::SourceImage;

/// Shown when enhance is triggered without a photo.
pub const NO_SOURCE_NOTICE: &str = "Please upload a photo first.";

/// Shown for every failed enhancement, whatever the cause.
pub const ENHANCE_FAILED_NOTICE: &str =
    "Sorry, the photo could not be enhanced. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Empty,
    Ready,
    Loading,
    Result,
}

/// Work captured by [`Controller::begin_enhance`] for one attempt.
#[derive(Debug, Clone)]
pub struct EnhanceJob {
    pub attempt: u64,
    pub source: SourceImage,
}

impl EnhanceJob {
    /// Encode the photo, then send it. Both steps are awaited in order.
    pub async fn run(&self, gateway: &Gateway) -> Result<EncodedImage, GatewayError> {
        let encoded = encode_file(&self.source.bytes[..], &self.source.media_type).await?;
        gateway.request_enhancement(&encoded).await
    }
}

pub struct Controller<U> {
    ui: U,
    phase: Phase,
    source: Option<SourceImage>,
    result: Option<EncodedImage>,
    attempt: u64,
}

impl<U: UiBinding> Controller<U> {
    pub fn new(ui: U) -> Self {
        let mut controller = Self {
            ui,
            phase: Phase::Empty,
            source: None,
            result: None,
            attempt: 0,
        };
        controller.render();
        controller
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn result(&self) -> Option<&EncodedImage> {
        self.result.as_ref()
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    /// A new photo replaces the old one and discards any result.
    pub fn on_file_selected(&mut self, source: SourceImage) {
        if self.phase == Phase::Loading {
            tracing::warn!("File selected while an enhancement is in flight; ignoring");
            return;
        }

        tracing::info!(
            name = %source.name,
            media_type = %source.media_type,
            size = source.bytes.len(),
            "Photo selected"
        );

        self.result = None;
        self.ui.set_image(ImageSlot::Enhanced, None);
        self.ui.set_image(ImageSlot::Original, Some(source.display()));
        self.source = Some(source);
        self.phase = Phase::Ready;
        self.render();
    }

    /// Enter `Loading` and hand back the work to perform, or `None` when the
    /// click is refused.
    pub fn begin_enhance(&mut self) -> Option<EnhanceJob> {
        if self.phase == Phase::Loading {
            tracing::warn!("Enhancement already in flight; ignoring click");
            return None;
        }

        let Some(source) = self.source.clone() else {
            tracing::warn!("Enhance clicked with no photo selected");
            self.ui.alert(NO_SOURCE_NOTICE);
            return None;
        };

        self.result = None;
        self.ui.set_image(ImageSlot::Enhanced, None);
        self.attempt += 1;
        self.phase = Phase::Loading;
        self.render();

        Some(EnhanceJob {
            attempt: self.attempt,
            source,
        })
    }

    /// Apply the outcome of attempt `attempt`. Stale outcomes are dropped.
    pub fn finish_enhance(&mut self, attempt: u64, outcome: Result<EncodedImage, GatewayError>) {
        if self.phase != Phase::Loading || attempt != self.attempt {
            tracing::debug!(attempt, current = self.attempt, "Dropping stale enhancement outcome");
            return;
        }

        let decoded = outcome.and_then(|image| {
            let bytes = image.decode()?;
            Ok((image, bytes))
        });

        match decoded {
            Ok((image, bytes)) => {
                self.ui.set_image(
                    ImageSlot::Enhanced,
                    Some(DisplayImage {
                        media_type: image.media_type.clone(),
                        bytes: bytes.into(),
                    }),
                );
                self.result = Some(image);
                self.phase = Phase::Result;
            }
            Err(e) => {
                if e.is_missing_image() {
                    tracing::warn!(attempt, "Model response contained no image part");
                } else {
                    tracing::error!(attempt, error = %e, "Enhancement request failed");
                }
                self.ui.alert(ENHANCE_FAILED_NOTICE);
                self.phase = Phase::Ready;
            }
        }
        self.render();
    }

    pub async fn on_enhance_clicked(&mut self, gateway: &Gateway) {
        let Some(job) = self.begin_enhance() else {
            return;
        };
        let outcome = job.run(gateway).await;
        self.finish_enhance(job.attempt, outcome);
    }

    /// Save the result. Only honoured in `Result`.
    pub fn on_download_clicked(&mut self) {
        if self.phase != Phase::Result {
            tracing::warn!(phase = ?self.phase, "Download requested without a result");
            return;
        }
        let Some(result) = &self.result else {
            return;
        };

        match result.decode() {
            Ok(bytes) => {
                tracing::info!(file_name = DOWNLOAD_FILE_NAME, size = bytes.len(), "Saving result");
                self.ui.save(Download {
                    file_name: DOWNLOAD_FILE_NAME.to_string(),
                    media_type: result.media_type.clone(),
                    bytes,
                });
            }
            Err(e) => tracing::error!(error = %e, "Stored result could not be decoded"),
        }
    }

    fn render(&mut self) {
        let phase = self.phase;
        let shown = |region: Region| match region {
            Region::OriginalImage => phase != Phase::Empty,
            Region::OriginalPlaceholder => phase == Phase::Empty,
            Region::EnhancedImage => phase == Phase::Result,
            Region::EnhancedPlaceholder => matches!(phase, Phase::Empty | Phase::Ready),
            Region::Loader => phase == Phase::Loading,
        };
        let enabled = |control: Control| match control {
            Control::FileInput => phase != Phase::Loading,
            Control::Enhance => matches!(phase, Phase::Ready | Phase::Result),
            Control::Download => phase == Phase::Result,
        };

        for region in Region::ALL {
            self.ui.set_visible(region, shown(region));
        }
        for control in Control::ALL {
            self.ui.set_enabled(control, enabled(control));
        }
    }
}
