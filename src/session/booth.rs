use std::sync::Arc;

use crate::assets::decode::{self, DecodedImage, DecodedImageSet, PostFilter};
use crate::assets::source::{ImageSource, UploadedFile, accept_upload};
use crate::capture::device::{CaptureDevice, CapturedFrame, DeviceDriver};
use crate::capture::machine::{AcquisitionPath, CaptureStateMachine, DeviceSignal, FillOutcome};
use crate::capture::slots::{PhotoSlotSet, SlotIndex};
use crate::config::ComposerConfig;
use crate::encode::png::{ExportFile, export_surface};
use crate::encode::sink::ExportSink;
use crate::foundation::core::SLOT_COUNT;
use crate::foundation::error::{PhotocardError, PhotocardResult};
use crate::foundation::math::DecorRng;
use crate::render::fanout::render_all;
use crate::render::surface::{RenderStamp, RenderTarget, RenderTargets, Surface};
use crate::render::text::{FontBook, Typesetter};
use crate::templates::{Caption, Template, TemplateInput, TemplateRegistry};

/// What happened to an upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// `signal` is `Stop` when this upload filled the last slot while the camera was running;
    /// pass it to [`PhotoboothSession::drive`].
    Filled {
        slot: SlotIndex,
        signal: Option<DeviceSignal>,
    },
    /// Not an image; nothing changed.
    Ignored,
}

/// Whether a finished decode was installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    Applied,
    /// The slots changed while the job ran. Start a new job.
    Stale,
}

/// Snapshot of a complete slot set, decodable off the session's thread.
#[derive(Clone, Debug)]
pub struct DecodeJob {
    sources: [ImageSource; SLOT_COUNT],
    revision: u64,
    filter: PostFilter,
}

impl DecodeJob {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn run(self) -> DecodeCompletion {
        let result = decode::decode_sources(&self.sources, self.filter);
        DecodeCompletion {
            sources: self.sources,
            revision: self.revision,
            result,
        }
    }
}

/// Output of [`DecodeJob::run`], handed back to [`PhotoboothSession::complete_decode`].
#[derive(Debug)]
pub struct DecodeCompletion {
    sources: [ImageSource; SLOT_COUNT],
    revision: u64,
    result: PhotocardResult<[DecodedImage; SLOT_COUNT]>,
}

impl DecodeCompletion {
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

struct Decoded {
    images: DecodedImageSet,
    sources: [ImageSource; SLOT_COUNT],
}

/// One user's photobooth: slots, selected template, decoded photos and the two render targets.
///
/// Every downstream step is gated on a complete slot set. Any slot change drops the decoded
/// photos and invalidates both targets, so a painted surface never outlives its inputs.
pub struct PhotoboothSession {
    config: ComposerConfig,
    caption: Caption,
    registry: TemplateRegistry,
    machine: CaptureStateMachine,
    template: Option<Arc<dyn Template>>,
    decoded: Option<Decoded>,
    targets: RenderTargets,
    typesetter: Typesetter,
}

impl std::fmt::Debug for PhotoboothSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoboothSession")
            .field("slots", self.machine.slots())
            .field("template", &self.template.as_ref().map(|t| t.id()))
            .field("decoded", &self.decoded.as_ref().map(|d| d.images.revision()))
            .field("targets", &self.targets)
            .finish()
    }
}

impl PhotoboothSession {
    /// Validate `config` and load the configured fonts.
    pub fn new(config: ComposerConfig, registry: TemplateRegistry) -> PhotocardResult<Self> {
        let book = FontBook::load(&config.fonts);
        Self::with_fonts(config, registry, book)
    }

    /// Like [`PhotoboothSession::new`] with an explicit font set.
    pub fn with_fonts(
        config: ComposerConfig,
        registry: TemplateRegistry,
        fonts: FontBook,
    ) -> PhotocardResult<Self> {
        config.validate()?;
        let caption = config.caption.resolve(chrono::Local::now().date_naive());
        tracing::debug!(
            templates = registry.len(),
            faces = fonts.face_count(),
            "session created"
        );
        Ok(Self {
            config,
            caption,
            registry,
            machine: CaptureStateMachine::new(),
            template: None,
            decoded: None,
            targets: RenderTargets::new(),
            typesetter: Typesetter::new(fonts),
        })
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn caption(&self) -> &Caption {
        &self.caption
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn machine(&self) -> &CaptureStateMachine {
        &self.machine
    }

    pub fn slots(&self) -> &PhotoSlotSet {
        self.machine.slots()
    }

    pub fn is_complete(&self) -> bool {
        self.machine.is_complete()
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.template.as_deref().map(|t| t.id())
    }

    pub fn preview(&self) -> &Surface {
        &self.targets.preview
    }

    pub fn export_surface(&self) -> &Surface {
        &self.targets.export
    }

    // Upload path

    /// Accept a picked file into the lowest empty slot. Non-images are ignored.
    pub fn upload(&mut self, file: UploadedFile) -> PhotocardResult<UploadOutcome> {
        self.upload_into(None, file)
    }

    /// Accept a picked file into `index`, overwriting it, or the lowest empty slot.
    pub fn upload_into(
        &mut self,
        index: Option<SlotIndex>,
        file: UploadedFile,
    ) -> PhotocardResult<UploadOutcome> {
        let source = match accept_upload(file) {
            Ok(source) => source,
            Err(PhotocardError::UnsupportedFileType(msg)) => {
                tracing::debug!(%msg, "upload ignored");
                return Ok(UploadOutcome::Ignored);
            }
            Err(e) => return Err(e),
        };
        let outcome = self.machine.fill(index, source, AcquisitionPath::Upload)?;
        self.slots_changed();
        let slot = outcome
            .slot
            .ok_or_else(|| PhotocardError::validation("upload did not land in a slot"))?;
        Ok(UploadOutcome::Filled {
            slot,
            signal: outcome.signal,
        })
    }

    // Camera path

    pub fn start_camera(&mut self) -> Option<DeviceSignal> {
        self.machine.start_acquisition()
    }

    pub fn stop_camera(&mut self) -> Option<DeviceSignal> {
        self.machine.stop_acquisition()
    }

    /// Store a frame in the current capture target.
    pub fn camera_frame(&mut self, frame: &CapturedFrame) -> PhotocardResult<FillOutcome> {
        let source = ImageSource::from_camera_frame(frame)?;
        let outcome = self.machine.fill(None, source, AcquisitionPath::Camera)?;
        if outcome.slot.is_some() {
            self.slots_changed();
        }
        Ok(outcome)
    }

    /// Empty `index` and aim the camera at it.
    pub fn retake(&mut self, index: SlotIndex) -> Option<DeviceSignal> {
        let signal = self.machine.clear(index);
        self.slots_changed();
        signal
    }

    /// Apply a device signal to `driver`. A refused open puts the machine back to idle.
    pub fn drive<D: CaptureDevice>(
        &mut self,
        driver: &mut DeviceDriver<D>,
        signal: Option<DeviceSignal>,
    ) -> PhotocardResult<()> {
        if let Err(e) = driver.apply_opt(signal) {
            self.machine.acquisition_failed();
            return Err(e);
        }
        Ok(())
    }

    /// Grab one frame from an active driver, store it, and forward the resulting signal.
    pub fn capture_with<D: CaptureDevice>(
        &mut self,
        driver: &mut DeviceDriver<D>,
    ) -> PhotocardResult<FillOutcome> {
        let frame = driver.grab_frame()?;
        let outcome = self.camera_frame(&frame)?;
        self.drive(driver, outcome.signal)?;
        Ok(outcome)
    }

    /// Empty every slot, forget the template and stop the device.
    pub fn reset(&mut self) -> Option<DeviceSignal> {
        let signal = self.machine.reset();
        self.template = None;
        self.slots_changed();
        tracing::debug!("session reset");
        signal
    }

    // Composition

    /// Choose the template for the next render. Only available once every slot is filled.
    pub fn select_template(&mut self, id: &str) -> PhotocardResult<()> {
        if !self.machine.is_complete() {
            return Err(PhotocardError::validation(
                "templates can be selected once all photos are taken",
            ));
        }
        let template = self.registry.get(id)?;
        tracing::debug!(template = template.id(), "template selected");
        self.template = Some(template);
        self.targets.invalidate();
        Ok(())
    }

    /// Snapshot the complete slot set for decoding.
    pub fn begin_decode(&self) -> PhotocardResult<DecodeJob> {
        let sources = self
            .machine
            .slots()
            .sources()
            .ok_or_else(|| PhotocardError::validation("decode requires all slots to be filled"))?;
        Ok(DecodeJob {
            sources,
            revision: self.machine.slots().revision(),
            filter: self.config.post_filter,
        })
    }

    /// Install a finished decode unless the slots changed since its job was taken.
    pub fn complete_decode(&mut self, done: DecodeCompletion) -> PhotocardResult<DecodeOutcome> {
        let current = self.machine.slots().revision();
        if done.revision != current {
            tracing::debug!(job = done.revision, current, "stale decode discarded");
            return Ok(DecodeOutcome::Stale);
        }
        let images = done.result?;
        self.decoded = Some(Decoded {
            images: decode::with_revision(images, done.revision),
            sources: done.sources,
        });
        Ok(DecodeOutcome::Applied)
    }

    /// Decoded photos for the current slots, if any.
    pub fn decoded(&self) -> Option<&DecodedImageSet> {
        self.current_decode().map(|d| &d.images)
    }

    /// Paint the selected template onto both targets from the current decode.
    pub fn render(&mut self) -> PhotocardResult<()> {
        let template = self
            .template
            .clone()
            .ok_or_else(|| PhotocardError::validation("no template selected"))?;
        let revision = self.machine.slots().revision();
        let decoded = match self.decoded.as_ref() {
            Some(d) if d.images.revision() == revision => d,
            _ => return Err(PhotocardError::validation("photos are not decoded")),
        };

        let decor_seed = self
            .config
            .decor_seed
            .unwrap_or_else(|| DecorRng::unseeded().next_u64());
        let input = TemplateInput {
            images: &decoded.images,
            sources: &decoded.sources,
            caption: &self.caption,
            decor_seed,
        };
        let RenderTargets { preview, export } = &mut self.targets;
        let mut targets: [&mut dyn RenderTarget; 2] = [preview, export];
        render_all(template.as_ref(), &input, &mut targets, &mut self.typesetter)
    }

    /// Decode if needed, then render.
    pub fn compose(&mut self) -> PhotocardResult<()> {
        if self.current_decode().is_none() {
            let done = self.begin_decode()?.run();
            if self.complete_decode(done)? == DecodeOutcome::Stale {
                return Err(PhotocardError::validation("slots changed during decode"));
            }
        }
        self.render()
    }

    /// True when `target` shows the current slots with the selected template.
    pub fn is_target_valid(&self, target: &dyn RenderTarget) -> bool {
        match (self.current_stamp(), target.last_stamp()) {
            (Some(want), Some(have)) => want == *have,
            _ => false,
        }
    }

    /// Encode the export target, stamped with the current time.
    pub fn export_file(&self) -> PhotocardResult<ExportFile> {
        self.export_file_at(chrono::Utc::now())
    }

    pub fn export_file_at(&self, now: chrono::DateTime<chrono::Utc>) -> PhotocardResult<ExportFile> {
        if !self.is_target_valid(&self.targets.export) {
            return Err(PhotocardError::validation(
                "nothing to export: compose the current photos first",
            ));
        }
        export_surface(&self.targets.export, &self.config.export_prefix, now)
    }

    #[tracing::instrument(skip_all)]
    pub fn export(&self, sink: &mut dyn ExportSink) -> PhotocardResult<()> {
        let file = self.export_file()?;
        sink.save(file)
    }

    fn current_decode(&self) -> Option<&Decoded> {
        let revision = self.machine.slots().revision();
        self.decoded
            .as_ref()
            .filter(|d| d.images.revision() == revision)
    }

    fn current_stamp(&self) -> Option<RenderStamp> {
        let template = self.template.as_ref()?;
        Some(RenderStamp {
            revision: self.machine.slots().revision(),
            template_id: template.id().to_string(),
        })
    }

    fn slots_changed(&mut self) {
        if self.current_decode().is_none() {
            self.decoded = None;
        }
        self.targets.invalidate();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/booth.rs"]
mod tests;
