//! Photocard composes three photos into a decorated 1080×1920 photo-strip card.
//!
//! The public API is session-oriented:
//!
//! - Fill three slots from uploads or a camera ([`PhotoboothSession::upload`],
//!   [`PhotoboothSession::capture_with`])
//! - Pick a template from the [`TemplateRegistry`]
//! - Decode and paint the preview and export surfaces ([`PhotoboothSession::compose`])
//! - Hand the PNG to an [`ExportSink`]
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Slot state machine and capture devices.
pub mod capture;
/// Composer configuration.
pub mod config;
/// PNG export and sinks.
pub mod encode;
/// Rasterization, surfaces and render fan-out.
pub mod render;
/// Photobooth session orchestration.
pub mod session;
/// Built-in templates and the registry.
pub mod templates;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Point, Rect, Rgba8, Rgba8Premul, SLOT_COUNT, Vec2,
};
pub use crate::foundation::error::{PhotocardError, PhotocardResult};
pub use crate::foundation::math::DecorRng;

pub use crate::assets::decode::{
    DecodedImage, DecodedImageSet, PostFilter, Raster, decode_all, decode_image, decode_sources,
};
pub use crate::assets::source::{ImageSource, UploadedFile, accept_upload};
pub use crate::capture::device::{CaptureDevice, CapturedFrame, DeviceDriver};
pub use crate::capture::machine::{
    AcquisitionPath, CaptureStateMachine, DeviceSignal, DeviceState, FillOutcome,
};
pub use crate::capture::slots::{PhotoSlotSet, Slot, SlotIndex};
pub use crate::config::ComposerConfig;
pub use crate::encode::png::ExportFile;
pub use crate::encode::sink::{DirSink, ExportSink, InMemorySink};
pub use crate::render::cover::{CoverCrop, cover_crop};
pub use crate::render::surface::{RenderStamp, RenderTarget, RenderTargets, Surface};
pub use crate::session::booth::{
    DecodeCompletion, DecodeJob, DecodeOutcome, PhotoboothSession, UploadOutcome,
};
pub use crate::templates::{Caption, Template, TemplateInput, TemplateRegistry};
