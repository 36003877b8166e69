use crate::capture::machine::DeviceSignal;
use crate::foundation::error::{PhotocardError, PhotocardResult};

/// One straight-alpha RGBA8 frame grabbed from a camera stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

/// Frame source behind the camera path.
pub trait CaptureDevice: Send {
    /// Acquire the device. Errors surface as [`PhotocardError::DeviceAccessDenied`].
    fn open(&mut self) -> anyhow::Result<()>;
    fn grab_frame(&mut self) -> PhotocardResult<CapturedFrame>;
    /// Release the device. Must tolerate being called on an already released device.
    fn close(&mut self);
}

/// An open device. Dropping the stream closes it.
pub struct ActiveStream<D: CaptureDevice> {
    device: Option<D>,
}

impl<D: CaptureDevice> ActiveStream<D> {
    /// Open `device`. On failure the device is handed back with the error.
    pub fn open(mut device: D) -> Result<Self, (D, PhotocardError)> {
        match device.open() {
            Ok(()) => Ok(Self {
                device: Some(device),
            }),
            Err(e) => Err((device, PhotocardError::device_access_denied(format!("{e:#}")))),
        }
    }

    pub fn grab_frame(&mut self) -> PhotocardResult<CapturedFrame> {
        match self.device.as_mut() {
            Some(d) => d.grab_frame(),
            None => Err(PhotocardError::validation("stream already closed")),
        }
    }

    /// Close explicitly and get the idle device back.
    pub fn close(mut self) -> Option<D> {
        let mut device = self.device.take()?;
        device.close();
        Some(device)
    }
}

impl<D: CaptureDevice> Drop for ActiveStream<D> {
    fn drop(&mut self) {
        if let Some(d) = self.device.as_mut() {
            d.close();
        }
    }
}

/// Applies [`DeviceSignal`]s coming out of the capture state machine to a concrete device.
pub struct DeviceDriver<D: CaptureDevice> {
    idle: Option<D>,
    stream: Option<ActiveStream<D>>,
}

impl<D: CaptureDevice> DeviceDriver<D> {
    pub fn new(device: D) -> Self {
        Self {
            idle: Some(device),
            stream: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn apply(&mut self, signal: DeviceSignal) -> PhotocardResult<()> {
        match signal {
            DeviceSignal::Start => self.start(),
            DeviceSignal::Stop => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Apply an optional signal, as returned by most state machine operations.
    pub fn apply_opt(&mut self, signal: Option<DeviceSignal>) -> PhotocardResult<()> {
        match signal {
            Some(s) => self.apply(s),
            None => Ok(()),
        }
    }

    pub fn grab_frame(&mut self) -> PhotocardResult<CapturedFrame> {
        self.stream
            .as_mut()
            .ok_or_else(|| PhotocardError::validation("device is not acquiring"))?
            .grab_frame()
    }

    /// Stop if needed and return the device.
    pub fn into_inner(mut self) -> Option<D> {
        self.stop();
        self.idle.take()
    }

    fn start(&mut self) -> PhotocardResult<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        let device = self
            .idle
            .take()
            .ok_or_else(|| PhotocardError::validation("device was lost after a failed close"))?;
        match ActiveStream::open(device) {
            Ok(stream) => {
                tracing::debug!("capture device opened");
                self.stream = Some(stream);
                Ok(())
            }
            Err((device, err)) => {
                tracing::warn!(error = %err, "capture device refused to open");
                self.idle = Some(device);
                Err(err)
            }
        }
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            self.idle = stream.close();
            tracing::debug!("capture device closed");
        }
    }
}
