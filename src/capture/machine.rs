use crate::assets::source::ImageSource;
use crate::capture::slots::{PhotoSlotSet, SlotIndex};
use crate::foundation::error::{PhotocardError, PhotocardResult};

/// Where a payload came from. The two paths differ only when every slot is already filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquisitionPath {
    Camera,
    Upload,
}

/// Instruction for the device adapter. The state machine reports these, it never drives hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceSignal {
    Start,
    Stop,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceState {
    #[default]
    Idle,
    Acquiring,
}

/// Result of a successful [`CaptureStateMachine::fill`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillOutcome {
    /// Slot that received the payload; `None` when a camera frame arrived with nothing to fill.
    pub slot: Option<SlotIndex>,
    pub signal: Option<DeviceSignal>,
}

/// Owns the photo slots and the active capture target.
#[derive(Clone, Debug, Default)]
pub struct CaptureStateMachine {
    slots: PhotoSlotSet,
    active: Option<SlotIndex>,
    device: DeviceState,
}

impl CaptureStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &PhotoSlotSet {
        &self.slots
    }

    pub fn device_state(&self) -> DeviceState {
        self.device
    }

    pub fn is_complete(&self) -> bool {
        self.slots.is_complete()
    }

    /// The slot the next payload goes to: the active index while acquiring, otherwise the
    /// lowest empty slot.
    pub fn current_target(&self) -> Option<SlotIndex> {
        match self.device {
            DeviceState::Acquiring => self.active.or_else(|| self.slots.first_empty()),
            DeviceState::Idle => self.slots.first_empty(),
        }
    }

    /// Begin acquisition at the lowest empty slot. Nothing to do when complete or already running.
    pub fn start_acquisition(&mut self) -> Option<DeviceSignal> {
        if self.device == DeviceState::Acquiring {
            return None;
        }
        let target = self.slots.first_empty()?;
        self.active = Some(target);
        self.device = DeviceState::Acquiring;
        tracing::debug!(%target, "acquisition started");
        Some(DeviceSignal::Start)
    }

    pub fn stop_acquisition(&mut self) -> Option<DeviceSignal> {
        if self.device == DeviceState::Idle {
            return None;
        }
        self.device = DeviceState::Idle;
        self.active = None;
        tracing::debug!("acquisition stopped");
        Some(DeviceSignal::Stop)
    }

    /// The device refused to open. Back to idle; retrying is up to the user.
    pub fn acquisition_failed(&mut self) {
        self.device = DeviceState::Idle;
        self.active = None;
    }

    /// Put a payload into a slot.
    ///
    /// Without an explicit `index` the machine picks the slot itself. Uploads are refused with
    /// [`PhotocardError::SlotsFull`] once every slot is filled; camera frames in that state are
    /// dropped and answered with [`DeviceSignal::Stop`]. Camera frames arriving while the device
    /// is idle are dropped without a signal.
    pub fn fill(
        &mut self,
        index: Option<SlotIndex>,
        source: ImageSource,
        path: AcquisitionPath,
    ) -> PhotocardResult<FillOutcome> {
        let target = match path {
            AcquisitionPath::Upload => {
                if self.slots.is_complete() {
                    return Err(PhotocardError::SlotsFull);
                }
                index.or_else(|| self.slots.first_empty())
            }
            AcquisitionPath::Camera => {
                if self.device == DeviceState::Idle && !self.slots.is_complete() {
                    tracing::debug!("camera frame while idle dropped");
                    return Ok(FillOutcome {
                        slot: None,
                        signal: None,
                    });
                }
                index
                    .or(self.active)
                    .or_else(|| self.slots.first_empty())
            }
        };

        let Some(target) = target else {
            self.device = DeviceState::Idle;
            self.active = None;
            return Ok(FillOutcome {
                slot: None,
                signal: Some(DeviceSignal::Stop),
            });
        };

        self.slots.fill(target, source);
        tracing::debug!(%target, ?path, revision = self.slots.revision(), "slot filled");
        let signal = self.retarget();
        Ok(FillOutcome {
            slot: Some(target),
            signal,
        })
    }

    /// Retake: empty the slot and aim the device at it.
    pub fn clear(&mut self, index: SlotIndex) -> Option<DeviceSignal> {
        self.slots.clear(index);
        self.active = Some(index);
        tracing::debug!(%index, revision = self.slots.revision(), "slot cleared");
        match self.device {
            DeviceState::Acquiring => None,
            DeviceState::Idle => {
                self.device = DeviceState::Acquiring;
                Some(DeviceSignal::Start)
            }
        }
    }

    /// Empty every slot and stop the device.
    pub fn reset(&mut self) -> Option<DeviceSignal> {
        self.slots.clear_all();
        self.stop_acquisition()
    }

    fn retarget(&mut self) -> Option<DeviceSignal> {
        match self.slots.first_empty() {
            Some(next) => {
                if self.device == DeviceState::Acquiring {
                    self.active = Some(next);
                }
                None
            }
            None => {
                self.active = None;
                self.stop_acquisition()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/machine.rs"]
mod tests;
