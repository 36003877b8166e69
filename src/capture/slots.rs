use crate::assets::source::ImageSource;
use crate::foundation::core::SLOT_COUNT;
use crate::foundation::error::{PhotocardError, PhotocardResult};

/// Index of one of the fixed photo slots ("Foto 1/2/3" are indices 0, 1, 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub const ALL: [Self; SLOT_COUNT] = [Self(0), Self(1), Self(2)];

    pub fn new(i: usize) -> PhotocardResult<Self> {
        if i >= SLOT_COUNT {
            return Err(PhotocardError::validation(format!(
                "slot index {i} out of range 0..{SLOT_COUNT}"
            )));
        }
        Ok(Self(i))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Empty,
    Filled(ImageSource),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn source(&self) -> Option<&ImageSource> {
        match self {
            Self::Empty => None,
            Self::Filled(src) => Some(src),
        }
    }
}

/// The canonical photo set: always exactly [`SLOT_COUNT`] slots, in display order.
///
/// Only [`crate::CaptureStateMachine`] mutates it. Every mutation bumps [`Self::revision`], which
/// downstream stages use to recognize results computed from an older set.
#[derive(Clone, Debug, Default)]
pub struct PhotoSlotSet {
    slots: [Slot; SLOT_COUNT],
    revision: u64,
}

impl PhotoSlotSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: SlotIndex) -> &Slot {
        &self.slots[index.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    /// True iff no slot is empty.
    pub fn is_complete(&self) -> bool {
        !self.slots.iter().any(Slot::is_empty)
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Lowest-index empty slot.
    pub fn first_empty(&self) -> Option<SlotIndex> {
        self.slots.iter().position(Slot::is_empty).map(SlotIndex)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Snapshot of all payloads, only when complete.
    pub fn sources(&self) -> Option<[ImageSource; SLOT_COUNT]> {
        let [a, b, c] = &self.slots;
        Some([
            a.source()?.clone(),
            b.source()?.clone(),
            c.source()?.clone(),
        ])
    }

    pub(crate) fn fill(&mut self, index: SlotIndex, source: ImageSource) {
        self.slots[index.0] = Slot::Filled(source);
        self.revision += 1;
    }

    pub(crate) fn clear(&mut self, index: SlotIndex) {
        self.slots[index.0] = Slot::Empty;
        self.revision += 1;
    }

    pub(crate) fn clear_all(&mut self) {
        self.slots = Default::default();
        self.revision += 1;
    }
}
