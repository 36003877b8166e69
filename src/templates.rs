use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use crate::assets::decode::DecodedImageSet;
use crate::assets::source::ImageSource;
use crate::foundation::core::SLOT_COUNT;
use crate::foundation::error::{PhotocardError, PhotocardResult};
use crate::foundation::math::DecorRng;
use crate::render::painter::Painter;

pub mod beach;
pub mod dream;
pub(crate) mod motifs;
pub mod polaroid;

/// Footer text shared by all templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caption {
    pub event: String,
    pub location: String,
    /// Already formatted for display.
    pub date: String,
}

/// Everything a template may read while painting.
pub struct TemplateInput<'a> {
    pub images: &'a DecodedImageSet,
    /// Encoded payloads the images were decoded from, in slot order.
    pub sources: &'a [ImageSource; SLOT_COUNT],
    pub caption: &'a Caption,
    /// Seed for scattered decorations. Every target of one render pass sees the same seed.
    pub decor_seed: u64,
}

impl TemplateInput<'_> {
    pub fn decor_rng(&self) -> DecorRng {
        DecorRng::seeded(self.decor_seed)
    }
}

/// A named layout that paints the full composition, photos included.
///
/// Implementations hold no mutable state; the same input always produces the same pixels,
/// apart from what they draw from [`TemplateInput::decor_rng`].
pub trait Template: Send + Sync {
    /// Stable identifier used for selection.
    fn id(&self) -> &str;
    /// Human-readable name.
    fn name(&self) -> &str;
    fn paint(&self, painter: &mut Painter<'_>, input: &TemplateInput<'_>) -> PhotocardResult<()>;
}

/// Id-keyed set of templates. Iteration is in id order, whatever the registration order.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    entries: BTreeMap<String, Arc<dyn Template>>,
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.keys())
            .finish()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `classic`, `polaroid` and `gradient`.
    pub fn builtin() -> Self {
        let builtin: [Arc<dyn Template>; 3] = [
            Arc::new(beach::BeachVibes),
            Arc::new(polaroid::PolaroidStyle),
            Arc::new(dream::GradientDream),
        ];
        Self {
            entries: builtin
                .into_iter()
                .map(|t| (t.id().to_string(), t))
                .collect(),
        }
    }

    pub fn register(&mut self, template: Arc<dyn Template>) -> PhotocardResult<()> {
        match self.entries.entry(template.id().to_string()) {
            Entry::Occupied(e) => Err(PhotocardError::validation(format!(
                "template id '{}' is already registered",
                e.key()
            ))),
            Entry::Vacant(e) => {
                e.insert(template);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &str) -> PhotocardResult<Arc<dyn Template>> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| PhotocardError::UnknownTemplate(id.to_string()))
    }

    /// Templates in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Template>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
