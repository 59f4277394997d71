//! Gesture catalog - ordered, immutable gesture definitions
//!
//! Order is part of the contract: when two entries score the same, the
//! one defined first wins.

use std::collections::HashSet;

use crate::{FingerStates, GestureError, GestureResult, ThumbDirection};

/// Non-pattern rule attached to a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialTag {
    /// Thumb tip touching the index tip
    Pinch,
}

/// One recognizable gesture.
///
/// Exactly one of `fingers` / `special` is set in a catalog-accepted
/// definition; `thumb` only refines a finger pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureDefinition {
    id: String,
    name: String,
    text: String,
    fingers: Option<FingerStates>,
    thumb: Option<ThumbDirection>,
    special: Option<SpecialTag>,
}

impl GestureDefinition {
    /// A definition with no matching rule yet
    pub fn new(id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            text: text.into(),
            fingers: None,
            thumb: None,
            special: None,
        }
    }

    /// Gesture matched by a finger-extension pattern
    pub fn pattern(
        id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
        fingers: FingerStates,
    ) -> Self {
        Self::new(id, name, text).with_fingers(fingers)
    }

    /// Gesture matched by a special rule
    pub fn special(
        id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
        tag: SpecialTag,
    ) -> Self {
        Self::new(id, name, text).with_special(tag)
    }

    /// Require a thumb direction on top of the finger pattern
    pub fn with_thumb(mut self, direction: ThumbDirection) -> Self {
        self.thumb = Some(direction);
        self
    }

    pub fn with_fingers(mut self, fingers: FingerStates) -> Self {
        self.fingers = Some(fingers);
        self
    }

    pub fn with_special(mut self, tag: SpecialTag) -> Self {
        self.special = Some(tag);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fingers(&self) -> Option<&FingerStates> {
        self.fingers.as_ref()
    }

    pub fn thumb(&self) -> Option<ThumbDirection> {
        self.thumb
    }

    pub fn special_tag(&self) -> Option<SpecialTag> {
        self.special
    }

    fn validate(&self) -> GestureResult<()> {
        match (self.fingers.is_some(), self.special.is_some()) {
            (true, true) => Err(GestureError::AmbiguousDefinition(self.id.clone())),
            (false, false) => Err(GestureError::EmptyDefinition(self.id.clone())),
            _ => Ok(()),
        }
    }
}

/// Ordered gesture table, read-only after construction
#[derive(Debug, Clone)]
pub struct GestureCatalog {
    entries: Vec<GestureDefinition>,
}

impl GestureCatalog {
    /// Build a catalog, checking every definition once
    pub fn from_definitions(entries: Vec<GestureDefinition>) -> GestureResult<Self> {
        if entries.is_empty() {
            return Err(GestureError::EmptyCatalog);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for def in &entries {
            def.validate()?;
            if !seen.insert(def.id.as_str()) {
                return Err(GestureError::DuplicateGesture(def.id.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The ten built-in gestures
    pub fn builtin() -> Self {
        use ThumbDirection::Up;

        let entries = vec![
            GestureDefinition::pattern("open_hand", "Mano abierta", "Hola", [true; 5]),
            GestureDefinition::pattern("fist", "Puño", "", [false; 5]),
            GestureDefinition::pattern(
                "thumbs_up",
                "Pulgar arriba",
                "Bien / De acuerdo",
                [true, false, false, false, false],
            )
            .with_thumb(Up),
            GestureDefinition::pattern(
                "pointing",
                "Señalar",
                "Esto",
                [false, true, false, false, false],
            ),
            GestureDefinition::pattern("peace", "Paz", "2", [false, true, true, false, false]),
            GestureDefinition::pattern("three", "Tres", "3", [true, true, true, false, false]),
            GestureDefinition::pattern("four", "Cuatro", "4", [false, true, true, true, true]),
            GestureDefinition::pattern("five", "Cinco", "5", [true; 5]),
            GestureDefinition::special("ok", "OK", "OK / Perfecto", SpecialTag::Pinch),
            GestureDefinition::pattern(
                "phone",
                "Teléfono",
                "Llamame",
                [true, false, false, false, true],
            ),
        ];

        tracing::debug!(entries = entries.len(), "built-in gesture catalog loaded");
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&GestureDefinition> {
        self.entries.iter().find(|def| def.id == id)
    }

    /// Iterate in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &GestureDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GestureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
