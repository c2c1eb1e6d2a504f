//! Animatable entities.
//!
//! An [`Animatable`] is the property table a geometry composes. Each shape
//! type declares its properties once in a static [`PropertySchema`]; the
//! table stores one [`MotionProperty`] per schema slot, so lookups by slot are
//! plain indexing and lookups by name go through the schema.

use super::descriptor::Animation;
use super::property::MotionProperty;
use super::transform::DecomposedTransform;
use super::value::{Color, MotionValue, Point, Size};
use crate::error::{MotionError, Result};
use crate::time::TimeMs;

/// Property names registered by one entity type, in slot order.
#[derive(Debug, PartialEq, Eq)]
pub struct PropertySchema {
    /// Entity type name, used in error messages.
    pub entity: &'static str,
    pub names: &'static [&'static str],
}

impl PropertySchema {
    pub const fn new(entity: &'static str, names: &'static [&'static str]) -> Self {
        Self { entity, names }
    }

    /// Slot of the property called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Which properties a transition call applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionTarget<'a> {
    /// Every registered property.
    #[default]
    All,
    /// The listed properties. An empty list means all of them.
    Named(&'a [&'a str]),
}

/// Lifecycle of an entity at its current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatableState {
    /// No property has an animation attached.
    Idle,
    /// At least one property is still interpolating.
    Animating,
    /// Every property has reached its target.
    Settled,
}

/// Property table shared by every geometry.
#[derive(Debug, Clone)]
pub struct Animatable {
    schema: &'static PropertySchema,
    properties: Vec<MotionProperty<MotionValue>>,
    current_time: TimeMs,
    is_valid: bool,
    remove_on_completed: bool,
}

impl Animatable {
    /// Create a table with one initial value per schema slot.
    ///
    /// # Panics
    /// Panics if the number of values differs from the schema.
    pub fn new(schema: &'static PropertySchema, initial: Vec<MotionValue>) -> Self {
        assert_eq!(
            initial.len(),
            schema.len(),
            "{} expects {} property values",
            schema.entity,
            schema.len()
        );
        Self {
            schema,
            properties: initial.into_iter().map(MotionProperty::new).collect(),
            current_time: 0,
            is_valid: true,
            remove_on_completed: false,
        }
    }

    pub fn schema(&self) -> &'static PropertySchema {
        self.schema
    }

    pub fn current_time(&self) -> TimeMs {
        self.current_time
    }

    /// Validity as of the current time.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn remove_on_completed(&self) -> bool {
        self.remove_on_completed
    }

    /// Request eviction once every transition has finished.
    pub fn set_remove_on_completed(&mut self, remove: bool) {
        self.remove_on_completed = remove;
    }

    pub fn state(&self) -> AnimatableState {
        if !self.properties.iter().any(MotionProperty::is_animated) {
            AnimatableState::Idle
        } else if self.is_valid {
            AnimatableState::Settled
        } else {
            AnimatableState::Animating
        }
    }

    /// Whether the entity may be evicted by its canvas.
    pub fn is_removable(&self) -> bool {
        self.remove_on_completed && self.is_valid
    }

    /// Move the entity to `now` and return its validity.
    pub fn advance(&mut self, now: TimeMs) -> bool {
        self.current_time = now;
        for property in &mut self.properties {
            property.get_value(now);
        }
        self.refresh_validity();
        self.is_valid
    }

    fn refresh_validity(&mut self) {
        let now = self.current_time;
        self.is_valid = self.properties.iter().all(|p| p.is_completed_at(now));
    }

    fn resolve(&self, target: TransitionTarget<'_>) -> Result<Vec<usize>> {
        match target {
            TransitionTarget::Named(names) if !names.is_empty() => names
                .iter()
                .map(|name| {
                    self.schema
                        .index_of(name)
                        .ok_or_else(|| MotionError::UnknownProperty {
                            entity: self.schema.entity,
                            property: (*name).to_string(),
                        })
                })
                .collect(),
            _ => Ok((0..self.properties.len()).collect()),
        }
    }

    /// Attach `animation` to the targeted properties.
    ///
    /// Fails without touching any property if a name is not registered.
    pub fn set_transition(
        &mut self,
        animation: Animation,
        target: TransitionTarget<'_>,
    ) -> Result<()> {
        for slot in self.resolve(target)? {
            self.properties[slot].set_animation(Some(animation));
        }
        self.refresh_validity();
        Ok(())
    }

    /// Attach `animation` to every property.
    pub fn set_transition_all(&mut self, animation: Animation) {
        for property in &mut self.properties {
            property.set_animation(Some(animation));
        }
        self.refresh_validity();
    }

    /// Detach animations so later value changes apply immediately.
    pub fn remove_transition(&mut self, target: TransitionTarget<'_>) -> Result<()> {
        for slot in self.resolve(target)? {
            self.properties[slot].set_animation(None);
        }
        self.refresh_validity();
        Ok(())
    }

    /// Jump the targeted properties to their targets.
    pub fn complete_transition(&mut self, target: TransitionTarget<'_>) -> Result<()> {
        for slot in self.resolve(target)? {
            self.properties[slot].complete_transition();
        }
        self.refresh_validity();
        Ok(())
    }

    /// Jump every property to its target.
    pub fn complete_all(&mut self) {
        for property in &mut self.properties {
            property.complete_transition();
        }
        self.is_valid = true;
    }

    /// Retarget the property in `slot`. The transition starts at the next
    /// [`advance`](Self::advance), so time spent idle between frames does
    /// not count towards it.
    pub fn set_value(&mut self, slot: usize, value: impl Into<MotionValue>) {
        self.properties[slot].set_target(value.into());
        self.refresh_validity();
    }

    /// Retarget the property in `slot` at an explicit time.
    pub fn set_value_at(&mut self, slot: usize, value: impl Into<MotionValue>, now: TimeMs) {
        self.properties[slot].set_value(value.into(), now);
        self.refresh_validity();
    }

    /// Retarget a property by name.
    pub fn set_named(&mut self, name: &str, value: impl Into<MotionValue>) -> Result<()> {
        let slot = self
            .schema
            .index_of(name)
            .ok_or_else(|| MotionError::UnknownProperty {
                entity: self.schema.entity,
                property: name.to_string(),
            })?;
        self.set_value(slot, value);
        Ok(())
    }

    pub fn property(&self, slot: usize) -> &MotionProperty<MotionValue> {
        &self.properties[slot]
    }

    pub fn property_named(&self, name: &str) -> Option<&MotionProperty<MotionValue>> {
        self.schema.index_of(name).map(|slot| &self.properties[slot])
    }

    /// Value of `slot` at the current time.
    pub fn value(&self, slot: usize) -> MotionValue {
        self.properties[slot].value_at(self.current_time)
    }

    pub fn scalar(&self, slot: usize) -> f64 {
        self.value(slot).as_scalar().unwrap_or_default()
    }

    pub fn color(&self, slot: usize) -> Color {
        self.value(slot).as_color().unwrap_or_default()
    }

    pub fn point(&self, slot: usize) -> Point {
        self.value(slot).as_point().unwrap_or_default()
    }

    pub fn size(&self, slot: usize) -> Size {
        self.value(slot).as_size().unwrap_or_default()
    }

    pub fn transform(&self, slot: usize) -> DecomposedTransform {
        self.value(slot).as_transform().unwrap_or_default()
    }
}
