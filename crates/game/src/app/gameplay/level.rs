use engine::{Vec2, Vec3};
use serde::Deserialize;

use super::rect::Rectangle;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlatformDesc {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LevelElement {
    pub(crate) rect: Rectangle,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Level {
    elements: Vec<LevelElement>,
}

impl Level {
    pub(crate) fn from_platforms(platforms: &[PlatformDesc]) -> Self {
        let elements = platforms
            .iter()
            .map(|platform| LevelElement {
                rect: Rectangle::new(platform.x, platform.y, platform.width, platform.height),
            })
            .collect();
        Self { elements }
    }

    pub(crate) fn elements(&self) -> &[LevelElement] {
        &self.elements
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Snaps `position` onto the top edge of every element containing it, in order.
    /// Later elements test the already-snapped position. Returns whether any snap
    /// happened.
    pub(crate) fn snap_to_ground(&self, position: &mut Vec3) -> bool {
        let mut snapped = false;
        for element in &self.elements {
            if element.rect.contains(Vec2::new(position.x, position.y)) {
                position.y = element.rect.top();
                snapped = true;
            }
        }
        snapped
    }
}
