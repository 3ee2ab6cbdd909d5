//! Volatile run-time configuration edited through the menu.

use crate::colors::LedColor;
use crate::types::{Category, Effect};

/// The option selected in each category, with per-category bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    active_category: Category,
    options: [u8; Category::COUNT],
    bounds: [u8; Category::COUNT],
}

impl Configuration {
    /// Creates a configuration with every option at zero.
    ///
    /// `duration_bound` is the number of countdown units available. Bounds of
    /// zero are raised to one so every category keeps a valid option.
    pub fn new(duration_bound: u8) -> Self {
        Self {
            active_category: Category::Duration,
            options: [0; Category::COUNT],
            bounds: [duration_bound.max(1), Effect::COUNT, LedColor::SELECTABLE],
        }
    }

    /// Category currently being edited.
    pub fn active_category(&self) -> Category {
        self.active_category
    }

    /// Moves the menu to the next category, wrapping after the last one.
    pub fn advance_category(&mut self) {
        self.active_category = self.active_category.next();
    }

    /// Selected option in `category`.
    pub fn option(&self, category: Category) -> u8 {
        self.options[category.index()]
    }

    /// Number of options in `category`.
    pub fn bound(&self, category: Category) -> u8 {
        self.bounds[category.index()]
    }

    /// Selected option of the active category.
    pub fn active_option(&self) -> u8 {
        self.option(self.active_category)
    }

    /// The full option vector, indexed by category.
    pub fn options(&self) -> [u8; Category::COUNT] {
        self.options
    }

    /// Steps the option of `category` forward, wrapping to zero at the bound.
    pub fn advance(&mut self, category: Category) {
        let i = category.index();
        self.options[i] = (self.options[i] + 1) % self.bounds[i];
    }

    /// Sets the option of `category`, clamped to its last valid value.
    pub fn set(&mut self, category: Category, value: u8) {
        let i = category.index();
        self.options[i] = value.min(self.bounds[i] - 1);
    }

    /// Index into the countdown unit table.
    pub fn duration_index(&self) -> usize {
        usize::from(self.option(Category::Duration))
    }

    /// Selected end-of-countdown effect.
    pub fn effect(&self) -> Effect {
        Effect::from_option(self.option(Category::Effect))
    }

    /// Selected countdown color.
    pub fn color(&self) -> LedColor {
        LedColor::from_option(self.option(Category::Color))
    }
}

/// Live configuration plus the shadow copy used to roll back menu edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigModel {
    live: Configuration,
    shadow: Configuration,
}

impl ConfigModel {
    /// Creates a model with every option at zero and an identical shadow.
    pub fn new(duration_bound: u8) -> Self {
        let live = Configuration::new(duration_bound);
        Self { live, shadow: live }
    }

    /// The configuration the render pipeline uses.
    pub fn live(&self) -> &Configuration {
        &self.live
    }

    /// Mutable access to the live configuration, for menu edits.
    pub fn live_mut(&mut self) -> &mut Configuration {
        &mut self.live
    }

    /// The snapshot taken on menu entry.
    pub fn shadow(&self) -> &Configuration {
        &self.shadow
    }

    /// Copies live into shadow.
    pub fn snapshot(&mut self) {
        self.shadow = self.live;
    }

    /// Copies shadow into live, discarding every edit since the snapshot.
    pub fn rollback(&mut self) {
        self.live = self.shadow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_at_bound() {
        let mut config = Configuration::new(4);
        for category in Category::ALL {
            let start = config.option(category);
            for _ in 0..config.bound(category) {
                config.advance(category);
            }
            assert_eq!(config.option(category), start);
        }
    }

    #[test]
    fn set_clamps_to_bound() {
        let mut config = Configuration::new(3);
        config.set(Category::Duration, 3);
        assert_eq!(config.option(Category::Duration), 2);
        config.set(Category::Color, 200);
        assert_eq!(config.color(), LedColor::White);
    }

    #[test]
    fn category_rotation_wraps() {
        let mut config = Configuration::new(4);
        config.advance_category();
        config.advance_category();
        assert_eq!(config.active_category(), Category::Color);
        config.advance_category();
        assert_eq!(config.active_category(), Category::Duration);
    }

    #[test]
    fn rollback_restores_every_category() {
        let mut model = ConfigModel::new(4);
        model.live_mut().set(Category::Effect, 2);
        model.snapshot();

        model.live_mut().advance(Category::Duration);
        model.live_mut().set(Category::Effect, 0);
        model.live_mut().set(Category::Color, 3);
        model.rollback();

        assert_eq!(model.live().options(), [0, 2, 0]);
        assert_eq!(model.live(), model.shadow());
    }
}
