#![forbid(unsafe_code)]

//! Panel registry.
//!
//! The terminal analog of the original's DOM surfaces: per tab one
//! uniquely addressable container area with an active marker, plus the
//! landing/content surface visibility flags. The app recomputes areas on
//! resize; the router toggles markers during transitions.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::geometry::Rect;
use folio_core::state::TabId;

/// One tab's screen region.
#[derive(Debug, Clone, Copy)]
pub struct Panel {
    pub tab: TabId,
    pub area: Rect,
    /// Visual active marker, toggled by the router.
    pub active: bool,
}

/// All registered panels plus surface visibility.
#[derive(Debug)]
pub struct Panels {
    panels: Vec<Panel>,
    /// Area of the landing surface.
    pub landing_area: Rect,
    /// Whether the landing surface is displayed at all.
    pub landing_visible: bool,
    /// Whether the landing surface is mid fade-out.
    pub landing_fading: bool,
    /// Whether the content surface is displayed.
    pub content_visible: bool,
}

/// Shared handle used by the app, router, and landing orchestrator.
pub type SharedPanels = Rc<RefCell<Panels>>;

impl Panels {
    pub fn new() -> Self {
        Self {
            panels: Vec::new(),
            landing_area: Rect::default(),
            landing_visible: true,
            landing_fading: false,
            content_visible: false,
        }
    }

    pub fn shared() -> SharedPanels {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Register a tab's panel. Registered once at startup; re-registration
    /// replaces the area but keeps the marker state.
    pub fn register(&mut self, tab: TabId, area: Rect) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.tab == tab) {
            panel.area = area;
        } else {
            self.panels.push(Panel {
                tab,
                area,
                active: false,
            });
        }
    }

    pub fn get(&self, tab: TabId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.tab == tab)
    }

    /// Container area for a tab, `None` when no panel is registered.
    pub fn area_of(&self, tab: TabId) -> Option<Rect> {
        self.get(tab).map(|p| p.area)
    }

    /// Update a panel's area after a resize.
    pub fn set_area(&mut self, tab: TabId, area: Rect) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.tab == tab) {
            panel.area = area;
        }
    }

    /// The currently marked panel.
    pub fn active(&self) -> Option<TabId> {
        self.panels.iter().find(|p| p.active).map(|p| p.tab)
    }

    /// Clear every active marker (exit-animation start).
    pub fn deactivate_all(&mut self) {
        for panel in &mut self.panels {
            panel.active = false;
        }
    }

    /// Mark one panel active, clearing the rest.
    pub fn activate(&mut self, tab: TabId) {
        for panel in &mut self.panels {
            panel.active = panel.tab == tab;
        }
    }

    /// Mark the landing surface as fading out.
    pub fn begin_landing_fade(&mut self) {
        self.landing_fading = true;
    }

    /// Hide the landing surface and reveal the content surface.
    pub fn show_content(&mut self) {
        self.landing_visible = false;
        self.landing_fading = false;
        self.content_visible = true;
    }
}

impl Default for Panels {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_landing() {
        let panels = Panels::new();
        assert!(panels.landing_visible);
        assert!(!panels.content_visible);
        assert!(!panels.landing_fading);
        assert_eq!(panels.active(), None);
    }

    #[test]
    fn register_and_lookup() {
        let mut panels = Panels::new();
        panels.register(TabId::Work, Rect::new(0, 2, 80, 20));
        assert_eq!(panels.area_of(TabId::Work), Some(Rect::new(0, 2, 80, 20)));
        assert_eq!(panels.area_of(TabId::Fun), None);
    }

    #[test]
    fn reregistration_updates_area_keeps_marker() {
        let mut panels = Panels::new();
        panels.register(TabId::Work, Rect::new(0, 0, 10, 10));
        panels.activate(TabId::Work);
        panels.register(TabId::Work, Rect::new(0, 0, 20, 20));
        assert_eq!(panels.active(), Some(TabId::Work));
        assert_eq!(panels.area_of(TabId::Work), Some(Rect::new(0, 0, 20, 20)));
    }

    #[test]
    fn activate_is_exclusive() {
        let mut panels = Panels::new();
        panels.register(TabId::Work, Rect::default());
        panels.register(TabId::Writing, Rect::default());
        panels.activate(TabId::Work);
        panels.activate(TabId::Writing);
        assert_eq!(panels.active(), Some(TabId::Writing));
        assert!(!panels.get(TabId::Work).unwrap().active);

        panels.deactivate_all();
        assert_eq!(panels.active(), None);
    }

    #[test]
    fn fade_then_show_content() {
        let mut panels = Panels::new();
        panels.begin_landing_fade();
        assert!(panels.landing_fading);
        assert!(panels.landing_visible);

        panels.show_content();
        assert!(!panels.landing_visible);
        assert!(!panels.landing_fading);
        assert!(panels.content_visible);
    }
}
