#![forbid(unsafe_code)]

//! Tab navigation bar.
//!
//! One button per tab. The bar never mutates state itself: clicks and key
//! presses emit a [`AppEvent::TabChange`] request only when the target
//! differs from the current tab, and the active marker follows
//! [`AppEvent::TabChanged`] confirmations. The freshly activated label
//! plays a scramble-in.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_core::events::{AppEvent, EventBus, EventKind, Subscription};
use folio_core::geometry::Rect;
use folio_core::input::{InputEvent, Key, MouseKind};
use folio_core::state::{StateStore, TabId};
use folio_render::buffer::Buffer;
use folio_render::cell::CellAttrs;
use unicode_width::UnicodeWidthStr;

use crate::scramble::TextScramble;
use crate::theme;

/// Cells of padding inside each button.
const BUTTON_PAD: u16 = 2;
/// Gap between buttons.
const BUTTON_GAP: u16 = 3;

/// Shared nav handle.
pub type SharedTabNav = Rc<RefCell<TabNav>>;

/// The navigation bar.
pub struct TabNav {
    state: Rc<StateStore>,
    bus: EventBus,
    area: Rect,
    buttons: Vec<(TabId, Rect)>,
    scramble: TextScramble,
    scrambling_tab: Option<TabId>,
    subscriptions: Vec<Subscription>,
}

impl TabNav {
    pub fn new(state: Rc<StateStore>, bus: EventBus) -> SharedTabNav {
        Rc::new(RefCell::new(Self {
            state,
            bus,
            area: Rect::default(),
            buttons: Vec::new(),
            scramble: TextScramble::new(97),
            scrambling_tab: None,
            subscriptions: Vec::new(),
        }))
    }

    /// Subscribe to tab-change confirmations.
    pub fn install(this: &SharedTabNav) {
        let bus = this.borrow().bus.clone();
        let weak: Weak<RefCell<TabNav>> = Rc::downgrade(this);
        let sub = bus.on(EventKind::TabChanged, move |event| {
            if let AppEvent::TabChanged { tab } = event {
                if let Some(nav) = weak.upgrade() {
                    if let Ok(mut nav) = nav.try_borrow_mut() {
                        nav.on_tab_changed(*tab);
                    }
                }
            }
        });
        this.borrow_mut().subscriptions.push(sub);
    }

    fn on_tab_changed(&mut self, tab: TabId) {
        self.scramble.set_text("", tab.label());
        self.scrambling_tab = Some(tab);
    }

    /// Compute button rectangles for a bar area, centered.
    pub fn layout(&mut self, area: Rect) {
        self.area = area;
        let widths: Vec<u16> = TabId::ALL
            .iter()
            .map(|tab| tab.label().width() as u16 + BUTTON_PAD * 2)
            .collect();
        let total: u16 = widths.iter().sum::<u16>() + BUTTON_GAP * (widths.len() as u16 - 1);
        let mut x = area.x + area.width.saturating_sub(total) / 2;

        self.buttons = TabId::ALL
            .iter()
            .zip(widths)
            .map(|(tab, width)| {
                let rect = Rect::new(x, area.y, width, 1);
                x += width + BUTTON_GAP;
                (*tab, rect)
            })
            .collect();
    }

    /// Advance the scramble-in, if one is playing.
    pub fn tick(&mut self) {
        if self.scrambling_tab.is_some() && self.scramble.tick() {
            self.scrambling_tab = None;
        }
    }

    pub fn draw(&self, buf: &mut Buffer) {
        let current = self.state.get().tab;
        for (tab, rect) in &self.buttons {
            let active = *tab == current;
            let label_x = rect.x + BUTTON_PAD;

            if active && self.scrambling_tab == Some(*tab) {
                let mut x = label_x;
                for glyph in self.scramble.output() {
                    let color = if glyph.scrambling {
                        theme::ACCENT
                    } else {
                        theme::FG
                    };
                    let mut s = [0u8; 4];
                    x = buf.print_text_clipped(
                        x,
                        rect.y,
                        glyph.ch.encode_utf8(&mut s),
                        color,
                        CellAttrs::BOLD,
                        rect.right(),
                    );
                }
            } else {
                let (color, attrs) = if active {
                    (theme::FG, CellAttrs::BOLD | CellAttrs::UNDERLINE)
                } else {
                    (theme::DIM, CellAttrs::empty())
                };
                buf.print_text_clipped(label_x, rect.y, tab.label(), color, attrs, rect.right());
            }

            if active {
                buf.print_text_clipped(
                    rect.x,
                    rect.y,
                    "[",
                    theme::ACCENT,
                    CellAttrs::empty(),
                    rect.right(),
                );
                buf.print_text_clipped(
                    rect.right().saturating_sub(1),
                    rect.y,
                    "]",
                    theme::ACCENT,
                    CellAttrs::empty(),
                    rect.right(),
                );
            }
        }
    }

    /// Emit a navigation request when the target differs from the current
    /// tab.
    fn request(&self, to: TabId) {
        let from = self.state.get().tab;
        if to != from {
            self.bus.emit(AppEvent::TabChange { from, to });
        }
    }

    pub fn input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key(Key::Tab) => self.request(self.state.get().tab.next()),
            InputEvent::Key(Key::BackTab) => self.request(self.state.get().tab.prev()),
            InputEvent::Key(Key::Char(c)) => {
                let target = match c {
                    '1' => Some(TabId::Work),
                    '2' => Some(TabId::Writing),
                    '3' => Some(TabId::Fun),
                    _ => None,
                };
                if let Some(tab) = target {
                    self.request(tab);
                }
            }
            InputEvent::Mouse(mouse) if mouse.kind == MouseKind::Down(folio_core::input::MouseButton::Left) => {
                if let Some((tab, _)) = self
                    .buttons
                    .iter()
                    .find(|(_, rect)| rect.contains(mouse.x, mouse.y))
                {
                    self.request(*tab);
                }
            }
            _ => {}
        }
    }
}
