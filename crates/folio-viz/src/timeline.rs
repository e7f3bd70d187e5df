#![forbid(unsafe_code)]

//! Work timeline.
//!
//! A vertical line down the panel center with entries alternating left and
//! right: positions first, then education under a section label. Entries
//! reveal with a fade the first time they scroll into the viewport; the
//! ongoing position's marker pulses. Clicking an entry opens its link.

use std::time::Duration;

use folio_content::{WorkContent, load};
use folio_core::anim::{Fade, ease_out};
use folio_core::events::AppEvent;
use folio_core::geometry::Rect;
use folio_core::input::{InputEvent, Key, MouseKind};
use folio_core::schedule::FrameHandle;
use folio_core::state::TabId;
use folio_render::buffer::Buffer;
use folio_render::cell::{Cell, CellAttrs, Rgba};
use folio_runtime::{Ctx, TabComponent};

use crate::theme;

/// Rows per entry: marker row, subtitle, dates, description, spacer.
const ENTRY_HEIGHT: u16 = 5;
/// Rows for the education section label.
const SECTION_LABEL_HEIGHT: u16 = 2;
/// Reveal fade length.
const REVEAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Side {
    Left,
    Right,
}

#[derive(Debug)]
struct Entry {
    title: String,
    subtitle: String,
    dates: String,
    description: String,
    url: Option<String>,
    current: bool,
    side: Side,
    /// Starts the education block when set.
    section_label: Option<&'static str>,
    reveal: Option<Fade>,
}

impl Entry {
    fn height(&self) -> u16 {
        ENTRY_HEIGHT + if self.section_label.is_some() {
            SECTION_LABEL_HEIGHT
        } else {
            0
        }
    }
}

/// The work tab component.
pub struct Timeline {
    entries: Vec<Entry>,
    scroll: u16,
    time: f32,
    frames: Option<FrameHandle>,
    hovered: Option<usize>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            scroll: 0,
            time: 0.0,
            frames: None,
            hovered: None,
        }
    }

    fn load_content(&mut self, ctx: &mut Ctx<'_>) {
        let path = ctx.content_dir.join("work.json");
        let work: WorkContent = match load(&path) {
            Ok(work) => {
                ctx.bus.emit(AppEvent::ContentLoaded { tab: TabId::Work });
                work
            }
            Err(err) => {
                tracing::warn!(error = %err, "work content failed, rendering empty");
                ctx.bus.emit(AppEvent::ContentError {
                    tab: TabId::Work,
                    message: err.to_string(),
                });
                WorkContent::default()
            }
        };

        let mut entries = Vec::new();
        for (index, position) in work.positions.iter().enumerate() {
            entries.push(Entry {
                title: position.company.clone(),
                subtitle: position.title.clone(),
                dates: position.dates.clone(),
                description: position.description.clone(),
                url: position.url.clone(),
                current: position.current,
                side: if index % 2 == 0 { Side::Left } else { Side::Right },
                section_label: None,
                reveal: None,
            });
        }
        let offset = work.positions.len();
        for (index, education) in work.education.iter().enumerate() {
            let subtitle = if education.field.is_empty() {
                education.degree.clone()
            } else {
                format!("{} - {}", education.degree, education.field)
            };
            entries.push(Entry {
                title: education.institution.clone(),
                subtitle,
                dates: education.dates.clone(),
                description: String::new(),
                url: education.url.clone(),
                current: false,
                side: if (offset + index) % 2 == 0 {
                    Side::Left
                } else {
                    Side::Right
                },
                section_label: (index == 0).then_some("Education"),
                reveal: None,
            });
        }
        self.entries = entries;
    }

    fn content_height(&self) -> u16 {
        self.entries.iter().map(Entry::height).sum::<u16>() + 2
    }

    fn max_scroll(&self, area: Rect) -> u16 {
        self.content_height().saturating_sub(area.height)
    }

    fn scroll_by(&mut self, delta: i32, area: Rect) {
        let max = self.max_scroll(area) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max) as u16;
    }

    /// Top row of an entry in content space (before scroll).
    fn entry_top(&self, index: usize) -> u16 {
        let mut y = 1;
        for entry in self.entries.iter().take(index) {
            y += entry.height();
        }
        y + self.entries[index].section_label.map_or(0, |_| SECTION_LABEL_HEIGHT)
    }

    /// Entry whose rows cover a viewport row.
    fn entry_at_row(&self, area: Rect, row: u16) -> Option<usize> {
        let content_row = row.checked_sub(area.y)? + self.scroll;
        (0..self.entries.len()).find(|&i| {
            let top = self.entry_top(i);
            content_row >= top && content_row < top + ENTRY_HEIGHT
        })
    }

    fn draw_entry(&self, buf: &mut Buffer, area: Rect, index: usize, center_x: u16) {
        let entry = &self.entries[index];
        let top = self.entry_top(index);
        let alpha = entry.reveal.as_ref().map_or(0.0, Fade::value);
        if alpha <= 0.01 {
            return;
        }
        let hovered = self.hovered == Some(index);

        let scale = |c: Rgba| c.scale(alpha);
        let y0 = (top as i32 - self.scroll as i32) + area.y as i32;

        if let Some(label) = entry.section_label {
            let label_y = y0 - SECTION_LABEL_HEIGHT as i32;
            if label_y >= area.y as i32 && (label_y as u16) < area.bottom() {
                let x = center_x.saturating_sub(label.len() as u16 / 2);
                buf.print_text_clipped(
                    x,
                    label_y as u16,
                    label,
                    theme::DIM,
                    CellAttrs::UNDERLINE,
                    area.right(),
                );
            }
        }

        // Marker on the line.
        if y0 >= area.y as i32 && (y0 as u16) < area.bottom() {
            let marker_color = if entry.current {
                let pulse = 0.65 + 0.35 * (self.time * 2.5).sin();
                theme::ACCENT.scale(pulse * alpha)
            } else {
                scale(theme::MID)
            };
            buf.set(
                center_x,
                y0 as u16,
                Cell::from_char('\u{25CF}').fg(marker_color),
            );
        }

        let title_color = if hovered { theme::ACCENT } else { theme::FG };
        let lines: [(&str, Rgba, CellAttrs); 4] = [
            (&entry.title, scale(title_color), CellAttrs::BOLD),
            (&entry.subtitle, scale(theme::MID), CellAttrs::empty()),
            (&entry.dates, scale(theme::DIM), CellAttrs::empty()),
            (&entry.description, scale(theme::DIM), CellAttrs::empty()),
        ];

        for (offset, (text, color, attrs)) in lines.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let y = y0 + offset as i32;
            if y < area.y as i32 || y as u16 >= area.bottom() {
                continue;
            }
            let max_width = center_x.saturating_sub(area.x.saturating_add(3)) as usize;
            let shown: String = text.chars().take(max_width).collect();
            match entry.side {
                Side::Left => {
                    let x = center_x
                        .saturating_sub(2)
                        .saturating_sub(shown.chars().count() as u16)
                        .max(area.x);
                    buf.print_text_clipped(
                        x,
                        y as u16,
                        &shown,
                        *color,
                        *attrs,
                        center_x.saturating_sub(1),
                    );
                }
                Side::Right => {
                    buf.print_text_clipped(center_x + 2, y as u16, &shown, *color, *attrs, area.right());
                }
            }
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TabComponent for Timeline {
    fn init(&mut self, ctx: &mut Ctx<'_>) {
        self.load_content(ctx);
        self.scroll = 0;
        self.time = 0.0;
    }

    fn render(&mut self, ctx: &mut Ctx<'_>) {
        if self.frames.as_ref().is_some_and(FrameHandle::is_active) {
            return;
        }
        self.frames = Some(ctx.scheduler.borrow_mut().request_frames());
        ctx.bus.emit(AppEvent::AnimationStart);
    }

    fn cleanup(&mut self) {
        if let Some(handle) = self.frames.take() {
            handle.cancel();
        }
        self.hovered = None;
    }

    fn frame(&mut self, buf: &mut Buffer, area: Rect, dt: Duration) {
        if !self.frames.as_ref().is_some_and(FrameHandle::is_active) {
            return;
        }
        if area.is_empty() {
            return;
        }
        self.time += dt.as_secs_f32();

        // Scroll reveal: an entry's fade starts the first time its marker
        // row enters the viewport.
        let viewport_top = self.scroll;
        let viewport_bottom = self.scroll + area.height;
        for index in 0..self.entries.len() {
            let top = self.entry_top(index);
            if top >= viewport_top && top < viewport_bottom {
                let entry = &mut self.entries[index];
                if entry.reveal.is_none() {
                    entry.reveal = Some(Fade::new(REVEAL).easing(ease_out));
                }
            }
        }
        for entry in &mut self.entries {
            if let Some(reveal) = &mut entry.reveal {
                reveal.tick(dt);
            }
        }

        let center_x = area.x + area.width / 2;
        for y in area.y..area.bottom() {
            buf.set(center_x, y, Cell::from_char('\u{2502}').fg(theme::EDGE));
        }

        for index in 0..self.entries.len() {
            self.draw_entry(buf, area, index, center_x);
        }

        if self.entries.is_empty() {
            let msg = "nothing here yet";
            let x = area.x + area.width.saturating_sub(msg.len() as u16) / 2;
            let y = area.y + area.height / 2;
            buf.print_text_clipped(x, y, msg, theme::DIM, CellAttrs::empty(), area.right());
        }
    }

    fn input(&mut self, event: &InputEvent, ctx: &mut Ctx<'_>) {
        match event {
            InputEvent::Key(Key::Up) => self.scroll_by(-1, ctx.area),
            InputEvent::Key(Key::Down) => self.scroll_by(1, ctx.area),
            InputEvent::Key(Key::PageUp) => self.scroll_by(-(ctx.area.height as i32), ctx.area),
            InputEvent::Key(Key::PageDown) => self.scroll_by(ctx.area.height as i32, ctx.area),
            InputEvent::Mouse(mouse) => match mouse.kind {
                MouseKind::ScrollUp => self.scroll_by(-2, ctx.area),
                MouseKind::ScrollDown => self.scroll_by(2, ctx.area),
                MouseKind::Moved => {
                    self.hovered = self.entry_at_row(ctx.area, mouse.y);
                }
                MouseKind::Down(_) => {
                    if let Some(index) = self.entry_at_row(ctx.area, mouse.y) {
                        if let Some(url) = self.entries[index].url.clone() {
                            crate::open_external(&url);
                        }
                    }
                }
                _ => {}
            },
            InputEvent::Resize { .. } => {
                let max = self.max_scroll(ctx.area);
                self.scroll = self.scroll.min(max);
            }
            _ => {}
        }
    }
}
