#![forbid(unsafe_code)]

//! Radiating section nodes around the emblem.
//!
//! Three nodes at fixed angles, each connected to the center by a line that
//! draws in on activation. Fully drawn lines carry a traveling pulse dot,
//! phase-shifted a third of a cycle per node. Hover grows and accents a
//! node; a click selects its section.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::time::Duration;

use folio_core::anim::ease_out_cubic;
use folio_core::geometry::{Rect, Vec2};
use folio_core::state::TabId;
use folio_layout::hit::hit_circle;
use folio_render::buffer::Buffer;
use folio_render::canvas::{PX_PER_CELL_X, PX_PER_CELL_Y, Painter};
use folio_render::cell::CellAttrs;

use crate::theme;

/// Hit radius around each node, in canvas sub-pixels.
const HIT_RADIUS: f32 = 8.0;
/// Draw-in progress gained per frame.
const DRAW_IN_STEP: f32 = 0.02;
/// Label offset beyond the node, along its angle.
const LABEL_DISTANCE: f32 = 10.0;

/// One selectable section node.
#[derive(Debug, Clone)]
pub struct SectionNode {
    pub tab: TabId,
    pub angle: f32,
    pub pos: Vec2,
    /// Draw-in animation progress, 0..1.
    pub progress: f32,
}

/// The node layer of the landing surface.
#[derive(Debug)]
pub struct NodeWeb {
    nodes: Vec<SectionNode>,
    center: Vec2,
    hovered: Option<TabId>,
    pulse_offset: f32,
}

impl NodeWeb {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            center: Vec2::ZERO,
            hovered: None,
            pulse_offset: 0.0,
        }
    }

    /// Position the nodes around the emblem within a canvas of `size`
    /// sub-pixels. Draw-in restarts.
    pub fn init(&mut self, center: Vec2, radius: f32, size: Vec2) {
        self.center = center;
        // 2.5 radii out, pulled in when the canvas can't fit that plus a
        // label margin.
        let margin = 12.0;
        let room = (size.x - center.x)
            .min(center.x)
            .min(size.y - center.y)
            .min(center.y)
            - margin;
        let distance = (radius * 2.5).min(room).max(radius + 6.0);
        self.nodes = [
            (TabId::Work, -FRAC_PI_4),
            (TabId::Writing, -3.0 * FRAC_PI_4),
            (TabId::Fun, FRAC_PI_2),
        ]
        .into_iter()
        .map(|(tab, angle)| SectionNode {
            tab,
            angle,
            pos: Vec2::new(
                center.x + angle.cos() * distance,
                center.y + angle.sin() * distance,
            ),
            progress: 0.0,
        })
        .collect();
        self.hovered = None;
    }

    /// Advance the pulse cycle and draw-in progress.
    pub fn update(&mut self, dt: Duration) {
        self.pulse_offset = (self.pulse_offset + dt.as_millis() as f32 * 0.001) % 1.0;
        for node in &mut self.nodes {
            if node.progress < 1.0 {
                node.progress = (node.progress + DRAW_IN_STEP).min(1.0);
            }
        }
    }

    /// Update hover from a canvas-local pointer position.
    pub fn hover(&mut self, point: Vec2) -> Option<TabId> {
        self.hovered = self
            .node_at(point)
            .map(|idx| self.nodes[idx].tab);
        self.hovered
    }

    /// Node index under a canvas-local point, draw order, first match wins.
    pub fn node_at(&self, point: Vec2) -> Option<usize> {
        hit_circle(
            self.nodes.iter().map(|n| (n.pos, 0.0)),
            point,
            HIT_RADIUS,
        )
    }

    /// The section under a canvas-local point.
    pub fn section_at(&self, point: Vec2) -> Option<TabId> {
        self.node_at(point).map(|idx| self.nodes[idx].tab)
    }

    pub fn hovered(&self) -> Option<TabId> {
        self.hovered
    }

    /// The nodes in draw order.
    pub fn nodes(&self) -> &[SectionNode] {
        &self.nodes
    }

    /// Draw lines, pulses, and node discs onto the painter.
    pub fn render(&self, painter: &mut Painter) {
        for (idx, node) in self.nodes.iter().enumerate() {
            let hovered = self.hovered == Some(node.tab);
            let progress = ease_out_cubic(node.progress);
            let end = Vec2::new(
                self.center.x + (node.pos.x - self.center.x) * progress,
                self.center.y + (node.pos.y - self.center.y) * progress,
            );
            let line_color = if hovered { theme::ACCENT } else { theme::DIM };
            painter.line(
                self.center.x as i32,
                self.center.y as i32,
                end.x as i32,
                end.y as i32,
                Some(line_color),
            );

            if node.progress >= 1.0 {
                let t = (self.pulse_offset + idx as f32 * 0.33) % 1.0;
                let pulse = Vec2::new(
                    self.center.x + (node.pos.x - self.center.x) * t,
                    self.center.y + (node.pos.y - self.center.y) * t,
                );
                painter.disc(pulse.x as i32, pulse.y as i32, 1, Some(theme::ACCENT));

                let radius = if hovered { 3 } else { 2 };
                let color = if hovered { theme::ACCENT } else { theme::FG };
                painter.disc(node.pos.x as i32, node.pos.y as i32, radius, Some(color));
            }
        }
    }

    /// Draw labels onto the cell buffer, outside each node along its angle.
    pub fn render_labels(&self, buf: &mut Buffer, area: Rect) {
        for node in &self.nodes {
            if node.progress < 1.0 {
                continue;
            }
            let hovered = self.hovered == Some(node.tab);
            let label = node.tab.label();
            let anchor = Vec2::new(
                node.pos.x + node.angle.cos() * LABEL_DISTANCE,
                node.pos.y + node.angle.sin() * LABEL_DISTANCE,
            );
            let cell_x = area.x as f32 + anchor.x / PX_PER_CELL_X as f32;
            let cell_y = area.y as f32 + anchor.y / PX_PER_CELL_Y as f32;
            let x = (cell_x - label.len() as f32 / 2.0).max(area.x as f32) as u16;
            let y = (cell_y.max(area.y as f32) as u16).min(area.bottom().saturating_sub(1));
            let (color, attrs) = if hovered {
                (theme::ACCENT, CellAttrs::BOLD)
            } else {
                (theme::FG, CellAttrs::empty())
            };
            buf.print_text_clipped(x, y, label, color, attrs, area.right());
        }
    }
}

impl Default for NodeWeb {
    fn default() -> Self {
        Self::new()
    }
}
