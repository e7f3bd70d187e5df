#![forbid(unsafe_code)]

//! Text scramble effect.
//!
//! Characters churn through glyph noise before resolving to the target
//! text. Each slot gets a randomized start/end frame window; within the
//! window the displayed glyph re-rolls with a fixed probability per frame.
//! Seeded, so a given transition always plays back identically.

use folio_core::rng::Lcg;

const GLYPHS: &[char] = &[
    '!', '<', '>', '-', '_', '\\', '/', '[', ']', '{', '}', '=', '+', '*', '^', '?', '#', '@',
    '$', '%', '&', '(', ')', '~',
];

/// Per-frame probability of re-rolling an in-flight glyph.
const CHURN: f32 = 0.28;
/// Upper bound for the randomized start frame and window length.
const WINDOW: u32 = 40;

#[derive(Debug, Clone)]
struct Slot {
    from: Option<char>,
    to: Option<char>,
    start: u32,
    end: u32,
    current: Option<char>,
}

/// A glyph in the current scramble output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrambleChar {
    pub ch: char,
    /// Still churning (styled differently from resolved text).
    pub scrambling: bool,
}

/// An in-flight text transition.
#[derive(Debug, Clone)]
pub struct TextScramble {
    slots: Vec<Slot>,
    frame: u32,
    rng: Lcg,
}

impl TextScramble {
    pub fn new(seed: u64) -> Self {
        Self {
            slots: Vec::new(),
            frame: 0,
            rng: Lcg::new(seed),
        }
    }

    /// Begin a transition from `old` to `new`, replacing any transition in
    /// flight.
    pub fn set_text(&mut self, old: &str, new: &str) {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();
        let len = old.len().max(new.len());

        self.slots = (0..len)
            .map(|i| {
                let start = self.rng.index(WINDOW as usize) as u32;
                let end = start + self.rng.index(WINDOW as usize) as u32;
                Slot {
                    from: old.get(i).copied(),
                    to: new.get(i).copied(),
                    start,
                    end,
                    current: None,
                }
            })
            .collect();
        self.frame = 0;
    }

    /// Advance one frame. Returns whether the transition has resolved.
    pub fn tick(&mut self) -> bool {
        if self.is_done() {
            return true;
        }
        for slot in &mut self.slots {
            if self.frame >= slot.start && self.frame < slot.end {
                let reroll = slot.current.is_none() || self.rng.next_f32() < CHURN;
                if reroll {
                    slot.current = Some(GLYPHS[self.rng.index(GLYPHS.len())]);
                }
            }
        }
        self.frame += 1;
        self.is_done()
    }

    /// Whether every slot has passed its window.
    pub fn is_done(&self) -> bool {
        self.slots.iter().all(|s| self.frame >= s.end)
    }

    /// Abandon the transition, snapping to the target text.
    pub fn finish(&mut self) {
        let max_end = self.slots.iter().map(|s| s.end).max().unwrap_or(0);
        self.frame = max_end;
    }

    /// The glyphs to display this frame. Slots with nothing to show (both
    /// ends empty) are skipped.
    pub fn output(&self) -> Vec<ScrambleChar> {
        self.slots
            .iter()
            .filter_map(|slot| {
                if self.frame >= slot.end {
                    slot.to.map(|ch| ScrambleChar {
                        ch,
                        scrambling: false,
                    })
                } else if self.frame >= slot.start {
                    slot.current.map(|ch| ScrambleChar {
                        ch,
                        scrambling: true,
                    })
                } else {
                    slot.from.map(|ch| ScrambleChar {
                        ch,
                        scrambling: false,
                    })
                }
            })
            .collect()
    }

    /// Resolved target as a string, for layout measurements.
    pub fn target(&self) -> String {
        self.slots.iter().filter_map(|s| s.to).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_completion(scramble: &mut TextScramble) -> u32 {
        let mut ticks = 0;
        while !scramble.tick() {
            ticks += 1;
            assert!(ticks < 1000, "scramble failed to resolve");
        }
        ticks
    }

    #[test]
    fn resolves_to_target_text() {
        let mut scramble = TextScramble::new(7);
        scramble.set_text("old", "new text");
        run_to_completion(&mut scramble);

        let resolved: String = scramble.output().iter().map(|c| c.ch).collect();
        assert_eq!(resolved, "new text");
        assert!(scramble.output().iter().all(|c| !c.scrambling));
    }

    #[test]
    fn shrinking_text_drops_extra_slots() {
        let mut scramble = TextScramble::new(7);
        scramble.set_text("longer text", "ok");
        run_to_completion(&mut scramble);
        let resolved: String = scramble.output().iter().map(|c| c.ch).collect();
        assert_eq!(resolved, "ok");
    }

    #[test]
    fn churns_before_resolving() {
        let mut scramble = TextScramble::new(3);
        scramble.set_text("", "scramble me please");
        let mut saw_scrambling = false;
        while !scramble.tick() {
            if scramble.output().iter().any(|c| c.scrambling) {
                saw_scrambling = true;
            }
        }
        assert!(saw_scrambling);
    }

    #[test]
    fn same_seed_same_playback() {
        let mut a = TextScramble::new(42);
        let mut b = TextScramble::new(42);
        a.set_text("from", "into");
        b.set_text("from", "into");
        for _ in 0..60 {
            a.tick();
            b.tick();
            assert_eq!(a.output(), b.output());
        }
    }

    #[test]
    fn finish_snaps_to_target() {
        let mut scramble = TextScramble::new(5);
        scramble.set_text("aaa", "bbb");
        scramble.tick();
        scramble.finish();
        assert!(scramble.is_done());
        let resolved: String = scramble.output().iter().map(|c| c.ch).collect();
        assert_eq!(resolved, "bbb");
    }

    #[test]
    fn set_text_restarts_an_in_flight_transition() {
        let mut scramble = TextScramble::new(5);
        scramble.set_text("", "first");
        for _ in 0..10 {
            scramble.tick();
        }
        scramble.set_text("first", "second");
        run_to_completion(&mut scramble);
        assert_eq!(scramble.target(), "second");
        let resolved: String = scramble.output().iter().map(|c| c.ch).collect();
        assert_eq!(resolved, "second");
    }

    #[test]
    fn empty_transition_is_immediately_done() {
        let mut scramble = TextScramble::new(1);
        scramble.set_text("", "");
        assert!(scramble.is_done());
        assert!(scramble.output().is_empty());
    }
}
