//! Topic badge colors.
//!
//! Known topics map through a fixed table. Anything else is hashed into a
//! small fallback palette so the same topic always gets the same color.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const fn hex(value: u32) -> Rgb {
    Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeTone {
    Slate,
    Blue,
    Green,
    Red,
    Indigo,
    Pink,
    Fuchsia,
    Emerald,
    Amber,
    Cyan,
    Lime,
    Rose,
    Teal,
    Violet,
    Sky,
}

impl BadgeTone {
    pub fn name(self) -> &'static str {
        match self {
            BadgeTone::Slate => "slate",
            BadgeTone::Blue => "blue",
            BadgeTone::Green => "green",
            BadgeTone::Red => "red",
            BadgeTone::Indigo => "indigo",
            BadgeTone::Pink => "pink",
            BadgeTone::Fuchsia => "fuchsia",
            BadgeTone::Emerald => "emerald",
            BadgeTone::Amber => "amber",
            BadgeTone::Cyan => "cyan",
            BadgeTone::Lime => "lime",
            BadgeTone::Rose => "rose",
            BadgeTone::Teal => "teal",
            BadgeTone::Violet => "violet",
            BadgeTone::Sky => "sky",
        }
    }

    /// Style token in the `bg-*/text-*/border-*` form the web client used.
    pub fn token(self) -> String {
        let name = self.name();
        format!("bg-{name}-50 text-{name}-700 border-{name}-200")
    }

    /// (background, text, border)
    pub fn colors(self) -> (Rgb, Rgb, Rgb) {
        match self {
            BadgeTone::Slate => (hex(0xf8fafc), hex(0x334155), hex(0xe2e8f0)),
            BadgeTone::Blue => (hex(0xeff6ff), hex(0x1d4ed8), hex(0xbfdbfe)),
            BadgeTone::Green => (hex(0xf0fdf4), hex(0x15803d), hex(0xbbf7d0)),
            BadgeTone::Red => (hex(0xfef2f2), hex(0xb91c1c), hex(0xfecaca)),
            BadgeTone::Indigo => (hex(0xeef2ff), hex(0x4338ca), hex(0xc7d2fe)),
            BadgeTone::Pink => (hex(0xfdf2f8), hex(0xbe185d), hex(0xfbcfe8)),
            BadgeTone::Fuchsia => (hex(0xfdf4ff), hex(0xa21caf), hex(0xf5d0fe)),
            BadgeTone::Emerald => (hex(0xecfdf5), hex(0x047857), hex(0xa7f3d0)),
            BadgeTone::Amber => (hex(0xfffbeb), hex(0xb45309), hex(0xfde68a)),
            BadgeTone::Cyan => (hex(0xecfeff), hex(0x0e7490), hex(0xa5f3fc)),
            BadgeTone::Lime => (hex(0xf7fee7), hex(0x4d7c0f), hex(0xd9f99d)),
            BadgeTone::Rose => (hex(0xfff1f2), hex(0xbe123c), hex(0xfecdd3)),
            BadgeTone::Teal => (hex(0xf0fdfa), hex(0x0f766e), hex(0x99f6e4)),
            BadgeTone::Violet => (hex(0xf5f3ff), hex(0x6d28d9), hex(0xddd6fe)),
            BadgeTone::Sky => (hex(0xf0f9ff), hex(0x0369a1), hex(0xbae6fd)),
        }
    }
}

pub const FALLBACK_TONES: [BadgeTone; 7] = [
    BadgeTone::Amber,
    BadgeTone::Cyan,
    BadgeTone::Lime,
    BadgeTone::Rose,
    BadgeTone::Teal,
    BadgeTone::Violet,
    BadgeTone::Sky,
];

pub const KNOWN_TOPICS: [(&str, BadgeTone); 9] = [
    ("general", BadgeTone::Slate),
    ("technology", BadgeTone::Blue),
    ("relationships", BadgeTone::Green),
    ("trump", BadgeTone::Red),
    ("us politics", BadgeTone::Red),
    ("openai", BadgeTone::Indigo),
    ("instagram", BadgeTone::Pink),
    ("tiktok", BadgeTone::Fuchsia),
    ("nvidia", BadgeTone::Emerald),
];

/// Polynomial base-31 hash over UTF-16 code units, wrapping at 32 bits.
pub fn topic_hash(key: &str) -> u32 {
    key.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// Immutable topic → tone table handed to whoever renders badges.
#[derive(Debug, Clone)]
pub struct BadgePalette {
    known: HashMap<String, BadgeTone>,
    fallbacks: Vec<BadgeTone>,
}

impl BadgePalette {
    pub fn new<K, I>(known: I, fallbacks: Vec<BadgeTone>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, BadgeTone)>,
    {
        Self {
            known: known
                .into_iter()
                .map(|(topic, tone)| (topic.into().to_lowercase(), tone))
                .collect(),
            fallbacks,
        }
    }

    pub fn classify(&self, topic: Option<&str>) -> BadgeTone {
        let key = topic
            .filter(|topic| !topic.is_empty())
            .unwrap_or("General")
            .to_lowercase();
        if let Some(tone) = self.known.get(&key) {
            return *tone;
        }
        if self.fallbacks.is_empty() {
            return BadgeTone::Slate;
        }
        let index = topic_hash(&key) as usize % self.fallbacks.len();
        self.fallbacks[index]
    }
}

impl Default for BadgePalette {
    fn default() -> Self {
        Self::new(KNOWN_TOPICS, FALLBACK_TONES.to_vec())
    }
}
