//! Stable per-participant display colors.
//!
//! Each name maps to a hue derived from a deterministic string hash, so the
//! same name always gets the same color. Assignments are remembered in a
//! bounded LRU cache; an evicted name is recomputed identically on its next
//! lookup.

use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;

/// Default number of names remembered.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Saturation of every assigned color, in percent.
pub const SATURATION: u8 = 70;
/// Lightness of every assigned color, in percent.
pub const LIGHTNESS: u8 = 65;

/// A display color at fixed saturation and lightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NickColor {
    /// Hue in degrees, `0..360`.
    pub hue: u16,
}

impl NickColor {
    /// Color for a name, without caching.
    pub fn for_name(name: &str) -> Self {
        Self {
            hue: (stable_hash(name) % 360) as u16,
        }
    }
}

impl fmt::Display for NickColor {
    /// Formats as a CSS `hsl()` value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({},{}%,{}%)", self.hue, SATURATION, LIGHTNESS)
    }
}

/// Polynomial string hash (`h * 31 + unit`) over UTF-16 code units with
/// 32-bit wrapping, returned as its absolute value.
///
/// Matches the hash browser-side code computes with `charCodeAt`, so colors
/// agree with web collaborators.
pub fn stable_hash(name: &str) -> u32 {
    name.encode_utf16()
        .fold(0i32, |h, unit| {
            (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// LRU cache of assigned colors.
pub struct NickColorCache {
    cache: LruCache<String, NickColor>,
}

impl NickColorCache {
    /// Create a cache holding at most `capacity` names (a zero capacity is
    /// treated as one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Color for `name`, refreshing its recency.
    pub fn color_of(&mut self, name: &str) -> NickColor {
        if let Some(color) = self.cache.get(name) {
            return *color;
        }
        let color = NickColor::for_name(name);
        self.cache.put(name.to_string(), color);
        color
    }

    /// Whether `name` is currently remembered. Does not touch recency.
    pub fn contains(&self, name: &str) -> bool {
        self.cache.contains(name)
    }

    /// Number of remembered names.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no name is remembered.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Maximum number of remembered names.
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

impl Default for NickColorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for NickColorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NickColorCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
