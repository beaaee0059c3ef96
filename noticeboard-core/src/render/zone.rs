//! Screen zones and dirty tracking

use crate::config::ContentLayout;

/// Independently redrawable screen region
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Zone {
    Title = 0,
    Clock = 1,
    Status = 2,
    Content1 = 3,
    Content2 = 4,
    Content3 = 5,
}

impl Zone {
    /// Every zone in render order
    pub const ALL: [Zone; 6] = [
        Zone::Title,
        Zone::Clock,
        Zone::Status,
        Zone::Content1,
        Zone::Content2,
        Zone::Content3,
    ];

    /// Content zone by 0-based slot
    pub fn content(index: usize) -> Option<Zone> {
        match index {
            0 => Some(Zone::Content1),
            1 => Some(Zone::Content2),
            2 => Some(Zone::Content3),
            _ => None,
        }
    }

    /// 0-based content slot, `None` for header zones
    pub fn content_index(self) -> Option<usize> {
        match self {
            Zone::Content1 => Some(0),
            Zone::Content2 => Some(1),
            Zone::Content3 => Some(2),
            _ => None,
        }
    }

    pub fn is_content(self) -> bool {
        self.content_index().is_some()
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// One dirty bit per zone
///
/// Content zones outside the active layout can never become dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirtyTracker {
    bits: u8,
    layout: ContentLayout,
}

impl DirtyTracker {
    /// Create a tracker with every zone clean
    pub fn new(layout: ContentLayout) -> Self {
        Self { bits: 0, layout }
    }

    pub fn layout(&self) -> ContentLayout {
        self.layout
    }

    /// Switch layout; every zone of the new layout is dirtied
    pub fn set_layout(&mut self, layout: ContentLayout) {
        self.layout = layout;
        self.bits = 0;
        self.mark_all_dirty();
    }

    /// Check whether a zone exists in the active layout
    pub fn in_layout(&self, zone: Zone) -> bool {
        match zone.content_index() {
            Some(i) => i < self.layout.zone_count(),
            None => true,
        }
    }

    /// Mark a zone dirty; marking twice is the same as once
    pub fn mark_dirty(&mut self, zone: Zone) {
        if self.in_layout(zone) {
            self.bits |= zone.bit();
        }
    }

    pub fn is_dirty(&self, zone: Zone) -> bool {
        self.bits & zone.bit() != 0
    }

    pub fn clear(&mut self, zone: Zone) {
        self.bits &= !zone.bit();
    }

    pub fn mark_all_dirty(&mut self) {
        for zone in Zone::ALL {
            self.mark_dirty(zone);
        }
    }

    /// Mark every content zone of the active layout dirty
    pub fn mark_all_content_dirty(&mut self) {
        for zone in self.content_zones() {
            self.mark_dirty(zone);
        }
    }

    /// Content zones of the active layout, top to bottom
    pub fn content_zones(&self) -> impl Iterator<Item = Zone> {
        (0..self.layout.zone_count()).filter_map(Zone::content)
    }

    pub fn any_dirty(&self) -> bool {
        self.bits != 0
    }

    /// Dirty zones in render order
    pub fn dirty_zones(&self) -> impl Iterator<Item = Zone> + '_ {
        Zone::ALL.into_iter().filter(|z| self.is_dirty(*z))
    }
}
