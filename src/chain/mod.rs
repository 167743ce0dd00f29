//! Four-category filter chain with one active filter per category.
//!
//! Frames flow through the active tone curve, channel mixer, convolution and
//! detection filters in that order. Each category starts at its identity
//! filter and cycles forward with wraparound.

use crate::detect::ImageDetector;
use crate::filter::{
    AnyFilter, CurvePreset, Filter, IdentityFilter, MixerFilter, MixerMode, StrokeEdgesFilter,
};
use crate::image::frame::assert_same_shape;
use crate::image::Frame;
use crate::trace::{trace_event, trace_span};

/// Filter categories in application order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    ToneCurve,
    ChannelMixer,
    Convolution,
    Detection,
}

impl Category {
    /// All categories in application order.
    pub const ALL: [Category; 4] = [
        Category::ToneCurve,
        Category::ChannelMixer,
        Category::Convolution,
        Category::Detection,
    ];

    /// Position of the category in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable name used in configs and reports.
    pub fn name(self) -> &'static str {
        match self {
            Category::ToneCurve => "tone-curve",
            Category::ChannelMixer => "channel-mixer",
            Category::Convolution => "convolution",
            Category::Detection => "detection",
        }
    }

    /// Parses a name produced by [`Category::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Index into a non-empty list with wraparound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterSlot {
    index: usize,
    len: usize,
}

impl FilterSlot {
    /// Creates a slot at index 0.
    ///
    /// # Panics
    /// Panics when `len` is zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "filter slot needs at least one entry");
        Self { index: 0, len }
    }

    /// Returns a slot at `index % len`.
    pub fn with_index(self, index: usize) -> Self {
        Self {
            index: index % self.len,
            len: self.len,
        }
    }

    /// Returns the following slot, wrapping to 0 after the last entry.
    pub fn next(self) -> Self {
        self.with_index(self.index + 1)
    }

    /// Current index.
    pub fn index(self) -> usize {
        self.index
    }

    /// Number of entries.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> usize {
        self.len
    }
}

/// Persistable active index per category, in [`Category::ALL`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub indices: [usize; 4],
}

impl Selection {
    /// Active index for `category`.
    pub fn get(&self, category: Category) -> usize {
        self.indices[category.index()]
    }
}

/// Ordered filters per category with one active filter each.
#[derive(Debug)]
pub struct FilterChain {
    filters: [Vec<AnyFilter>; 4],
    slots: [FilterSlot; 4],
}

impl FilterChain {
    /// Creates a chain holding only the identity filter in every category.
    pub fn new() -> Self {
        Self {
            filters: std::array::from_fn(|_| vec![AnyFilter::from(IdentityFilter)]),
            slots: [FilterSlot::new(1); 4],
        }
    }

    /// Builds the stock chain.
    ///
    /// Detection gets one entry per detector; references that failed to load
    /// are simply not passed in.
    pub fn standard(detectors: Vec<ImageDetector>) -> Self {
        let mut chain = Self::new();
        for preset in CurvePreset::ALL {
            chain.push(Category::ToneCurve, preset.filter());
        }
        for mode in MixerMode::ALL {
            chain.push(Category::ChannelMixer, MixerFilter::new(mode));
        }
        chain.push(Category::Convolution, StrokeEdgesFilter::new());
        for detector in detectors {
            chain.push(Category::Detection, detector);
        }
        chain
    }

    /// Appends a filter to `category`; the active selection is unchanged.
    pub fn push(&mut self, category: Category, filter: impl Into<AnyFilter>) {
        let i = category.index();
        self.filters[i].push(filter.into());
        self.slots[i] = FilterSlot::new(self.filters[i].len()).with_index(self.slots[i].index());
    }

    /// Number of filters in `category`, identity included.
    pub fn len(&self, category: Category) -> usize {
        self.filters[category.index()].len()
    }

    /// Advances `category` to its next filter, wrapping after the last one.
    pub fn select_next(&mut self, category: Category) -> usize {
        let i = category.index();
        self.slots[i] = self.slots[i].next();
        trace_event!(
            "select_next",
            category = category.name(),
            index = self.slots[i].index()
        );
        self.slots[i].index()
    }

    /// Active index in `category`.
    pub fn active_index(&self, category: Category) -> usize {
        self.slots[category.index()].index()
    }

    /// Active filter in `category`.
    pub fn active(&self, category: Category) -> &AnyFilter {
        let i = category.index();
        &self.filters[i][self.slots[i].index()]
    }

    /// Mutable variant of [`FilterChain::active`].
    pub fn active_mut(&mut self, category: Category) -> &mut AnyFilter {
        let i = category.index();
        &mut self.filters[i][self.slots[i].index()]
    }

    /// Names of the active filters in application order.
    pub fn active_names(&self) -> [&str; 4] {
        Category::ALL.map(|c| self.active(c).name())
    }

    /// Current selection, for persistence.
    pub fn selection(&self) -> Selection {
        Selection {
            indices: self.slots.map(FilterSlot::index),
        }
    }

    /// Restores a persisted selection; stale indices wrap into range.
    pub fn restore(&mut self, selection: Selection) {
        for (slot, &index) in self.slots.iter_mut().zip(selection.indices.iter()) {
            *slot = slot.with_index(index);
        }
    }

    /// Runs the active filters on `frame` in place.
    pub fn apply_in_place(&mut self, frame: &mut Frame) {
        let _span = trace_span!(
            "chain_apply",
            width = frame.width(),
            height = frame.height()
        )
        .entered();
        for category in Category::ALL {
            self.active_mut(category).apply_in_place(frame);
        }
    }

    /// Writes the chained result of `src` into `dst`.
    ///
    /// # Panics
    /// Panics when `src` and `dst` differ in shape.
    pub fn apply(&mut self, src: &Frame, dst: &mut Frame) {
        assert_same_shape(src, dst);
        dst.copy_from(src);
        self.apply_in_place(dst);
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}
