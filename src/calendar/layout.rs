use super::month::{DAYS_IN_WEEK, FIVE_WEEK_CELLS, SIX_WEEK_CELLS};

/// Number of columns in a section
const COLUMNS: u32 = 7;

/// Number of rows in a section of normal-height items.  Six-week sections fit
/// one more row into the same height.
const LINES: u32 = 5;

/// Identifies a grid cell: `section` is the month's index in the month
/// window, `item` is the cell's index within that month's grid
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct IndexPath {
    pub(crate) section: usize,
    pub(crate) item: usize,
}

impl IndexPath {
    pub(crate) fn new(section: usize, item: usize) -> IndexPath {
        IndexPath { section, item }
    }
}

/// A size in terminal cells
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct GridSize {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl GridSize {
    pub(crate) const fn new(width: u32, height: u32) -> GridSize {
        GridSize { width, height }
    }
}

/// A rectangle in the layout's content space, measured in terminal cells.
/// Unlike `ratatui::layout::Rect`, this is not bounded by the size of the
/// screen, as the content of a long month window can be tens of thousands of
/// cells across.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct GridRect {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl GridRect {
    pub(crate) const fn new(x: u32, y: u32, width: u32, height: u32) -> GridRect {
        GridRect {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    pub(crate) fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub(crate) fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the smallest rectangle containing both `self` and `other`
    pub(crate) fn union(self, other: GridRect) -> GridRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        GridRect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Empty rectangles intersect nothing.
    pub(crate) fn intersects(&self, other: &GridRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub(crate) fn intersection(&self, other: &GridRect) -> Option<GridRect> {
        self.intersects(other).then(|| {
            let x = self.x.max(other.x);
            let y = self.y.max(other.y);
            GridRect {
                x,
                y,
                width: self.right().min(other.right()) - x,
                height: self.bottom().min(other.bottom()) - y,
            }
        })
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum ScrollDirection {
    /// Months are laid out side by side, one page width apart
    #[default]
    Horizontal,
    /// Months are stacked in one column, one page height apart
    Vertical,
}

/// The source of the section & item counts that a [`GridLayout`] lays out
pub(crate) trait GridDataSource {
    fn number_of_sections(&self) -> usize;
    fn number_of_items(&self, section: usize) -> usize;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CellAttributes {
    pub(crate) index_path: IndexPath,
    pub(crate) frame: GridRect,
}

/// Lays out each section of a [`GridDataSource`] as a seven-column page.
///
/// Sections must have either 35 or 42 items.  A 35-item section is laid out
/// as five rows of full-height items; a 42-item section is laid out as six
/// rows of shorter items occupying the same total height.  Items in sections
/// of any other size are not laid out at all.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GridLayout {
    item_size: GridSize,
    line_spacing: u32,
    interitem_spacing: u32,
    direction: ScrollDirection,
    content_bounds: GridRect,
    // Invariant: `cached[s][i].index_path == IndexPath::new(s, i)`
    cached: Vec<Vec<CellAttributes>>,
}

impl GridLayout {
    pub(crate) fn new(
        item_size: GridSize,
        line_spacing: u32,
        interitem_spacing: u32,
        direction: ScrollDirection,
    ) -> GridLayout {
        GridLayout {
            item_size,
            line_spacing,
            interitem_spacing,
            direction,
            content_bounds: GridRect::default(),
            cached: Vec::new(),
        }
    }

    pub(crate) fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub(crate) fn item_size(&self) -> GridSize {
        self.item_size
    }

    pub(crate) fn interitem_spacing(&self) -> u32 {
        self.interitem_spacing
    }

    pub(crate) fn section_width(&self) -> u32 {
        (COLUMNS * (self.item_size.width + self.interitem_spacing))
            .saturating_sub(self.interitem_spacing)
    }

    pub(crate) fn section_height(&self) -> u32 {
        (LINES * (self.item_size.height + self.line_spacing)).saturating_sub(self.line_spacing)
    }

    /// Height of each item in a six-week section
    pub(crate) fn extra_line_item_height(&self) -> u32 {
        self.section_height()
            .saturating_sub(LINES * self.line_spacing)
            / (LINES + 1)
    }

    /// The size of one month's page, which is also the scrolling unit
    pub(crate) fn page_size(&self) -> GridSize {
        GridSize::new(self.section_width(), self.section_height())
    }

    /// Length of one page along the scroll axis
    pub(crate) fn page_extent(&self) -> u32 {
        match self.direction {
            ScrollDirection::Horizontal => self.section_width(),
            ScrollDirection::Vertical => self.section_height(),
        }
    }

    /// Discard all cached attributes and lay out every item of `source`
    /// anew.  `bounds` is the size of the viewport, which the content size
    /// never falls below.
    pub(crate) fn prepare<D: GridDataSource + ?Sized>(&mut self, source: &D, bounds: GridSize) {
        self.cached.clear();
        self.content_bounds = GridRect::new(0, 0, bounds.width, bounds.height);
        for section in 0..source.number_of_sections() {
            let item_qty = source.number_of_items(section);
            let attributes = (0..item_qty)
                .map_while(|item| {
                    let index_path = IndexPath::new(section, item);
                    self.frame_for(index_path, item_qty)
                        .map(|frame| CellAttributes { index_path, frame })
                })
                .collect::<Vec<_>>();
            for attr in &attributes {
                self.content_bounds = self.content_bounds.union(attr.frame);
            }
            self.cached.push(attributes);
        }
        tracing::trace!(
            sections = self.cached.len(),
            width = self.content_bounds.width,
            height = self.content_bounds.height,
            "prepared grid layout"
        );
    }

    fn frame_for(&self, index_path: IndexPath, item_qty: usize) -> Option<GridRect> {
        let item_height = match item_qty {
            FIVE_WEEK_CELLS => self.item_size.height,
            SIX_WEEK_CELLS => self.extra_line_item_height(),
            _ => return None,
        };
        let column = to_u32(index_path.item % DAYS_IN_WEEK);
        let row = to_u32(index_path.item / DAYS_IN_WEEK);
        let section = to_u32(index_path.section);
        let mut x = column * (self.item_size.width + self.interitem_spacing);
        let mut y = row * (item_height + self.line_spacing);
        match self.direction {
            ScrollDirection::Horizontal => {
                x = x.saturating_add(section.saturating_mul(self.section_width()));
            }
            ScrollDirection::Vertical => {
                y = y.saturating_add(section.saturating_mul(self.section_height()));
            }
        }
        Some(GridRect::new(x, y, self.item_size.width, item_height))
    }

    pub(crate) fn content_size(&self) -> GridSize {
        self.content_bounds.size()
    }

    pub(crate) fn attributes_in_rect(&self, rect: GridRect) -> Vec<CellAttributes> {
        self.cached
            .iter()
            .flatten()
            .filter(|attr| attr.frame.intersects(&rect))
            .copied()
            .collect()
    }

    /// Returns `None` for items that have not been laid out, including those
    /// outside the sections & items seen by the last call to `prepare()`
    pub(crate) fn attributes_for_item(&self, index_path: IndexPath) -> Option<CellAttributes> {
        self.cached
            .get(index_path.section)
            .and_then(|section| section.get(index_path.item))
            .copied()
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
