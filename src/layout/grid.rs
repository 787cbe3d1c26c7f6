use crate::{
    foundation::core::{Edges, PixelRect},
    foundation::error::{ExportError, ExportResult},
    foundation::math::fingerprint_of,
};

/// Per-item sizing input for [`layout_grid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridItem {
    /// Panel height (computed from the grid's panel width).
    pub panel_height: u32,
    /// Vertical space reserved below the panel for a detached caption (0 when none).
    pub caption_extent: u32,
}

/// Grid container parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    /// Canvas width the grid spans, margins included.
    pub canvas_width: u32,
    /// Column count (>= 1).
    pub columns: u32,
    /// Outer margins; `top` includes any header band above the grid.
    pub margins: Edges,
    /// Gap between columns and between rows.
    pub spacing: u32,
    /// Stretch every panel in a row to the row's tallest panel.
    pub uniform_height: bool,
}

impl GridSpec {
    /// Width of every panel: the content width split evenly across columns, floored, >= 1.
    pub fn panel_width(&self) -> u32 {
        let cols = self.columns.max(1);
        let gaps = self.spacing.saturating_mul(cols - 1);
        let content = self
            .canvas_width
            .saturating_sub(self.margins.horizontal())
            .saturating_sub(gaps);
        (content / cols).max(1)
    }
}

/// Placement of one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GridCell {
    /// Input position.
    pub index: usize,
    /// Row index.
    pub row: u32,
    /// Column index (`index % columns`).
    pub column: u32,
    /// Panel box.
    pub panel: PixelRect,
    /// Caption box directly below the panel, when the item reserved one.
    pub caption: Option<PixelRect>,
}

/// Deterministic grid placement.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GridLayout {
    /// Shared panel width.
    pub panel_width: u32,
    /// One cell per input item, in input order.
    pub cells: Vec<GridCell>,
    /// Height of each row (max of panel + caption extent).
    pub row_heights: Vec<u32>,
    /// Top edge of each row.
    pub row_offsets: Vec<u32>,
    /// Full canvas height including margins; >= 1.
    pub total_height: u32,
}

impl GridLayout {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    /// Stable hash of the geometry.
    pub fn fingerprint(&self) -> ExportResult<u64> {
        fingerprint_of(self)
    }
}

/// Place items row-major, left to right, top to bottom.
///
/// Row `r` holds items `r*columns .. (r+1)*columns`. Reordering items moves cells but never
/// changes any item's panel or caption size (unless `uniform_height` is set, in which case the
/// row's tallest panel wins).
pub fn layout_grid(items: &[GridItem], spec: &GridSpec) -> ExportResult<GridLayout> {
    if spec.columns == 0 {
        return Err(ExportError::validation("grid columns must be >= 1"));
    }
    let cols = spec.columns as usize;
    let panel_width = spec.panel_width();

    let mut row_heights = Vec::with_capacity(items.len().div_ceil(cols));
    let mut row_panel_max = Vec::with_capacity(row_heights.capacity());
    for row in items.chunks(cols) {
        let panel_max = row.iter().map(|i| i.panel_height).max().unwrap_or(0);
        let extent = row
            .iter()
            .map(|i| {
                let panel = if spec.uniform_height {
                    panel_max
                } else {
                    i.panel_height
                };
                panel.saturating_add(i.caption_extent)
            })
            .max()
            .unwrap_or(0);
        row_panel_max.push(panel_max);
        row_heights.push(extent);
    }

    let mut row_offsets = Vec::with_capacity(row_heights.len());
    let mut y = spec.margins.top;
    for (r, h) in row_heights.iter().enumerate() {
        if r > 0 {
            y = y.saturating_add(spec.spacing);
        }
        row_offsets.push(y);
        y = y.saturating_add(*h);
    }
    let total_height = y.saturating_add(spec.margins.bottom).max(1);

    let mut cells = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let row = index / cols;
        let column = (index % cols) as u32;
        let x = spec
            .margins
            .left
            .saturating_add(column.saturating_mul(panel_width.saturating_add(spec.spacing)));
        let height = if spec.uniform_height {
            row_panel_max[row]
        } else {
            item.panel_height
        };
        let panel = PixelRect::new(x, row_offsets[row], panel_width, height);
        let caption = (item.caption_extent > 0)
            .then(|| PixelRect::new(x, panel.bottom(), panel_width, item.caption_extent));
        cells.push(GridCell {
            index,
            row: row as u32,
            column,
            panel,
            caption,
        });
    }

    Ok(GridLayout {
        panel_width,
        cells,
        row_heights,
        row_offsets,
        total_height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
