use tracing::warn;

use super::fit::{FitRequest, fit};
use super::{Canvas, Color, FontWeight, HAlign, Rect, Stroke, TextStyle, VAlign};
use crate::board::{Board, FREE_COL, FREE_ROW, GRID_SIZE};

// Page geometry in normalized units (A4 portrait, origin lower-left).
const TOP_MARGIN: f32 = 0.06;
const TITLE_X: f32 = 0.05;
const TITLE_WIDTH: f32 = 0.90;
const TITLE_HEIGHT: f32 = 0.08;
const INSTRUCTIONS_HEIGHT: f32 = 0.08;
const INSTRUCTIONS_GAP: f32 = 0.005;
const INSTRUCTIONS_INSET: f32 = 0.005;
const GRID_GAP: f32 = 0.02;
const GRID_SIDE_MARGIN: f32 = 0.17;
const BOTTOM_MARGIN: f32 = 0.07;
const CELL_PADDING: f32 = 0.01;

const TITLE_MAX_PT: f32 = 36.0;
const TITLE_MIN_PT: f32 = 8.0;
const INSTRUCTIONS_MAX_PT: f32 = 12.0;
const INSTRUCTIONS_MIN_PT: f32 = 6.0;
const CELL_MAX_PT: f32 = 24.0;
const CELL_MIN_PT: f32 = 6.0;
const CELL_LINE_SPACING: f32 = 1.05;

const OUTER_BORDER_PT: f32 = 1.5;
const GRID_LINE_PT: f32 = 1.0;
const CELL_BORDER_PT: f32 = 0.6;
const PANEL_BORDER_PT: f32 = 0.8;

/// Colors for the non-text page furniture, parsed from settings once per
/// run.
#[derive(Debug, Clone, Copy)]
pub struct BoardStyle {
    pub panel_fill: Color,
    pub panel_edge: Color,
    pub free_fill: Color,
    pub grid_color: Color,
    pub text_color: Color,
}

/// Fixed region geometry for one page.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub title: Rect,
    pub instructions: Rect,
    pub grid: Rect,
    pub cell_side: f32,
}

impl PageGeometry {
    pub fn portrait() -> Self {
        let title_y = 1.0 - TOP_MARGIN - TITLE_HEIGHT;
        let title = Rect::new(TITLE_X, title_y, TITLE_WIDTH, TITLE_HEIGHT);
        let instructions = Rect::new(
            TITLE_X,
            title_y - INSTRUCTIONS_HEIGHT - INSTRUCTIONS_GAP,
            TITLE_WIDTH,
            INSTRUCTIONS_HEIGHT,
        );

        let grid_top = 1.0 - (TOP_MARGIN + TITLE_HEIGHT + INSTRUCTIONS_HEIGHT + GRID_GAP);
        let available_width = 1.0 - 2.0 * GRID_SIDE_MARGIN;
        let available_height = grid_top - BOTTOM_MARGIN;
        // Square cells, horizontally centered.
        let cell_side =
            (available_width / GRID_SIZE as f32).min(available_height / GRID_SIZE as f32);
        let side = cell_side * GRID_SIZE as f32;
        let grid = Rect::new((1.0 - side) / 2.0, grid_top - side, side, side);

        Self {
            title,
            instructions,
            grid,
            cell_side,
        }
    }

    /// Cell rectangle; row 0 is the top row as printed.
    pub fn cell(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            self.grid.x + col as f32 * self.cell_side,
            self.grid.y + (GRID_SIZE - 1 - row) as f32 * self.cell_side,
            self.cell_side,
            self.cell_side,
        )
    }
}

/// Lays out and draws one board onto `canvas`: fitted title, instructions
/// on a tinted panel, grid borders, and the 25 fitted cells. Returns the
/// number of regions that did not fit at their minimum font size (each is
/// also logged); the page is always drawn in full.
pub fn render_page(canvas: &mut dyn Canvas, board: &Board, style: &BoardStyle) -> usize {
    let geometry = PageGeometry::portrait();
    let mut overflows = 0;

    let heading = TextStyle {
        weight: FontWeight::Bold,
        color: style.text_color,
    };
    let body = TextStyle {
        weight: FontWeight::Normal,
        color: style.text_color,
    };

    overflows += fit_and_draw(
        canvas,
        FitRequest {
            text: board.title(),
            rect: geometry.title,
            style: heading,
            max_font_size: TITLE_MAX_PT,
            min_font_size: TITLE_MIN_PT,
            line_spacing: 1.0,
            halign: HAlign::Center,
            valign: VAlign::Center,
        },
        "title",
    );

    canvas.draw_rect(
        geometry.instructions,
        Some(style.panel_fill),
        Some(Stroke {
            color: style.panel_edge,
            width_pt: PANEL_BORDER_PT,
        }),
    );
    overflows += fit_and_draw(
        canvas,
        FitRequest {
            text: board.instructions(),
            rect: geometry.instructions.inset(INSTRUCTIONS_INSET),
            style: body,
            max_font_size: INSTRUCTIONS_MAX_PT,
            min_font_size: INSTRUCTIONS_MIN_PT,
            line_spacing: 1.0,
            halign: HAlign::Center,
            valign: VAlign::Center,
        },
        "instructions",
    );

    // Outer border heavier than the internal gridlines.
    canvas.draw_rect(
        geometry.grid,
        None,
        Some(Stroke {
            color: style.grid_color,
            width_pt: OUTER_BORDER_PT,
        }),
    );
    let gridline = Stroke {
        color: style.grid_color,
        width_pt: GRID_LINE_PT,
    };
    let grid = geometry.grid;
    for i in 1..GRID_SIZE {
        let offset = i as f32 * geometry.cell_side;
        canvas.draw_line(
            (grid.x + offset, grid.y),
            (grid.x + offset, grid.y + grid.height),
            gridline,
        );
        canvas.draw_line(
            (grid.x, grid.y + offset),
            (grid.x + grid.width, grid.y + offset),
            gridline,
        );
    }

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let cell = geometry.cell(row, col);
            if row == FREE_ROW && col == FREE_COL {
                canvas.draw_rect(cell, Some(style.free_fill), None);
            }
            canvas.draw_rect(
                cell,
                None,
                Some(Stroke {
                    color: style.grid_color,
                    width_pt: CELL_BORDER_PT,
                }),
            );
            overflows += fit_and_draw(
                canvas,
                FitRequest {
                    text: board.cell(row, col),
                    rect: cell.inset(CELL_PADDING),
                    style: body,
                    max_font_size: CELL_MAX_PT,
                    min_font_size: CELL_MIN_PT,
                    line_spacing: CELL_LINE_SPACING,
                    halign: HAlign::Center,
                    valign: VAlign::Center,
                },
                "cell",
            );
        }
    }

    overflows
}

fn fit_and_draw(canvas: &mut dyn Canvas, request: FitRequest<'_>, region: &str) -> usize {
    let result = fit(&*canvas, &request);
    if !result.fits {
        warn!(
            "{} overflows its region at {}pt: {:?}",
            region, result.font_size, request.text
        );
    }
    canvas.draw_text_block(
        &result.lines,
        request.rect,
        &request.style,
        result.font_size,
        request.line_spacing,
        request.halign,
        request.valign,
    );
    usize::from(!result.fits)
}
