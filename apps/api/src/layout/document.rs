//! Cursor-driven page composer.
//!
//! `DocumentBuilder` mimics the cell model of classic PDF report writers: a cursor
//! moves across the page while cells and wrapped blocks are placed, and a new page
//! is started whenever the next line would cross the bottom margin. Output is a
//! list of pages of positioned `DrawOp`s, which `render::pdf` paints.
//!
//! All coordinates are millimetres measured from the top-left corner of the page.

use crate::layout::font_metrics::{get_metrics, FontStyle, MM_PER_PT};

/// Horizontal padding inside a cell, on each side.
pub const CELL_PADDING_MM: f32 = 1.0;

const RULE_THICKNESS_MM: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageGeometry {
    /// A4 portrait with equal margins on all sides.
    pub const fn a4(margin_mm: f32) -> Self {
        PageGeometry {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn right_edge(&self) -> f32 {
        self.width_mm - self.margin_mm
    }

    /// Lowest y a line may reach before a page break is triggered.
    pub fn break_trigger(&self) -> f32 {
        self.height_mm - self.margin_mm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x_mm: f32,
        /// Baseline position.
        y_mm: f32,
        size_pt: f32,
        style: FontStyle,
        text: String,
    },
    Rule {
        x1_mm: f32,
        x2_mm: f32,
        y_mm: f32,
        thickness_mm: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text runs on this page in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

/// A laid-out document ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Document {
    /// Every text run of the document, page by page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }
}

/// One centred line of the running header repeated at the top of every page.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLine {
    pub text: String,
    pub style: FontStyle,
    pub size_pt: f32,
    pub height_mm: f32,
    pub gap_after_mm: f32,
}

pub struct DocumentBuilder {
    geometry: PageGeometry,
    header: Vec<HeaderLine>,
    pages: Vec<Page>,
    x: f32,
    y: f32,
    style: FontStyle,
    size_pt: f32,
}

impl DocumentBuilder {
    /// Starts a document on its first page, header already drawn.
    pub fn new(geometry: PageGeometry, header: Vec<HeaderLine>) -> Self {
        let mut builder = DocumentBuilder {
            geometry,
            header,
            pages: Vec::new(),
            x: geometry.margin_mm,
            y: geometry.margin_mm,
            style: FontStyle::Regular,
            size_pt: 10.0,
        };
        builder.add_page();
        builder
    }

    pub fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.style = style;
        self.size_pt = size_pt;
    }

    /// Places a single-line cell at the cursor and moves the cursor right by its width.
    /// A width of `None` extends the cell to the right margin. Text is never wrapped.
    pub fn cell(&mut self, width: Option<f32>, height: f32, text: &str, align: Align) {
        self.break_if_needed(height);
        let width = self.resolve_width(width);
        self.place_text(self.x, width, height, text, align);
        self.x += width;
    }

    /// Like `cell`, then moves the cursor to the left margin of the next line.
    pub fn cell_ln(&mut self, width: Option<f32>, height: f32, text: &str, align: Align) {
        self.cell(width, height, text, align);
        self.x = self.geometry.margin_mm;
        self.y += height;
    }

    /// Places wrapped, left-aligned text starting at the cursor's x, one line per `line_height`.
    /// Continuation lines keep the same x, including across page breaks.
    /// Leaves the cursor at the left margin below the block.
    pub fn multi_cell(&mut self, width: Option<f32>, line_height: f32, text: &str) {
        let left = self.x;
        let width = self.resolve_width(width);
        let lines = wrap_text(
            text,
            self.style,
            self.size_pt,
            width - 2.0 * CELL_PADDING_MM,
        );
        for line in &lines {
            self.break_if_needed(line_height);
            self.place_text(left, width, line_height, line, Align::Left);
            self.y += line_height;
        }
        self.x = self.geometry.margin_mm;
    }

    /// Draws a horizontal rule across the content width at the current y.
    pub fn rule(&mut self) {
        let y = self.y;
        let x1_mm = self.geometry.margin_mm;
        let x2_mm = x1_mm + self.geometry.content_width();
        self.current_page().ops.push(DrawOp::Rule {
            x1_mm,
            x2_mm,
            y_mm: y,
            thickness_mm: RULE_THICKNESS_MM,
        });
    }

    /// Line feed: back to the left margin, `height` further down.
    pub fn ln(&mut self, height: f32) {
        self.x = self.geometry.margin_mm;
        self.y += height;
    }

    pub fn finish(self) -> Document {
        Document {
            geometry: self.geometry,
            pages: self.pages,
        }
    }

    fn resolve_width(&self, width: Option<f32>) -> f32 {
        width.unwrap_or(self.geometry.right_edge() - self.x)
    }

    fn break_if_needed(&mut self, height: f32) {
        if self.y + height > self.geometry.break_trigger() {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
    }

    fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.x = self.geometry.margin_mm;
        self.y = self.geometry.margin_mm;

        let (style, size_pt) = (self.style, self.size_pt);
        let header = std::mem::take(&mut self.header);
        for line in &header {
            self.set_font(line.style, line.size_pt);
            self.cell_ln(None, line.height_mm, &line.text, Align::Center);
            self.ln(line.gap_after_mm);
        }
        self.header = header;
        self.set_font(style, size_pt);
    }

    fn place_text(&mut self, x: f32, width: f32, height: f32, text: &str, align: Align) {
        if text.is_empty() {
            return;
        }
        let text_width = get_metrics(self.style).measure_mm(text, self.size_pt);
        let x_mm = match align {
            Align::Left => x + CELL_PADDING_MM,
            Align::Center => x + (width - text_width) / 2.0,
            Align::Right => x + width - CELL_PADDING_MM - text_width,
        };
        let y_mm = self.y + 0.5 * height + 0.3 * self.size_pt * MM_PER_PT;
        let op = DrawOp::Text {
            x_mm,
            y_mm,
            size_pt: self.size_pt,
            style: self.style,
            text: text.to_string(),
        };
        self.current_page().ops.push(op);
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

#[cfg(test)]
impl DocumentBuilder {
    pub fn cursor(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Greedy word wrap at `max_width_mm`.
///
/// Explicit `\n` always breaks. A word wider than the line is split between characters.
/// Empty input yields a single empty line so the caller still advances the cursor.
pub fn wrap_text(text: &str, style: FontStyle, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let metrics = get_metrics(style);
    let measure = |s: &str| metrics.measure_mm(s, size_pt);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure(&candidate) <= max_width_mm {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if measure(word) <= max_width_mm {
                current = word.to_string();
                continue;
            }
            // Hard-split an overlong word; the tail stays open for following words.
            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if !current.is_empty() && measure(&next) > max_width_mm {
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = next;
                }
            }
        }
        lines.push(current);
    }
    lines
}
