//! Paints a laid-out `Document` with printpdf.
//!
//! Layout works top-down in millimetres; PDF user space grows upwards from the
//! bottom-left corner, so every y is flipped against the page height here.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use crate::layout::{Document, DrawOp, FontStyle};
use crate::render::RenderError;

const LAYER_NAME: &str = "Content";
const PT_PER_MM: f32 = 72.0 / 25.4;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

pub fn paint(document: &Document, title: &str) -> Result<Vec<u8>, RenderError> {
    let width = Mm(document.geometry.width_mm);
    let height_mm = document.geometry.height_mm;
    let height = Mm(height_mm);

    let (pdf, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let fonts = Fonts {
        regular: pdf
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        bold: pdf
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
    };

    for (index, page) in document.pages.iter().enumerate() {
        let layer = if index == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page_index).get_layer(layer_index)
        };

        for op in &page.ops {
            paint_op(&layer, &fonts, op, height_mm);
        }
    }

    pdf.save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn paint_op(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp, page_height_mm: f32) {
    match op {
        DrawOp::Text {
            x_mm,
            y_mm,
            size_pt,
            style,
            text,
        } => {
            layer.use_text(
                text.as_str(),
                *size_pt,
                Mm(*x_mm),
                Mm(page_height_mm - y_mm),
                fonts.get(*style),
            );
        }
        DrawOp::Rule {
            x1_mm,
            x2_mm,
            y_mm,
            thickness_mm,
        } => {
            let y = Mm(page_height_mm - y_mm);
            layer.set_outline_thickness(thickness_mm * PT_PER_MM);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1_mm), y), false),
                    (Point::new(Mm(*x2_mm), y), false),
                ],
                is_closed: false,
            });
        }
    }
}
