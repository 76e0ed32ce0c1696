//! CV template: turns a `ResumeRecord` into a laid-out `Document`.
//!
//! Section order is fixed: career objective, skills, education, achievements,
//! certificates, reference. A section whose data is empty is left out entirely.

use crate::cv::models::ResumeRecord;
use crate::layout::document::{Align, Document, DocumentBuilder, HeaderLine, PageGeometry};
use crate::layout::font_metrics::FontStyle;

pub const PAGE_MARGIN_MM: f32 = 15.0;

const TITLE_SIZE_PT: f32 = 24.0;
const HEADING_SIZE_PT: f32 = 14.0;
const BODY_SIZE_PT: f32 = 10.0;

const HEADING_HEIGHT_MM: f32 = 7.0;
const BODY_LINE_MM: f32 = 5.0;
const SKILL_LINE_MM: f32 = 6.0;
const SKILL_LABEL_WIDTH_MM: f32 = 45.0;
const EDUCATION_TITLE_WIDTH_MM: f32 = 120.0;

const SECTION_GAP_MM: f32 = 5.0;
const LIST_GAP_MM: f32 = 3.0;

const CONTACT_SEPARATOR: &str = " | ";

/// Lays out the full CV for a record. Pure: same record, same document.
pub fn layout_resume(record: &ResumeRecord) -> Document {
    let mut doc = DocumentBuilder::new(PageGeometry::a4(PAGE_MARGIN_MM), page_header(record));

    if !record.career_objective.is_empty() {
        section_title(&mut doc, "Career Objective");
        doc.set_font(FontStyle::Regular, BODY_SIZE_PT);
        doc.multi_cell(None, BODY_LINE_MM, &record.career_objective);
        doc.ln(SECTION_GAP_MM);
    }

    if record.has_skills() {
        section_title(&mut doc, "Skills");
        for (label, value) in [
            ("Technical Skills", &record.technical_skills),
            ("Level", &record.technical_level),
            ("Transferable", &record.transferable_skills),
        ] {
            if value.is_empty() {
                continue;
            }
            doc.set_font(FontStyle::Bold, BODY_SIZE_PT);
            doc.cell(
                Some(SKILL_LABEL_WIDTH_MM),
                SKILL_LINE_MM,
                &format!("{label}:"),
                Align::Left,
            );
            doc.set_font(FontStyle::Regular, BODY_SIZE_PT);
            doc.multi_cell(None, SKILL_LINE_MM, value);
        }
        doc.ln(SECTION_GAP_MM);
    }

    if !record.educations.is_empty() {
        section_title(&mut doc, "Education");
        for education in &record.educations {
            doc.set_font(FontStyle::Bold, BODY_SIZE_PT);
            doc.cell(
                Some(EDUCATION_TITLE_WIDTH_MM),
                BODY_LINE_MM,
                &education.education_title,
                Align::Left,
            );
            doc.set_font(FontStyle::Regular, BODY_SIZE_PT);
            doc.cell_ln(None, BODY_LINE_MM, &education.education_years, Align::Right);
        }
        doc.ln(SECTION_GAP_MM);
    }

    dated_list(
        &mut doc,
        "Achievements",
        record
            .achievements
            .iter()
            .map(|a| (a.achievement_title.as_str(), a.achievement_year.as_str())),
    );
    dated_list(
        &mut doc,
        "Certificates",
        record
            .certificates
            .iter()
            .map(|c| (c.certificate_title.as_str(), c.certificate_year.as_str())),
    );

    if !record.reference_name.is_empty() {
        section_title(&mut doc, "Reference");
        doc.set_font(FontStyle::Regular, BODY_SIZE_PT);
        doc.multi_cell(None, BODY_LINE_MM, &reference_block(record));
    }

    doc.finish()
}

/// Name in capitals over the contact line. Repeated on every page.
fn page_header(record: &ResumeRecord) -> Vec<HeaderLine> {
    let contact = contact_line(record);
    vec![
        HeaderLine {
            text: record.name.to_uppercase(),
            style: FontStyle::Bold,
            size_pt: TITLE_SIZE_PT,
            height_mm: 10.0,
            gap_after_mm: 2.0,
        },
        HeaderLine {
            text: contact,
            style: FontStyle::Regular,
            size_pt: BODY_SIZE_PT,
            // An empty contact line still reserves its slot so the body starts at the same height.
            height_mm: 5.0,
            gap_after_mm: 5.0,
        },
    ]
}

/// `"<city> <state> | <email> | <phone> | <link>"` with empty parts and their separators dropped.
pub fn contact_line(record: &ResumeRecord) -> String {
    let location = [record.city.trim(), record.state.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    [
        location.as_str(),
        record.email.trim(),
        record.phone_number.trim(),
        record.linkedin.trim(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(CONTACT_SEPARATOR)
}

fn reference_block(record: &ResumeRecord) -> String {
    format!(
        "{}\n{}, {}\n{}\nEmail: {} | Phone: {}",
        record.reference_name,
        record.reference_role,
        record.reference_department,
        record.reference_institution,
        record.reference_email,
        record.reference_phone_number,
    )
}

/// Upper-case bold heading with a rule under it.
fn section_title(doc: &mut DocumentBuilder, title: &str) {
    doc.set_font(FontStyle::Bold, HEADING_SIZE_PT);
    doc.cell_ln(None, HEADING_HEIGHT_MM, &title.to_uppercase(), Align::Left);
    doc.rule();
    doc.ln(LIST_GAP_MM);
}

/// `- <title> (<year>)` per entry; nothing at all for an empty list.
fn dated_list<'a, I>(doc: &mut DocumentBuilder, title: &str, items: I)
where
    I: ExactSizeIterator<Item = (&'a str, &'a str)>,
{
    if items.len() == 0 {
        return;
    }
    section_title(doc, title);
    doc.set_font(FontStyle::Regular, BODY_SIZE_PT);
    for (text, year) in items {
        doc.multi_cell(None, BODY_LINE_MM, &format!("- {text} ({year})"));
    }
    doc.ln(LIST_GAP_MM);
}
