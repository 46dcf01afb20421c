//! The three template arrangements.
//!
//! Each arrangement receives the same [`FilteredView`] and only decides
//! placement: which column a block lands in and what its heading reads.
//! Within a column, sections keep the fixed display order.

use serde::Serialize;

use crate::models::resume::{Section, TemplateId};
use crate::render::compose::{
    certification_item, education_item, experience_item, language_item, project_item, skill_item,
    Item,
};
use crate::render::FilteredView;
use crate::render::templates::{template_info, Palette};
use crate::render::visibility::shown;

/// Print target: one continuous flow at A4 width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageGeometry {
    pub paper: &'static str,
    pub width_mm: u16,
    pub continuous: bool,
}

pub const A4_CONTINUOUS: PageGeometry = PageGeometry {
    paper: "A4",
    width_mm: 210,
    continuous: true,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Email,
    Phone,
    Location,
    Linkedin,
    Website,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub kind: ContactKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Photo {
        src: String,
    },
    Header {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        contact_heading: Option<&'static str>,
        contacts: Vec<Contact>,
    },
    Summary {
        #[serde(skip_serializing_if = "Option::is_none")]
        heading: Option<&'static str>,
        text: String,
    },
    Section {
        section: Section,
        heading: &'static str,
        items: Vec<Item>,
    },
    /// Blocks set side by side.
    Row {
        blocks: Vec<Block>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Main,
    Sidebar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub role: ColumnRole,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationTree {
    pub template_id: TemplateId,
    pub palette: Palette,
    pub page: PageGeometry,
    pub columns: Vec<Column>,
}

/// Arranges a filtered view with the template it was filtered for.
pub fn layout(view: &FilteredView) -> PresentationTree {
    let columns = match view.template_id {
        TemplateId::ModernBlue => arrange_modern_blue(view),
        TemplateId::MinimalBlack => arrange_minimal_black(view),
        TemplateId::ClassicLeft => arrange_classic_left(view),
    };
    PresentationTree {
        template_id: view.template_id,
        palette: template_info(view.template_id).colors,
        page: A4_CONTINUOUS,
        columns,
    }
}

/// Single column.
fn arrange_modern_blue(view: &FilteredView) -> Vec<Column> {
    let mut blocks = vec![header_block(view, None)];
    blocks.extend(summary_block(view, None));
    for section in Section::REPEATING {
        let heading = match section {
            Section::Experience => "Work Experience",
            other => other.heading(),
        };
        blocks.extend(section_block(view, section, heading));
    }
    vec![Column {
        role: ColumnRole::Main,
        blocks,
    }]
}

/// Single column; certifications and languages share a trailing row.
fn arrange_minimal_black(view: &FilteredView) -> Vec<Column> {
    let mut blocks = vec![header_block(view, None)];
    blocks.extend(summary_block(view, None));
    for section in [
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
    ] {
        blocks.extend(section_block(view, section, section.heading()));
    }

    let row: Vec<Block> = [Section::Certifications, Section::Languages]
        .into_iter()
        .filter_map(|section| section_block(view, section, section.heading()))
        .collect();
    if !row.is_empty() {
        blocks.push(Block::Row { blocks: row });
    }

    vec![Column {
        role: ColumnRole::Main,
        blocks,
    }]
}

/// Photo-bearing sidebar with contact, skills and languages; everything else in main.
fn arrange_classic_left(view: &FilteredView) -> Vec<Column> {
    let mut sidebar = Vec::new();
    if let Some(src) = shown(&view.content.personal_info.photo) {
        sidebar.push(Block::Photo {
            src: src.to_string(),
        });
    }
    sidebar.push(header_block(view, Some("Contact")));
    for section in [Section::Skills, Section::Languages] {
        sidebar.extend(section_block(view, section, section.heading()));
    }

    let mut main = Vec::new();
    main.extend(summary_block(view, Some("Profile")));
    for section in [
        Section::Experience,
        Section::Education,
        Section::Projects,
        Section::Certifications,
    ] {
        main.extend(section_block(view, section, section.heading()));
    }

    vec![
        Column {
            role: ColumnRole::Sidebar,
            blocks: sidebar,
        },
        Column {
            role: ColumnRole::Main,
            blocks: main,
        },
    ]
}

fn header_block(view: &FilteredView, contact_heading: Option<&'static str>) -> Block {
    let info = &view.content.personal_info;
    let contacts = [
        (ContactKind::Email, &info.email),
        (ContactKind::Phone, &info.phone),
        (ContactKind::Location, &info.location),
        (ContactKind::Linkedin, &info.linkedin),
        (ContactKind::Website, &info.website),
    ]
    .into_iter()
    .filter_map(|(kind, value)| {
        shown(value).map(|v| Contact {
            kind,
            value: v.to_string(),
        })
    })
    .collect();

    Block::Header {
        name: shown(&info.full_name).map(str::to_string),
        contact_heading,
        contacts,
    }
}

fn summary_block(view: &FilteredView, heading: Option<&'static str>) -> Option<Block> {
    shown(&view.content.personal_info.summary).map(|text| Block::Summary {
        heading,
        text: text.to_string(),
    })
}

fn section_block(view: &FilteredView, section: Section, heading: &'static str) -> Option<Block> {
    let items = section_items(view, section);
    (!items.is_empty()).then_some(Block::Section {
        section,
        heading,
        items,
    })
}

fn section_items(view: &FilteredView, section: Section) -> Vec<Item> {
    let content = &view.content;
    match section {
        Section::PersonalInfo => Vec::new(),
        Section::Experience => content.experience.iter().map(experience_item).collect(),
        Section::Education => content.education.iter().map(education_item).collect(),
        Section::Skills => content.skills.iter().map(skill_item).collect(),
        Section::Projects => content.projects.iter().map(project_item).collect(),
        Section::Certifications => content.certifications.iter().map(certification_item).collect(),
        Section::Languages => content.languages.iter().map(language_item).collect(),
    }
}
