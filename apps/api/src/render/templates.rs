use serde::Serialize;

use crate::models::resume::TemplateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
}

/// Catalog entry served to the template picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub thumbnail: &'static str,
    pub colors: Palette,
}

pub const TEMPLATES: [TemplateInfo; 3] = [
    TemplateInfo {
        id: TemplateId::ModernBlue,
        name: "Modern Blue",
        description: "Clean and modern design with blue accents",
        thumbnail: "/templates/modern_blue.png",
        colors: Palette {
            primary: "#2563eb",
            secondary: "#1e40af",
            accent: "#3b82f6",
        },
    },
    TemplateInfo {
        id: TemplateId::MinimalBlack,
        name: "Minimal Black",
        description: "Elegant minimalist design in black and white",
        thumbnail: "/templates/minimal_black.png",
        colors: Palette {
            primary: "#1f2937",
            secondary: "#111827",
            accent: "#4b5563",
        },
    },
    TemplateInfo {
        id: TemplateId::ClassicLeft,
        name: "Classic Left",
        description: "Traditional layout with left sidebar",
        thumbnail: "/templates/classic_left.png",
        colors: Palette {
            primary: "#059669",
            secondary: "#047857",
            accent: "#10b981",
        },
    },
];

pub fn template_info(id: TemplateId) -> &'static TemplateInfo {
    match id {
        TemplateId::ModernBlue => &TEMPLATES[0],
        TemplateId::MinimalBlack => &TEMPLATES[1],
        TemplateId::ClassicLeft => &TEMPLATES[2],
    }
}
