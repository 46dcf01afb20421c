//! The shared filtering pass.
//!
//! Every template consumes the same [`FilteredView`]: repeating-section records
//! survive only when one of their identity fields is visible, and every hidden
//! leaf of a surviving record is blanked so the sentinel never reaches a layout.

use serde::Serialize;

use crate::models::resume::{
    Certification, Education, Experience, Language, PersonalInfo, Project, ResumeContent, Skill,
    TemplateId,
};
use crate::render::visibility::{blank_hidden, is_visible};

/// A record of one of the repeating sections.
pub trait SectionEntry: Clone {
    /// Fields whose visibility alone decides whether the record is displayed.
    const IDENTITY_FIELDS: &'static [&'static str];

    /// Looks up a leaf by its wire name. Unknown names yield `None`.
    fn field(&self, name: &str) -> Option<&str>;

    /// Blanks every leaf that must not be displayed.
    fn scrub(&mut self);
}

/// Keeps the records with at least one visible key field, in their original order.
pub fn filter_entries<T: SectionEntry>(entries: &[T], key_fields: &[&str]) -> Vec<T> {
    entries
        .iter()
        .filter(|entry| {
            key_fields
                .iter()
                .any(|name| entry.field(name).is_some_and(is_visible))
        })
        .cloned()
        .collect()
}

fn retain_section<T: SectionEntry>(entries: &[T]) -> Vec<T> {
    let mut kept = filter_entries(entries, T::IDENTITY_FIELDS);
    kept.iter_mut().for_each(T::scrub);
    kept
}

/// Template-agnostic, display-ready resume content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    pub template_id: TemplateId,
    #[serde(flatten)]
    pub content: ResumeContent,
}

/// Pure read path: never touches the stored document.
pub fn render_view(content: &ResumeContent, template_id: TemplateId) -> FilteredView {
    let mut personal_info = content.personal_info.clone();
    scrub_personal_info(&mut personal_info);

    FilteredView {
        template_id,
        content: ResumeContent {
            personal_info,
            experience: retain_section(&content.experience),
            education: retain_section(&content.education),
            skills: retain_section(&content.skills),
            projects: retain_section(&content.projects),
            certifications: retain_section(&content.certifications),
            languages: retain_section(&content.languages),
        },
    }
}

fn scrub_personal_info(info: &mut PersonalInfo) {
    for leaf in [
        &mut info.full_name,
        &mut info.email,
        &mut info.phone,
        &mut info.location,
        &mut info.linkedin,
        &mut info.website,
        &mut info.photo,
        &mut info.summary,
    ] {
        blank_hidden(leaf);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section record impls
// ────────────────────────────────────────────────────────────────────────────

impl SectionEntry for Experience {
    const IDENTITY_FIELDS: &'static [&'static str] = &["company", "position"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "company" => Some(&self.company),
            "position" => Some(&self.position),
            "location" => Some(&self.location),
            "startDate" => Some(&self.start_date),
            "endDate" => Some(&self.end_date),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn scrub(&mut self) {
        for leaf in [
            &mut self.company,
            &mut self.position,
            &mut self.location,
            &mut self.start_date,
            &mut self.end_date,
            &mut self.description,
        ] {
            blank_hidden(leaf);
        }
    }
}

impl SectionEntry for Education {
    const IDENTITY_FIELDS: &'static [&'static str] = &["institution", "degree"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "institution" => Some(&self.institution),
            "degree" => Some(&self.degree),
            "field" => Some(&self.field),
            "location" => Some(&self.location),
            "startDate" => Some(&self.start_date),
            "endDate" => Some(&self.end_date),
            "gpa" => Some(&self.gpa),
            _ => None,
        }
    }

    fn scrub(&mut self) {
        for leaf in [
            &mut self.institution,
            &mut self.degree,
            &mut self.field,
            &mut self.location,
            &mut self.start_date,
            &mut self.end_date,
            &mut self.gpa,
        ] {
            blank_hidden(leaf);
        }
    }
}

impl SectionEntry for Skill {
    const IDENTITY_FIELDS: &'static [&'static str] = &["category", "items"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "category" => Some(&self.category),
            "items" => Some(&self.items),
            _ => None,
        }
    }

    fn scrub(&mut self) {
        blank_hidden(&mut self.category);
        blank_hidden(&mut self.items);
    }
}

impl SectionEntry for Project {
    const IDENTITY_FIELDS: &'static [&'static str] = &["name"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "technologies" => Some(&self.technologies),
            "link" => Some(&self.link),
            _ => None,
        }
    }

    fn scrub(&mut self) {
        for leaf in [
            &mut self.name,
            &mut self.description,
            &mut self.technologies,
            &mut self.link,
        ] {
            blank_hidden(leaf);
        }
    }
}

impl SectionEntry for Certification {
    const IDENTITY_FIELDS: &'static [&'static str] = &["name"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "issuer" => Some(&self.issuer),
            "date" => Some(&self.date),
            "link" => Some(&self.link),
            _ => None,
        }
    }

    fn scrub(&mut self) {
        for leaf in [
            &mut self.name,
            &mut self.issuer,
            &mut self.date,
            &mut self.link,
        ] {
            blank_hidden(leaf);
        }
    }
}

impl SectionEntry for Language {
    const IDENTITY_FIELDS: &'static [&'static str] = &["language"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "language" => Some(&self.language),
            "proficiency" => Some(&self.proficiency),
            _ => None,
        }
    }

    fn scrub(&mut self) {
        blank_hidden(&mut self.language);
        blank_hidden(&mut self.proficiency);
    }
}
