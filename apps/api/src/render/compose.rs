//! Text composition for a single section item.
//!
//! These rules are shared by every template. Layouts only decide where an
//! [`Item`] goes, never what it says.

use serde::Serialize;

use crate::models::resume::{Certification, Education, Experience, Language, Project, Skill};
use crate::render::visibility::{is_visible, shown};

/// End-date label for an experience entry that has no visible end date.
pub const PRESENT: &str = "Present";

const SEPARATOR: &str = " • ";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn owned(value: &str) -> Option<String> {
    shown(value).map(str::to_string)
}

fn or_blank(value: &str) -> &str {
    shown(value).unwrap_or_default()
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

pub fn experience_item(exp: &Experience) -> Item {
    let mut subtitle = or_blank(&exp.company).to_string();
    if let Some(location) = shown(&exp.location) {
        subtitle.push_str(SEPARATOR);
        subtitle.push_str(location);
    }

    let date = (is_visible(&exp.start_date) || is_visible(&exp.end_date)).then(|| {
        format!(
            "{} - {}",
            or_blank(&exp.start_date),
            shown(&exp.end_date).unwrap_or(PRESENT)
        )
    });

    Item {
        title: or_blank(&exp.position).to_string(),
        subtitle: non_empty(subtitle),
        date,
        link: None,
        description: owned(&exp.description),
    }
}

/// Unlike experience, an education range has no "Present" fallback:
/// a missing end date renders as nothing.
pub fn education_item(edu: &Education) -> Item {
    let mut title = or_blank(&edu.degree).to_string();
    if let Some(field) = shown(&edu.field) {
        title.push_str(" in ");
        title.push_str(field);
    }

    let mut subtitle = or_blank(&edu.institution).to_string();
    if let Some(location) = shown(&edu.location) {
        subtitle.push_str(SEPARATOR);
        subtitle.push_str(location);
    }
    if let Some(gpa) = shown(&edu.gpa) {
        subtitle.push_str(SEPARATOR);
        subtitle.push_str("GPA: ");
        subtitle.push_str(gpa);
    }

    let date = (is_visible(&edu.start_date) || is_visible(&edu.end_date)).then(|| {
        format!(
            "{} - {}",
            or_blank(&edu.start_date),
            or_blank(&edu.end_date)
        )
    });

    Item {
        title,
        subtitle: non_empty(subtitle),
        date,
        link: None,
        description: None,
    }
}

pub fn skill_item(skill: &Skill) -> Item {
    let title = match (shown(&skill.category), shown(&skill.items)) {
        (Some(category), Some(items)) => format!("{category}: {items}"),
        (Some(category), None) => category.to_string(),
        (None, Some(items)) => items.to_string(),
        (None, None) => String::new(),
    };
    Item {
        title,
        ..Item::default()
    }
}

/// The name is printed as-is: the filter already required it to be visible.
pub fn project_item(project: &Project) -> Item {
    Item {
        title: project.name.clone(),
        subtitle: owned(&project.technologies),
        date: None,
        link: owned(&project.link),
        description: owned(&project.description),
    }
}

pub fn certification_item(cert: &Certification) -> Item {
    Item {
        title: cert.name.clone(),
        subtitle: owned(&cert.issuer),
        date: owned(&cert.date),
        link: None,
        description: None,
    }
}

pub fn language_item(lang: &Language) -> Item {
    let title = match shown(&lang.proficiency) {
        Some(proficiency) => format!("{} - {proficiency}", lang.language),
        None => lang.language.clone(),
    };
    Item {
        title,
        ..Item::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(start: &str, end: &str) -> Experience {
        Experience {
            company: "Acme".into(),
            position: "Dev".into(),
            start_date: start.into(),
            end_date: end.into(),
            ..Default::default()
        }
    }

    fn education(start: &str, end: &str) -> Education {
        Education {
            institution: "MIT".into(),
            degree: "BSc".into(),
            start_date: start.into(),
            end_date: end.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_experience_missing_end_falls_back_to_present() {
        let item = experience_item(&experience("Jan 2020", ""));
        assert_eq!(item.date.as_deref(), Some("Jan 2020 - Present"));
    }

    #[test]
    fn test_experience_sentinel_end_falls_back_to_present() {
        let item = experience_item(&experience("2019", "NA"));
        assert_eq!(item.date.as_deref(), Some("2019 - Present"));
    }

    #[test]
    fn test_experience_end_only_still_renders_range() {
        let item = experience_item(&experience("", "Dec 2022"));
        assert_eq!(item.date.as_deref(), Some(" - Dec 2022"));
    }

    #[test]
    fn test_experience_without_dates_has_no_date() {
        assert_eq!(experience_item(&experience("", "")).date, None);
        assert_eq!(experience_item(&experience("na", "NA")).date, None);
    }

    #[test]
    fn test_experience_title_and_subtitle() {
        let mut exp = experience("2019", "2021");
        exp.location = "Berlin".into();
        exp.description = "Built the billing pipeline".into();
        let item = experience_item(&exp);
        assert_eq!(item.title, "Dev");
        assert_eq!(item.subtitle.as_deref(), Some("Acme • Berlin"));
        assert_eq!(item.date.as_deref(), Some("2019 - 2021"));
        assert_eq!(item.description.as_deref(), Some("Built the billing pipeline"));
    }

    #[test]
    fn test_experience_hidden_location_and_description() {
        let mut exp = experience("2019", "");
        exp.location = "NA".into();
        exp.description = "na".into();
        let item = experience_item(&exp);
        assert_eq!(item.subtitle.as_deref(), Some("Acme"));
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_education_has_no_end_fallback() {
        let item = education_item(&education("2016", ""));
        assert_eq!(item.date.as_deref(), Some("2016 - "));
    }

    #[test]
    fn test_education_sentinel_end_renders_blank() {
        let item = education_item(&education("2016", "NA"));
        assert_eq!(item.date.as_deref(), Some("2016 - "));
    }

    #[test]
    fn test_education_without_dates_has_no_date() {
        assert_eq!(education_item(&education("", "")).date, None);
    }

    #[test]
    fn test_education_full_composition() {
        let edu = Education {
            field: "Computer Science".into(),
            location: "Cambridge".into(),
            gpa: "3.9".into(),
            ..education("2012", "2016")
        };
        let item = education_item(&edu);
        assert_eq!(item.title, "BSc in Computer Science");
        assert_eq!(item.subtitle.as_deref(), Some("MIT • Cambridge • GPA: 3.9"));
        assert_eq!(item.date.as_deref(), Some("2012 - 2016"));
    }

    #[test]
    fn test_education_gpa_without_location() {
        let edu = Education {
            gpa: "3.5".into(),
            location: "NA".into(),
            field: "na".into(),
            ..education("", "")
        };
        let item = education_item(&edu);
        assert_eq!(item.title, "BSc");
        assert_eq!(item.subtitle.as_deref(), Some("MIT • GPA: 3.5"));
    }

    #[test]
    fn test_skill_composition() {
        let both = Skill { category: "Languages".into(), items: "Rust, Go".into() };
        assert_eq!(skill_item(&both).title, "Languages: Rust, Go");

        let items_only = Skill { category: "NA".into(), items: "Docker".into() };
        assert_eq!(skill_item(&items_only).title, "Docker");

        let category_only = Skill { category: "Cloud".into(), items: "".into() };
        assert_eq!(skill_item(&category_only).title, "Cloud");
    }

    #[test]
    fn test_project_fields_are_gated_individually() {
        let project = Project {
            name: "folio".into(),
            description: "NA".into(),
            technologies: "Rust, Axum".into(),
            link: "".into(),
        };
        let item = project_item(&project);
        assert_eq!(item.title, "folio");
        assert_eq!(item.subtitle.as_deref(), Some("Rust, Axum"));
        assert_eq!(item.link, None);
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_certification_composition() {
        let cert = Certification {
            name: "CKA".into(),
            issuer: "CNCF".into(),
            date: "na".into(),
            link: "https://example.com".into(),
        };
        let item = certification_item(&cert);
        assert_eq!(item.title, "CKA");
        assert_eq!(item.subtitle.as_deref(), Some("CNCF"));
        assert_eq!(item.date, None);
    }

    #[test]
    fn test_language_composition() {
        let with = Language { language: "German".into(), proficiency: "B2".into() };
        assert_eq!(language_item(&with).title, "German - B2");

        let without = Language { language: "German".into(), proficiency: "NA".into() };
        assert_eq!(language_item(&without).title, "German");
    }
}
