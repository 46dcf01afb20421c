use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "My Resume";

// ────────────────────────────────────────────────────────────────────────────
// Template identifiers
// ────────────────────────────────────────────────────────────────────────────

/// The three visual templates a resume can be rendered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    #[default]
    ModernBlue,
    MinimalBlack,
    ClassicLeft,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [
        TemplateId::ModernBlue,
        TemplateId::MinimalBlack,
        TemplateId::ClassicLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::ModernBlue => "modern_blue",
            TemplateId::MinimalBlack => "minimal_black",
            TemplateId::ClassicLeft => "classic_left",
        }
    }

    /// Stored ids outside the known set render with the default template.
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown template '{s}'"))
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    PersonalInfo,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
}

impl Section {
    /// Repeating sections in display order.
    pub const REPEATING: [Section; 6] = [
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Certifications,
        Section::Languages,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            Section::PersonalInfo => "Personal Info",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Certifications => "Certifications",
            Section::Languages => "Languages",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub linkedin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(deserialize_with = "null_as_default")]
    pub photo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub current: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Skill {
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issuer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub proficiency: String,
}

/// Everything a user edits: personal info plus the six repeating sections.
/// Stored as a single JSONB column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeContent {
    #[serde(deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<Skill>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<Language>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn from_nullable<T>(value: serde_json::Value) -> Result<T, serde_json::Error>
where
    T: Default + serde::de::DeserializeOwned,
{
    Ok(serde_json::from_value::<Option<T>>(value)?.unwrap_or_default())
}

impl ResumeContent {
    /// Replaces one section wholesale with the JSON payload. `null` clears it.
    pub fn replace_section(
        &mut self,
        section: Section,
        value: serde_json::Value,
    ) -> Result<(), serde_json::Error> {
        match section {
            Section::PersonalInfo => self.personal_info = from_nullable(value)?,
            Section::Experience => self.experience = from_nullable(value)?,
            Section::Education => self.education = from_nullable(value)?,
            Section::Skills => self.skills = from_nullable(value)?,
            Section::Projects => self.projects = from_nullable(value)?,
            Section::Certifications => self.certifications = from_nullable(value)?,
            Section::Languages => self.languages = from_nullable(value)?,
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Documents
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: TemplateId,
    pub title: String,
    #[serde(flatten)]
    pub content: ResumeContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeDocument {
    /// A fresh document with every field defaulted.
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            template_id: TemplateId::default(),
            title: DEFAULT_TITLE.to_string(),
            content: ResumeContent::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: String,
    pub title: String,
    pub content: Json<ResumeContent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for ResumeDocument {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            template_id: TemplateId::from_stored(&row.template_id),
            title: row.title,
            content: row.content.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Partial update body shared by create, update and autosave.
/// Provided fields replace the stored value wholesale.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    pub template_id: Option<TemplateId>,
    pub title: Option<String>,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
    pub skills: Option<Vec<Skill>>,
    pub projects: Option<Vec<Project>>,
    pub certifications: Option<Vec<Certification>>,
    pub languages: Option<Vec<Language>>,
}

impl ResumePatch {
    pub fn apply_to(self, doc: &mut ResumeDocument) {
        if let Some(template_id) = self.template_id {
            doc.template_id = template_id;
        }
        if let Some(title) = self.title {
            doc.title = title.trim().to_string();
        }
        let content = &mut doc.content;
        if let Some(personal_info) = self.personal_info {
            content.personal_info = personal_info;
        }
        if let Some(experience) = self.experience {
            content.experience = experience;
        }
        if let Some(education) = self.education {
            content.education = education;
        }
        if let Some(skills) = self.skills {
            content.skills = skills;
        }
        if let Some(projects) = self.projects {
            content.projects = projects;
        }
        if let Some(certifications) = self.certifications {
            content.certifications = certifications;
        }
        if let Some(languages) = self.languages {
            content.languages = languages;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_sections_default_to_empty() {
        let content: ResumeContent = serde_json::from_value(json!({
            "personalInfo": { "fullName": "Ada" }
        }))
        .unwrap();
        assert_eq!(content.personal_info.full_name, "Ada");
        assert_eq!(content.personal_info.email, "");
        assert!(content.experience.is_empty());
        assert!(content.languages.is_empty());
    }

    #[test]
    fn test_null_sections_default_to_empty() {
        let content: ResumeContent = serde_json::from_value(json!({
            "personalInfo": null,
            "skills": null
        }))
        .unwrap();
        assert_eq!(content.personal_info, PersonalInfo::default());
        assert!(content.skills.is_empty());
    }

    #[test]
    fn test_null_leaves_default_to_empty_string() {
        let content: ResumeContent = serde_json::from_value(json!({
            "personalInfo": { "fullName": "Ada", "phone": null },
            "experience": [{
                "company": "Acme",
                "position": "Dev",
                "location": null,
                "current": null
            }],
            "languages": [{ "language": null, "proficiency": "Native" }]
        }))
        .unwrap();
        assert_eq!(content.personal_info.full_name, "Ada");
        assert_eq!(content.personal_info.phone, "");
        assert_eq!(content.experience[0].location, "");
        assert!(!content.experience[0].current);
        assert_eq!(content.languages[0].language, "");
    }

    #[test]
    fn test_stored_row_with_null_leaf_decodes() {
        let stored = json!({
            "personalInfo": { "email": null },
            "education": [{ "institution": "MIT", "gpa": null }]
        });
        let content: ResumeContent = serde_json::from_str(&stored.to_string()).unwrap();
        assert_eq!(content.personal_info.email, "");
        assert_eq!(content.education[0].gpa, "");
    }

    #[test]
    fn test_missing_record_fields_default_to_empty_string() {
        let content: ResumeContent = serde_json::from_value(json!({
            "experience": [{ "company": "Acme" }]
        }))
        .unwrap();
        let exp = &content.experience[0];
        assert_eq!(exp.company, "Acme");
        assert_eq!(exp.position, "");
        assert_eq!(exp.end_date, "");
        assert!(!exp.current);
    }

    #[test]
    fn test_template_id_parse() {
        assert_eq!("classic_left".parse::<TemplateId>(), Ok(TemplateId::ClassicLeft));
        assert!("fancy_pink".parse::<TemplateId>().is_err());
    }

    #[test]
    fn test_unknown_stored_template_falls_back_to_default() {
        assert_eq!(TemplateId::from_stored("fancy_pink"), TemplateId::ModernBlue);
        assert_eq!(TemplateId::from_stored("minimal_black"), TemplateId::MinimalBlack);
    }

    #[test]
    fn test_document_serializes_flat_camel_case() {
        let doc = ResumeDocument::new(Uuid::new_v4());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["templateId"], "modern_blue");
        assert_eq!(value["title"], DEFAULT_TITLE);
        assert!(value["personalInfo"].is_object());
        assert!(value["experience"].as_array().unwrap().is_empty());
        assert!(value.get("content").is_none());
    }

    #[test]
    fn test_patch_replaces_only_provided_fields() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        doc.content.skills.push(Skill {
            category: "Languages".into(),
            items: "Rust".into(),
        });

        let patch: ResumePatch = serde_json::from_value(json!({
            "title": "  Backend CV  ",
            "templateId": "classic_left",
            "experience": [{ "company": "Acme", "position": "Dev" }]
        }))
        .unwrap();
        patch.apply_to(&mut doc);

        assert_eq!(doc.title, "Backend CV");
        assert_eq!(doc.template_id, TemplateId::ClassicLeft);
        assert_eq!(doc.content.experience.len(), 1);
        assert_eq!(doc.content.skills.len(), 1);
    }

    #[test]
    fn test_patch_rejects_unknown_template() {
        let result = serde_json::from_value::<ResumePatch>(json!({ "templateId": "fancy_pink" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_replace_section() {
        let mut content = ResumeContent::default();
        content
            .replace_section(
                Section::Languages,
                json!([{ "language": "French", "proficiency": "Native" }]),
            )
            .unwrap();
        assert_eq!(content.languages[0].language, "French");

        content
            .replace_section(Section::PersonalInfo, json!({ "email": "a@b.c" }))
            .unwrap();
        assert_eq!(content.personal_info.email, "a@b.c");

        content.replace_section(Section::Languages, json!(null)).unwrap();
        assert!(content.languages.is_empty());
    }

    #[test]
    fn test_replace_section_rejects_wrong_shape() {
        let mut content = ResumeContent::default();
        assert!(content
            .replace_section(Section::Skills, json!({ "category": "x" }))
            .is_err());
    }

    #[test]
    fn test_section_path_names() {
        let s: Section = serde_json::from_value(json!("personal_info")).unwrap();
        assert_eq!(s, Section::PersonalInfo);
        let s: Section = serde_json::from_value(json!("certifications")).unwrap();
        assert_eq!(s, Section::Certifications);
    }
}
