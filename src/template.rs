//! Themed surface composition: turn resume data into a renderable surface.
//!
//! The editor renders resume data through numbered templates with a
//! selectable color palette; this module is that composition step for the
//! export side. The wire format (camelCase field names, sections that may be
//! missing entirely) matches the editor's API payloads.

use serde::{Deserialize, Serialize};

use crate::surface::{Style, SurfaceNode};
use crate::Rgb;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub color_palette: Vec<String>,
    pub profile_info: ProfileInfo,
    pub contact_info: ContactInfo,
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileInfo {
    pub full_name: String,
    pub designation: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub github: String,
    pub live_demo: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub name: String,
    pub progress: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub title: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub name: String,
    pub progress: u32,
}

/// Default palette applied when a resume carries none: pale header wash,
/// accent, and muted body ink.
const DEFAULT_PALETTE: [&str; 5] = ["#EBFDFF", "#A1F4FD", "#CEFAFE", "#00B8DB", "#4A5565"];

struct Palette {
    header_bg: Rgb,
    accent: Rgb,
    muted: Rgb,
}

fn resolve_palette(colors: &[String]) -> Palette {
    let pick = |idx: usize, fallback: &str| {
        colors
            .get(idx)
            .and_then(|c| Rgb::from_hex(c))
            .or_else(|| Rgb::from_hex(fallback))
            .unwrap_or(Rgb::BLACK)
    };
    Palette {
        header_bg: pick(0, DEFAULT_PALETTE[0]),
        accent: pick(3, DEFAULT_PALETTE[3]),
        muted: pick(4, DEFAULT_PALETTE[4]),
    }
}

fn heading(text: &str) -> SurfaceNode {
    SurfaceNode::text(
        text,
        Style { font_scale: 2, bold: true, margin: 2.0, ..Style::default() },
    )
}

fn body_line(text: &str, color: Rgb) -> SurfaceNode {
    SurfaceNode::text(text, Style { color, margin: 2.0, ..Style::default() })
}

fn section(title: &str, palette: &Palette, theme: &str, items: Vec<SurfaceNode>) -> SurfaceNode {
    let title_style = Style {
        bold: true,
        color: palette.accent,
        margin: 4.0,
        ..Style::default()
    };
    let mut children = vec![SurfaceNode::text(title.to_uppercase(), title_style)];
    if theme != "01" {
        // Later themes draw a thin accent rule under every section title
        children.push(SurfaceNode::block(Style {
            height: Some(2.0),
            background: Some(palette.accent),
            margin: 2.0,
            ..Style::default()
        }));
    }
    children.extend(items);
    SurfaceNode::block(Style { margin: 8.0, ..Style::default() }).with_children(children)
}

fn date_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => format!(" ({} - Present)", start),
        (true, false) => format!(" (until {})", end),
        (false, false) => format!(" ({} - {})", start, end),
    }
}

/// Compose the renderable surface for a resume under its selected theme and
/// palette. The result is a plain surface tree; staging, width forcing and
/// rasterization are the export pipeline's business.
pub fn compose_surface(resume: &ResumeData) -> SurfaceNode {
    let palette = resolve_palette(&resume.color_palette);
    let theme = resume.theme.as_deref().unwrap_or("01");
    let profile = &resume.profile_info;
    let contact = &resume.contact_info;

    let mut header_children = Vec::new();
    let name = if profile.full_name.is_empty() { "Unnamed" } else { &profile.full_name };
    header_children.push(heading(name));
    if !profile.designation.is_empty() {
        header_children.push(body_line(&profile.designation, palette.muted));
    }
    let contact_line: Vec<&str> = [
        contact.email.as_str(),
        contact.phone.as_str(),
        contact.location.as_str(),
        contact.linkedin.as_str(),
        contact.github.as_str(),
        contact.website.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    if !contact_line.is_empty() {
        header_children.push(body_line(&contact_line.join(" | "), palette.muted));
    }
    let header = SurfaceNode::block(Style {
        background: Some(palette.header_bg),
        padding: 12.0,
        margin: 4.0,
        ..Style::default()
    })
    .with_children(header_children);

    let mut sections = vec![header];

    if !profile.summary.is_empty() {
        sections.push(section("Summary", &palette, theme, vec![body_line(&profile.summary, Rgb::BLACK)]));
    }

    if !resume.work_experience.is_empty() {
        let items = resume
            .work_experience
            .iter()
            .flat_map(|exp| {
                let mut lines = vec![SurfaceNode::text(
                    format!("{} - {}{}", exp.role, exp.company, date_range(&exp.start_date, &exp.end_date)),
                    Style { bold: true, margin: 2.0, ..Style::default() },
                )];
                if !exp.description.is_empty() {
                    lines.push(body_line(&exp.description, palette.muted));
                }
                lines
            })
            .collect();
        sections.push(section("Work Experience", &palette, theme, items));
    }

    if !resume.projects.is_empty() {
        let items = resume
            .projects
            .iter()
            .flat_map(|project| {
                let mut lines = vec![SurfaceNode::text(
                    project.title.clone(),
                    Style { bold: true, margin: 2.0, ..Style::default() },
                )];
                if !project.description.is_empty() {
                    lines.push(body_line(&project.description, palette.muted));
                }
                let links: Vec<&str> = [project.github.as_str(), project.live_demo.as_str()]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect();
                if !links.is_empty() {
                    lines.push(body_line(&links.join(" | "), palette.accent));
                }
                lines
            })
            .collect();
        sections.push(section("Projects", &palette, theme, items));
    }

    if !resume.education.is_empty() {
        let items = resume
            .education
            .iter()
            .map(|edu| {
                body_line(
                    &format!("{} - {}{}", edu.degree, edu.institution, date_range(&edu.start_date, &edu.end_date)),
                    Rgb::BLACK,
                )
            })
            .collect();
        sections.push(section("Education", &palette, theme, items));
    }

    if !resume.skills.is_empty() {
        let names: Vec<&str> = resume.skills.iter().map(|s| s.name.as_str()).collect();
        sections.push(section("Skills", &palette, theme, vec![body_line(&names.join(", "), Rgb::BLACK)]));
    }

    if !resume.certifications.is_empty() {
        let items = resume
            .certifications
            .iter()
            .map(|cert| {
                let year = if cert.year.is_empty() { String::new() } else { format!(" ({})", cert.year) };
                body_line(&format!("{} - {}{}", cert.title, cert.issuer, year), Rgb::BLACK)
            })
            .collect();
        sections.push(section("Certifications", &palette, theme, items));
    }

    if !resume.languages.is_empty() {
        let names: Vec<&str> = resume.languages.iter().map(|l| l.name.as_str()).collect();
        sections.push(section("Languages", &palette, theme, vec![body_line(&names.join(", "), Rgb::BLACK)]));
    }

    if !resume.interests.is_empty() {
        let line = resume.interests.join(", ");
        sections.push(section("Interests", &palette, theme, vec![body_line(&line, Rgb::BLACK)]));
    }

    SurfaceNode::block(Style { padding: 24.0, ..Style::default() }).with_children(sections)
}
