//! Post-processing of model-generated resumes.
//!
//! The model output is trusted for content but not for hygiene: lists may
//! contain blank entries, fields may carry stray whitespace, and the HTML
//! snippet must never reach the browser with executable content in it.

use crate::generation::models::{EducationItem, ExperienceItem, ResumeData};

/// Cleans up a model-generated resume in place: trims fields, drops empty
/// list entries, and strips active content from the HTML snippet.
pub fn sanitize_resume(mut resume: ResumeData) -> ResumeData {
    resume.summary = resume.summary.trim().to_string();

    resume.experience = resume
        .experience
        .into_iter()
        .map(|exp| ExperienceItem {
            company: exp.company.trim().to_string(),
            role: exp.role.trim().to_string(),
            start_date: exp.start_date.trim().to_string(),
            end_date: exp.end_date.trim().to_string(),
            description: clean_list(exp.description),
        })
        .collect();

    resume.education = resume
        .education
        .into_iter()
        .map(|edu| EducationItem {
            institution: edu.institution.trim().to_string(),
            degree: edu.degree.trim().to_string(),
            start_date: edu.start_date.trim().to_string(),
            end_date: edu.end_date.trim().to_string(),
        })
        .collect();

    resume.skills = clean_list(resume.skills);
    resume.languages = clean_list(resume.languages);
    resume.html_resume = resume.html_resume.as_deref().and_then(sanitize_html_snippet);

    resume
}

fn clean_list(list: Vec<String>) -> Vec<String> {
    list.into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Strips `<script>` blocks and inline `on*=` event handlers from the HTML
/// snippet. Returns `None` when nothing survives.
fn sanitize_html_snippet(html: &str) -> Option<String> {
    let without_scripts = strip_script_blocks(html);
    let without_events = strip_event_handlers(&without_scripts);
    let trimmed = without_events.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn strip_script_blocks(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut rest = html;
    let lower = |s: &str| s.to_ascii_lowercase();

    loop {
        let lowered = lower(rest);
        let Some(start) = lowered.find("<script") else {
            result.push_str(rest);
            return result;
        };
        result.push_str(&rest[..start]);

        match lowered[start..].find("</script>") {
            Some(end) => rest = &rest[start + end + "</script>".len()..],
            None => return result, // unterminated script tag: drop the tail
        }
    }
}

/// Removes ` on<event>="..."` / ` on<event>='...'` attributes.
fn strip_event_handlers(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut i = 0;

    while i < html.len() {
        if let Some(end) = event_handler_end(html, i) {
            i = end;
            continue;
        }
        match html[i..].chars().next() {
            Some(ch) => {
                result.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }

    result
}

/// If an inline event-handler attribute starts at `i`, returns the index just
/// past its closing quote.
fn event_handler_end(html: &str, i: usize) -> Option<usize> {
    let rest = &html[i..];

    let leading = rest.chars().next()?;
    if !leading.is_whitespace() {
        return None;
    }
    let mut pos = leading.len_utf8();

    if !rest[pos..]
        .get(..2)
        .is_some_and(|p| p.eq_ignore_ascii_case("on"))
    {
        return None;
    }
    pos += 2;

    let name_len: usize = rest[pos..]
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .map(char::len_utf8)
        .sum();
    if name_len == 0 {
        return None;
    }
    pos += name_len;

    pos += rest[pos..].len() - rest[pos..].trim_start().len();
    if !rest[pos..].starts_with('=') {
        return None;
    }
    pos += 1;
    pos += rest[pos..].len() - rest[pos..].trim_start().len();

    let quote = rest[pos..].chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    pos += 1;
    let close = rest[pos..].find(quote)?;

    Some(i + pos + close + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::models::PersonalInfo;

    #[test]
    fn test_blank_list_entries_are_dropped() {
        let resume = ResumeData {
            skills: vec!["  Rust  ".to_string(), "   ".to_string(), String::new()],
            languages: vec!["Español (Nativo)".to_string()],
            ..Default::default()
        };

        let clean = sanitize_resume(resume);
        assert_eq!(clean.skills, vec!["Rust"]);
        assert_eq!(clean.languages, vec!["Español (Nativo)"]);
    }

    #[test]
    fn test_experience_fields_are_trimmed() {
        let resume = ResumeData {
            experience: vec![ExperienceItem {
                company: " Acme ".to_string(),
                role: " Baker ".to_string(),
                start_date: "2020".to_string(),
                end_date: " Presente ".to_string(),
                description: vec![" Dirigí el equipo. ".to_string(), "  ".to_string()],
            }],
            ..Default::default()
        };

        let clean = sanitize_resume(resume);
        assert_eq!(clean.experience[0].company, "Acme");
        assert_eq!(clean.experience[0].end_date, "Presente");
        assert_eq!(clean.experience[0].description, vec!["Dirigí el equipo."]);
    }

    #[test]
    fn test_script_blocks_are_stripped() {
        let resume = ResumeData {
            html_resume: Some("<div>ok</div><script>alert(1)</script><p>fin</p>".to_string()),
            ..Default::default()
        };

        let clean = sanitize_resume(resume);
        assert_eq!(clean.html_resume.as_deref(), Some("<div>ok</div><p>fin</p>"));
    }

    #[test]
    fn test_inline_event_handlers_are_stripped() {
        let resume = ResumeData {
            html_resume: Some(r#"<div onclick="evil()" class="a">hola</div>"#.to_string()),
            ..Default::default()
        };

        let clean = sanitize_resume(resume);
        let html = clean.html_resume.unwrap();
        assert!(!html.contains("onclick"));
        assert!(html.contains(r#"class="a""#));
        assert!(html.contains("hola"));
    }

    #[test]
    fn test_empty_html_becomes_none() {
        let resume = ResumeData {
            html_resume: Some("  <script>only()</script>  ".to_string()),
            ..Default::default()
        };

        assert!(sanitize_resume(resume).html_resume.is_none());
    }

    #[test]
    fn test_untouched_fields_survive() {
        let resume = ResumeData {
            personal_info: PersonalInfo {
                full_name: "Nombre Apellido".to_string(),
                ..Default::default()
            },
            summary: " Resumen. ".to_string(),
            ..Default::default()
        };

        let clean = sanitize_resume(resume);
        assert_eq!(clean.personal_info.full_name, "Nombre Apellido");
        assert_eq!(clean.summary, "Resumen.");
    }
}
