//! System instruction and structured-output schema for resume generation.

use serde_json::{json, Value};

pub const RESUME_SYSTEM_INSTRUCTION: &str = r#"
You are an expert professional resume writer specializing in the Puerto Rico and US job markets.
Your goal is to transform unstructured text into a high-quality, professional resume JSON structure **and** a polished HTML resume layout built with TailwindCSS utility classes that will fit neatly within an 8.5x11in preview container.

CONTEXT:
- Target audience: Recruiters in Puerto Rico and USA.
- Standard Format: Chronological, clean, professional.

INSTRUCTIONS:
1. **Language**: Output primarily in Spanish (Neutral/Puerto Rico). If the input is heavily English, maintain English for proper nouns but format descriptions in Spanish unless the user seems to want an English resume. Default to Spanish.
2. **Contact Info**: Extract phone (format: (XXX) XXX-XXXX), email, LinkedIn. If location is missing but context implies PR, suggest "Puerto Rico".
3. **Experience**:
   - Rewrite bullet points to start with strong action verbs (e.g., "Implementé", "Dirigí", "Aumenté").
   - Quantify achievements where possible (e.g., "aumentó ventas un 20%").
   - If dates are missing, use "Presente" or estimate based on context, or leave blank if unknown.
4. **Skills**: Extract hard skills (software, tools) and soft skills relevant to the role.
5. **Education**: Format nicely (e.g., "Universidad de Puerto Rico" instead of "UPR").
6. **Tone**: Professional, confident, concise.
7. **HTML Layout**: Always populate "htmlResume" with a single self-contained HTML/JSX snippet. Use Tailwind utility classes only (no <html> or <head> tags). Respect an 8.5x11in canvas by using wrappers like <div class="max-w-[8.5in] min-h-[11in] mx-auto p-10"> and balanced spacing to avoid overflow. Ensure headings, contact info, sections, and bullet points are neatly arranged and readable when printed.

INPUT HANDLING:
- The input might be raw text, una lista de empleos o un PDF de LinkedIn.
- Ignore irrelevant text (like "References available upon request").
- If the input is very short, creatively expand on implied duties for that specific job title to provide a good starting draft.
- Si se comparte una descripción de puesto, adapta el resumen y los logros para enfatizar competencias solicitadas (sin inventar información no presente).
- Si se incluye un enlace de vacante, úsalo solo como referencia contextual. No inventes detalles ni nombres de empresa que no aparezcan en el texto proporcionado.
"#;

/// Builds the user prompt from the raw career text plus optional targeting
/// context.
pub fn build_resume_prompt(
    text: &str,
    job_description: Option<&str>,
    job_link: Option<&str>,
) -> String {
    let role_context = job_description
        .map(|jd| format!("\n\nTARGET JOB DESCRIPTION PROVIDED BY USER:\n{jd}\n"))
        .unwrap_or_default();
    let link_context = job_link
        .map(|link| {
            format!("\n\nJOB POSTING LINK (reference only, do not fabricate unseen details): {link}")
        })
        .unwrap_or_default();

    format!(
        "Please create a professional resume from the following text:\n\n{text}{role_context}{link_context}"
    )
}

/// Response schema for structured resume output (Gemini structured-output
/// schema dialect).
pub fn resume_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "personalInfo": {
                "type": "OBJECT",
                "properties": {
                    "fullName": { "type": "STRING" },
                    "jobTitle": { "type": "STRING" },
                    "email": { "type": "STRING" },
                    "phone": { "type": "STRING" },
                    "location": { "type": "STRING" },
                    "linkedin": { "type": "STRING" },
                    "website": { "type": "STRING" }
                },
                "required": ["fullName"]
            },
            "summary": { "type": "STRING" },
            "experience": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "company": { "type": "STRING" },
                        "role": { "type": "STRING" },
                        "startDate": { "type": "STRING" },
                        "endDate": { "type": "STRING" },
                        "description": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["company", "role", "description"]
                }
            },
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "institution": { "type": "STRING" },
                        "degree": { "type": "STRING" },
                        "startDate": { "type": "STRING" },
                        "endDate": { "type": "STRING" }
                    },
                    "required": ["institution"]
                }
            },
            "skills": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "languages": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "htmlResume": { "type": "STRING" }
        },
        "required": ["personalInfo", "summary", "experience", "education", "skills"]
    })
}
