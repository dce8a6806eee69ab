//! System/user prompt pairs for report sections and clarifying questions.

use super::Talk;

pub fn section_prompts(section_title: &str, context: &str, tone: &str, style: &str) -> Vec<Talk> {
    let system = format!(
        "You are a world-class business consultant and your task is to generate a section of a report.
- You will be given a section title and the full context from source documents.
- Your response MUST be based ONLY on the provided context.
- You MUST include evidence-backed citations after every statement or claim.
- Citations should reference the source, like this: [cite: filename, page X], [cite: filename, slide X], [cite: filename, sheet: SheetName], or [cite: filename, para X].
- The response should be in well-structured Markdown format.
- Use a {tone} tone and {style} writing style.
- Be comprehensive and thorough in your analysis."
    );

    let user = format!(
        "Generate the content for the section: \"{section_title}\".

Here is the full context from the source documents:
---
{context}
---"
    );

    vec![Talk::system(system), Talk::user(user)]
}

const CLARIFY_SYSTEM: &str = "You are an AI consultant assistant. Based on the user's template sections and uploaded files,
generate 2-3 clarifying questions that would help create a better, more targeted document.
Focus on:
- Missing information that would be valuable
- Scope clarification
- Audience and purpose questions
- Specific requirements or constraints

Keep questions concise and actionable.";

/// `file_previews` holds one `- name: preview...` line per file.
pub fn clarify_prompts(template: &[String], file_previews: &[String]) -> Vec<Talk> {
    let user = format!(
        "Template sections: {}

Uploaded files summary:
{}

What clarifying questions would help create a better document?",
        template.join(", "),
        file_previews.join("\n"),
    );

    vec![Talk::system(CLARIFY_SYSTEM.to_string()), Talk::user(user)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    #[test]
    fn test_section_prompts() {
        let messages = section_prompts("Key Findings", "[START DOCUMENT: a.pdf]", "casual", "narrative");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("Use a casual tone and narrative writing style."));
        assert!(messages[0].content.contains("[cite: filename, sheet: SheetName]"));
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("section: \"Key Findings\""));
        assert!(messages[1].content.contains("---\n[START DOCUMENT: a.pdf]\n---"));
    }

    #[test]
    fn test_clarify_prompts() {
        let template = vec!["Summary".to_string(), "Risks".to_string()];
        let previews = vec!["- a.txt: hello...".to_string(), "- b.txt: world...".to_string()];
        let messages = clarify_prompts(&template, &previews);
        assert!(messages[0].content.contains("2-3 clarifying questions"));
        assert!(messages[1].content.contains("Template sections: Summary, Risks"));
        assert!(messages[1].content.contains("- a.txt: hello...\n- b.txt: world..."));
    }
}
