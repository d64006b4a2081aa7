// Job analysis prompt. The wording is a versioned contract with the model's
// behaviour: edit it only together with the normalizer tests.

use crate::jobs::models::CATEGORIES;

pub const JOB_ANALYSIS_PROMPT_VERSION: &str = "2024-06-categories";

pub const JOB_ANALYSIS_PROMPT: &str = r#"You are an AI assistant designed to analyze job descriptions and provide structured output.
Your response MUST be a valid JSON object. Do NOT include any introductory or concluding text,
conversational filler, or any characters outside of the JSON itself.
The output MUST NOT be wrapped in markdown code blocks (e.g., ```json or ```).

Analyze the following job description from a Kenyan job board. Provide a concise summary (max 80 words) suitable for a young audience. Then, evaluate it for legitimacy. Finally, assign a single, relevant category from the following list:
{categories}
If no category perfectly fits, use "Other". **Always provide the most relevant category from the list, even if the job has red flags or is a potential scam.**

Return a JSON object with four keys:
- 'summary': A concise summary (max 80 words) of the job.
- 'verificationScore': An integer from 0-100 (where 100 is completely legitimate).
- 'flags': An array of strings, listing reasons for the score (e.g., 'requests payment', 'vague job details', 'unprofessional language', 'clear application process', 'no red flags'). If there are no specific red flags, include "no red flags".
- 'category': The chosen category from the provided list.

Job Description:
---
{job_description}
---

Output only the JSON object:
"#;

/// Renders the category list the way the prompt has always shown it: `["A", "B", ...]`.
pub fn category_list() -> String {
    let quoted: Vec<String> = CATEGORIES.iter().map(|c| format!("\"{c}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

pub fn build_analysis_prompt(job_description: &str) -> String {
    // Categories first so a description containing "{categories}" is left alone.
    JOB_ANALYSIS_PROMPT
        .replace("{categories}", &category_list())
        .replace("{job_description}", job_description)
}
