// Question generation prompt templates.

pub const QUESTION_GENERATION_SYSTEM: &str = "\
You are a senior technical interviewer preparing a mock interview. \
Questions must be specific to the role and the listed technologies, \
and every reference answer must be concise and technically correct. \
You MUST respond with a JSON array only, no markdown fences, no explanations.";

pub const QUESTION_GENERATION_PROMPT: &str = r#"Generate a JSON array with {count} technical interview questions and answers for:
- Position: {position}
- Description: {description}
- Experience: {experience} years
- Stack: {tech_stack}

Strict JSON: [{"question": "...", "answer": "..."}]
Return ONLY the JSON array and nothing else, no code fences."#;
