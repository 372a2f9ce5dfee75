//! Prompt templates for the specialised assistant tasks.

pub const STORYTELLER_SYSTEM_PROMPT: &str =
    "You are a creative storyteller. Write vivid, imaginative short stories with a clear beginning, middle and end.";

pub const REVIEWER_SYSTEM_PROMPT: &str =
    "You are an experienced software engineer performing a careful, constructive code review.";

pub const STORY_MIN_TEMPERATURE: f32 = 0.9;
pub const REVIEW_MAX_TEMPERATURE: f32 = 0.3;

pub fn story(prompt: &str) -> String {
    format!(
        "Write a short, engaging story about {}. Keep it under 300 words.",
        prompt.trim()
    )
}

pub fn code_review(code: &str) -> String {
    format!(
        "Please review the following code. Comment on:\n\
         1. Correctness and potential bugs\n\
         2. Performance\n\
         3. Readability and style\n\
         4. Concrete suggestions for improvement\n\n\
         ```\n{}\n```",
        code.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_prompt_embeds_topic() {
        let p = story("  a dragon who is afraid of flying ");
        assert!(p.contains("about a dragon who is afraid of flying."));
    }

    #[test]
    fn review_prompt_fences_code() {
        let p = code_review("\ndef f():\n    return 1\n");
        assert!(p.ends_with("```\ndef f():\n    return 1\n```"));
        assert!(p.contains("Correctness"));
    }
}
