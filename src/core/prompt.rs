pub const DEFAULT_TARGET_COUNT: usize = 5;
pub const DEFAULT_TARGET_LANGUAGE: &str = "Japanese";

/// 產生給文字生成器的指令
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    target_count: usize,
    language: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_COUNT, DEFAULT_TARGET_LANGUAGE)
    }
}

impl PromptBuilder {
    pub fn new(target_count: usize, language: impl Into<String>) -> Self {
        Self {
            target_count,
            language: language.into(),
        }
    }

    pub fn build(&self, topic: &str) -> String {
        let count = self.target_count;
        let language = &self.language;

        format!(
            "**SYSTEM INSTRUCTION: Your only function is to act as a fact-checking web research bot. \
Providing inaccurate information will be heavily penalized.**\n\n\
**TASK:**\n\
1. Search the real web for the user's topic \"{topic}\".\n\
2. Find **{count}** learning resources that are best suited for beginners on this topic. \
Include a balanced mix of **different resource types** such as videos, technical articles, \
official documentation and tutorials.\n\
3. **Verify every URL.** You must confirm that each URL exists and does not return a 404 \
or a missing page. This is the most important step.\n\
4. **Language constraint:** every resource must be written in **{language}**. \
Never include content in any other language.\n\
5. Output only verified information, in the JSON format below. \
**Never output any text, explanation or Markdown formatting outside the JSON structure.**\n\n\
**CRITICAL RULE:** If you cannot find and verify {count} real {language} URLs for a category, \
return only the ones you found. **Never invent URLs.**\n\n\
**JSON OUTPUT FORMAT:**\n\
{{\"resources\": [{{\"type\": \"resource type (e.g. video, article, official documentation)\", \
\"title\": \"exact content title\", \"url\": \"verified URL\"}}]}}"
        )
    }
}
