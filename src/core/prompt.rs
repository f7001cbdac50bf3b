use serde::{Deserialize, Serialize};

/// One numbered section the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSection {
    pub emoji: String,
    pub title: String,
    pub instruction: String,
}

impl PromptSection {
    fn new(emoji: &str, title: &str, instruction: &str) -> Self {
        Self {
            emoji: emoji.to_string(),
            title: title.to_string(),
            instruction: instruction.to_string(),
        }
    }
}

/// Instruction block sent ahead of the weather and news data.
///
/// `{location}` inside a section title or instruction is replaced with the
/// configured location name when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    pub persona: String,
    pub language: String,
    pub sections: Vec<PromptSection>,
    pub format_rules: Vec<String>,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            persona: "You are a Personal Intelligence Assistant.".to_string(),
            language: "Arabic".to_string(),
            sections: vec![
                PromptSection::new(
                    "🌤️",
                    "Weather ({location})",
                    "Summarize the provided weather data.",
                ),
                PromptSection::new(
                    "⚽",
                    "Sports",
                    "Focus on Wydad AC, Real Madrid, Morocco Team. If no news, say \"No major updates\".",
                ),
                PromptSection::new(
                    "🌍",
                    "Top News",
                    "Pick top 5 stories (Politics/Biz). Deduplicate.",
                ),
            ],
            format_rules: vec![
                "Use HTML tags: <b>, <i>, <a>.".to_string(),
                "NO <br>, NO <div>, NO Markdown (*).".to_string(),
                "Emoji headers.".to_string(),
            ],
        }
    }
}

impl PromptTemplate {
    pub fn render_instructions(&self, location: &str) -> String {
        let mut out = format!(
            "{} Create a Morning Brief in {}.\n\nStructure:\n",
            self.persona, self.language
        );

        for (index, section) in self.sections.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} <b>{}</b>: {}\n",
                index + 1,
                section.emoji,
                section.title.replace("{location}", location),
                section.instruction.replace("{location}", location)
            ));
        }

        out.push_str("\nFormat Rules:\n");
        for rule in &self.format_rules {
            out.push_str(&format!("- {}\n", rule));
        }

        out
    }

    /// Full request text: instructions, a blank line, then the labelled data.
    pub fn compose(&self, location: &str, weather: &str, news: &str) -> String {
        format!(
            "{}\n\nWeather Data:\n{}\n\nNews Data:\n{}",
            self.render_instructions(location).trim_end(),
            weather,
            news
        )
    }
}
