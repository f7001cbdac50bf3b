use crate::core::prompt::PromptTemplate;
use crate::domain::model::StageOutput;
use crate::domain::ports::LanguageModel;

pub const AI_ERROR_LABEL: &str = "AI Error";

/// Asks the model for the brief. On failure the error text becomes the brief.
pub async fn generate_brief(
    model: &dyn LanguageModel,
    template: &PromptTemplate,
    location: &str,
    weather: &str,
    news: &str,
) -> StageOutput {
    let prompt = template.compose(location, weather, news);

    match model.generate(&prompt).await {
        Ok(text) => {
            tracing::info!("🧠 Brief generated ({} characters)", text.chars().count());
            StageOutput::Ready(text)
        }
        Err(e) => {
            tracing::warn!("⚠️ Brief generation failed: {}", e);
            StageOutput::degraded(AI_ERROR_LABEL, e)
        }
    }
}
