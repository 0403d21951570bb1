//! Writing-assistant operations built on the provider chain.
//!
//! Each operation owns its prompt and sampling settings. Operations with a
//! built-in fallback never fail; the rest return [`AiError`] so callers can
//! choose how to report it.

use super::client::{AiClient, AiError, ChatMessage, Completion, CompletionRequest};
use super::fallback;
use super::text::{self, Originality};
use tracing::{debug, warn};

/// Inputs longer than this are reduced to a short topic before headlines.
const HEADLINE_TOPIC_CHARS: usize = 100;

/// Output of an operation that may have used a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub value: T,
    pub message: String,
    /// True when a provider produced the value.
    pub from_provider: bool,
}

/// Target size of a generated article.
fn word_count(length: &str) -> &'static str {
    match length {
        "short" => "300-500 words",
        "long" => "1500-2000 words",
        _ => "800-1200 words",
    }
}

#[derive(Debug, Clone)]
pub struct AiService {
    client: AiClient,
}

impl AiService {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }

    fn served_by(completion: &Completion) -> String {
        format!("{} ({})", completion.provider, completion.model)
    }

    /// Full article on `topic`, markers stripped.
    pub async fn generate_blog(&self, topic: &str, length: &str, language: &str) -> Generated<String> {
        let system = format!(
            "You are an expert analyst and subject matter authority. You must write the article in {language}. \
             Your goal is to write a deep, insightful article about the TOPIC itself. \
             CRITICAL RULE: Do NOT write a tutorial, 'how-to', or guide on 'how to blog' or 'how to use' the topic. \
             If the topic is a company (e.g. 'Microsoft', 'Google'), write about its history, business, products, and impact on the world. \
             If the topic is 'Microsoft', do NOT write about 'creating a blog on Microsoft'. Write about the tech giant itself. \
             Directly address the subject matter with facts, history, social, and economic analysis. \
             Use a 'Premium' tone: authoritative, sophisticated, and engaging. \
             Structure: Introduction (hook), Key Concepts (deep dive), Real-world Examples, and a Thought-provoking Conclusion. \
             Do NOT include the Title at the very top, as it is handled separately. \
             Start directly with the introduction."
        );
        let user = format!(
            "Write a comprehensive, analytical article about: '{topic}' in {language}. \
             Target length: {}. \
             Use markdown with clear headings (##, ###), bullet points, and bold text for emphasis.",
            word_count(length)
        );

        let request = CompletionRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)], 2000)
            .temperature(0.7);

        match self.client.complete(&request).await {
            Ok(completion) => Generated {
                value: text::strip_image_markers(&completion.text),
                message: format!("Blog generated using {}.", Self::served_by(&completion)),
                from_provider: true,
            },
            Err(e) => {
                debug!("Blog generation falling back to template: {}", e);
                Generated {
                    value: fallback::blog_article(topic, length),
                    message: "Blog generated using the built-in template (AI services not configured or failed)."
                        .to_string(),
                    from_provider: false,
                }
            }
        }
    }

    /// Two or three paragraph summary.
    pub async fn summarize(&self, content: &str) -> Generated<String> {
        let content = content.trim();
        let rule_based = "Summary generated using simple rule-based logic.".to_string();

        if content.is_empty() {
            return Generated {
                value: "No content was provided to summarize.".to_string(),
                message: rule_based,
                from_provider: false,
            };
        }

        let request = CompletionRequest::new(
            vec![
                ChatMessage::system("You are a helpful assistant that summarizes text clearly and concisely."),
                ChatMessage::user(format!(
                    "Summarize the following text in 2-3 short paragraphs:\n\n{content}"
                )),
            ],
            500,
        )
        .temperature(0.4);

        match self.client.complete(&request).await {
            Ok(completion) => Generated {
                message: format!("Summary generated using {}.", Self::served_by(&completion)),
                value: completion.text,
                from_provider: true,
            },
            Err(_) => Generated {
                value: fallback::summary(content),
                message: rule_based,
                from_provider: false,
            },
        }
    }

    /// Reduce long input to a short topic line.
    async fn headline_topic(&self, content: &str) -> String {
        if content.chars().count() <= HEADLINE_TOPIC_CHARS {
            return content.to_string();
        }

        let request = CompletionRequest::new(
            vec![
                ChatMessage::system(
                    "Extract the main topic from this text in 5-10 words. Do not explain, just state the topic.",
                ),
                ChatMessage::user(content),
            ],
            50,
        );

        match self.client.complete(&request).await {
            Ok(completion) => completion.text.trim().to_string(),
            Err(e) => {
                debug!("Topic extraction failed: {}", e);
                text::truncate_chars(content, HEADLINE_TOPIC_CHARS).to_string()
            }
        }
    }

    /// Five headline ideas.
    pub async fn headlines(&self, content: &str) -> Generated<Vec<String>> {
        let base = match content.trim() {
            "" => "Your Topic",
            trimmed => trimmed,
        };
        let topic = self.headline_topic(base).await;

        let request = CompletionRequest::new(
            vec![
                ChatMessage::system(
                    "You are an expert copywriter. Create 5 catchy, high-converting, and SEO-friendly blog titles based on the topic provided.",
                ),
                ChatMessage::user(format!(
                    "Topic: {topic}\n\nGenerate 5 distinct headlines. Output ONLY the headlines, one per line. \
                     Do NOT use quotation marks. Do NOT number them."
                )),
            ],
            200,
        )
        .temperature(0.8);

        if let Ok(completion) = self.client.complete(&request).await {
            let headlines = text::parse_headlines(&completion.text);
            if !headlines.is_empty() {
                return Generated {
                    value: headlines,
                    message: format!("Headlines generated using {}.", Self::served_by(&completion)),
                    from_provider: true,
                };
            }
            warn!("{} returned no usable headlines", completion.provider);
        }

        Generated {
            value: fallback::headlines(&topic),
            message: "Headlines generated using simple templates (no external API).".to_string(),
            from_provider: false,
        }
    }

    /// Rewrite `content` in `tone`.
    pub async fn change_tone(&self, content: &str, tone: &str) -> Result<Generated<String>, AiError> {
        let request = CompletionRequest::new(
            vec![
                ChatMessage::system(format!(
                    "You are an expert editor. Rewrite the following text to have a '{tone}' tone. \
                     Keep the meaning the same, but change the style and vocabulary."
                )),
                ChatMessage::user(format!("Original Text:\n{content}\n\nRewritten Text ({tone}):")),
            ],
            1000,
        )
        .temperature(0.7);

        let completion = self.client.complete(&request).await?;
        Ok(Generated {
            message: format!("Tone changed to {} using {}.", tone, completion.provider),
            value: completion.text,
            from_provider: true,
        })
    }

    /// Corrected text in `language`.
    pub async fn grammar_check(&self, content: &str, language: &str) -> Result<Generated<String>, AiError> {
        let request = CompletionRequest::new(
            vec![
                ChatMessage::system(format!(
                    "You are a strict grammar editor. Fix all grammar, spelling, punctuation, and awkward phrasing in the text. \
                     Return ONLY the corrected text. Do not add any explanations. Output in {language}."
                )),
                ChatMessage::user(format!("Original Text:\n{content}\n\nCorrected Text:")),
            ],
            2000,
        )
        .temperature(0.2);

        let completion = self.client.complete(&request).await?;
        Ok(Generated {
            message: format!(
                "Grammar checked using {} in {}.",
                Self::served_by(&completion),
                language
            ),
            value: completion.text,
            from_provider: true,
        })
    }

    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String, AiError> {
        let request = CompletionRequest::new(
            vec![
                ChatMessage::system(format!(
                    "You are a professional translator. Translate the following text into {target_language}. \
                     Return ONLY the translated text, no explanations."
                )),
                ChatMessage::user(text),
            ],
            2000,
        )
        .temperature(0.3);

        Ok(self.client.complete(&request).await?.text)
    }

    /// Originality review; returns the parsed score and the provider name.
    pub async fn plagiarism_check(
        &self,
        content: &str,
        language: &str,
    ) -> Result<(Originality, String), AiError> {
        let request = CompletionRequest::new(
            vec![
                ChatMessage::system(format!(
                    "You are an AI detection tool. Analyze the text for AI generation patterns. \
                     Provide an 'Originality Score' (0-100) and a brief analysis in {language}. \
                     Output format:\nScore: [Number]\nAnalysis: [Explanation]"
                )),
                ChatMessage::user(format!("Analyze this text:\n\n{content}")),
            ],
            300,
        )
        .temperature(0.3);

        let completion = self.client.complete(&request).await?;
        Ok((text::parse_originality(&completion.text), completion.provider))
    }

    /// Short description of an image in `language`.
    pub async fn caption_image(&self, image_base64: &str, language: &str) -> Result<String, AiError> {
        let request = CompletionRequest::new(
            vec![ChatMessage::user_with_image(
                format!("Describe this image in detail. Output the description in {language}."),
                text::strip_data_url_prefix(image_base64),
            )],
            500,
        )
        .temperature(0.5)
        .vision();

        Ok(self.client.complete(&request).await?.text)
    }

    /// Detailed description of an image, suitable as blog source material.
    pub async fn analyze_image(&self, image_base64: &str) -> Result<Completion, AiError> {
        let request = CompletionRequest::new(
            vec![
                ChatMessage::system(
                    "You are an expert visual analyst. Describe this image in great detail. \
                     Focus on the main subject, setting, colors, mood, and any text visible. \
                     The goal is to use this description to write a full blog post.",
                ),
                ChatMessage::user_with_image(
                    "Describe this image in detail for a blog post.",
                    text::strip_data_url_prefix(image_base64),
                ),
            ],
            500,
        )
        .temperature(0.6)
        .vision();

        self.client.complete(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> AiService {
        AiService::new(AiClient::new(vec![], 5).unwrap())
    }

    #[tokio::test]
    async fn test_offline_blog_uses_template() {
        let generated = offline().generate_blog("space travel", "short", "English").await;
        assert!(!generated.from_provider);
        assert!(generated.value.contains("# space travel"));
        assert!(generated.message.contains("built-in template"));
    }

    #[tokio::test]
    async fn test_offline_summary() {
        let service = offline();

        let empty = service.summarize("   ").await;
        assert_eq!(empty.value, "No content was provided to summarize.");

        let summary = service.summarize("A. B. C. D.").await;
        assert_eq!(summary.value, "A. B. C...");
        assert!(!summary.from_provider);
    }

    #[tokio::test]
    async fn test_offline_headlines_use_truncated_topic() {
        let service = offline();

        let short = service.headlines("").await;
        assert_eq!(short.value[0], "Everything You Need to Know About Your Topic");

        let long_input = "x".repeat(150);
        let long = service.headlines(&long_input).await;
        assert_eq!(long.value[1], format!("Getting Started with {}", "x".repeat(100)));
    }

    #[tokio::test]
    async fn test_offline_operations_without_fallback_fail() {
        let service = offline();
        assert!(matches!(service.translate("hola", "English").await, Err(AiError::NoProviders)));
        assert!(service.change_tone("hi", "formal").await.is_err());
        assert!(service.grammar_check("hi", "English").await.is_err());
        assert!(service.plagiarism_check("hi", "English").await.is_err());
        assert!(service.analyze_image("data:image/png;base64,QUJD").await.is_err());
    }
}
