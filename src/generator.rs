use std::future::Future;
use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::GeneratorConfig;
use crate::error::{GenerationServiceError, QuizError};
use crate::parser::parse_document;
use crate::quiz::QuestionSet;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates quiz questions in Russian. \
You answer with a single JSON document only: no Markdown, no code blocks, no text before or after it.";

/// Source of question sets for a topic.
pub trait GenerateQuestions {
    fn generate(
        &self,
        topic: &str,
        count: usize,
    ) -> impl Future<Output = Result<QuestionSet, QuizError>> + Send;
}

/// Builds quizzes through an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct QuestionGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl QuestionGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, QuizError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenerationServiceError::from)?;
        Ok(Self { client, config })
    }

    fn request(&self, topic: &str, count: usize) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(topic, count),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            n: 1,
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, GenerationServiceError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log::info!("Generation service responded with {}", status);

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_owned());
            log::error!("Generation service error: {}", message);
            return Err(GenerationServiceError::Status { status, message });
        }

        let body: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationServiceError::MalformedResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| GenerationServiceError::MalformedResponse("no generated text".into()))
    }
}

impl GenerateQuestions for QuestionGenerator {
    #[instrument(level = "info", skip(self))]
    async fn generate(&self, topic: &str, count: usize) -> Result<QuestionSet, QuizError> {
        let request = self.request(topic, count);
        let started = Instant::now();

        let content = self.complete(&request).await?;
        log::info!(
            "Received generated document for '{}' in {:?}",
            topic,
            started.elapsed()
        );
        log::debug!("Generated document: {}", content);

        let document = parse_document(&content)?;
        if !document.skipped.is_empty() {
            log::warn!(
                "Dropped {} malformed question(s) for '{}'",
                document.skipped.len(),
                topic
            );
        }
        if document.questions.is_empty() {
            return Err(QuizError::EmptyGeneration);
        }

        log::info!(
            "Parsed {} of {} requested questions for '{}'",
            document.questions.len(),
            count,
            topic
        );
        Ok(document.questions)
    }
}

/// Sends the waiting notice, then runs the generation.
///
/// The notice future is awaited to completion before the generator is polled. A
/// notice that fails to send is logged and the generation still goes ahead.
pub async fn notify_then_generate<G, N, E>(
    generator: &G,
    topic: &str,
    count: usize,
    notice: N,
) -> Result<QuestionSet, QuizError>
where
    G: GenerateQuestions,
    N: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    if let Err(e) = notice.await {
        log::warn!("Failed to send generation notice: {}", e);
    }
    generator.generate(topic, count).await
}

pub fn user_prompt(topic: &str, count: usize) -> String {
    format!(
        r#"Generate a list of {count} multiple-choice quiz questions in Russian about the topic: "{topic}".
The answer must be a JSON document with this structure:
{{
  "questions": [
    {{
      "title": "Текст вопроса здесь",
      "answers": [
        {{"letter": "A", "text": "Вариант ответа 1", "correct": false}},
        {{"letter": "B", "text": "Вариант ответа 2", "correct": false}},
        {{"letter": "C", "text": "Вариант ответа 3", "correct": true}},
        {{"letter": "D", "text": "Вариант ответа 4", "correct": false}}
      ],
      "explanation": "Подробное объяснение правильного ответа"
    }}
  ]
}}

Make each question specific, informative, and accurate. Each question should have four different answer options, with exactly one correct answer marked with "correct": true. Provide a full explanation in Russian for why the correct answer is correct. Avoid repeating questions or explanations. Add emojis where appropriate.

Important: output only the JSON document. Do not include Markdown formatting, code blocks, or any additional text."#
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    n: u8,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_embeds_topic_and_count() {
        let prompt = user_prompt("История Рима", 7);
        assert!(prompt.contains("7 multiple-choice"));
        assert!(prompt.contains("\"История Рима\""));
        assert!(prompt.contains("\"correct\": true"));
    }

    #[test]
    fn request_carries_model_and_both_messages() {
        let generator =
            QuestionGenerator::new(GeneratorConfig::new("sk-test").with_model("gpt-test")).unwrap();
        let request = serde_json::to_value(generator.request("космос", 3)).unwrap();

        assert_eq!(request["model"], "gpt-test");
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][1]["role"], "user");
        assert_eq!(request["max_tokens"], 4000);
        assert_eq!(request["n"], 1);
        assert!(request["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("космос"));
    }
}
