//! OpenAI-backed adapters: binary classifier, document grader, answer
//! generator, and query embedder.
//!
//! One chat client implements [`Classifier`], [`Grader`], and [`Generator`]
//! with different prompts, mirroring how the three calls share a model and an
//! API key in production. Requires `OPENAI_API_KEY` (or an explicit
//! [`OpenAIConfig`]).

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};
use async_trait::async_trait;
use tracing::debug;

use crate::error::AdapterError;
use crate::state::DocumentSet;

use super::{Classifier, Embedder, Generator, Grader, Label, Provenance};

const CLASSIFY_SYSTEM: &str = "\
You are a strict binary classifier. You will receive a user question and must \
respond with only one word: 'yes' or 'no'. No other text, punctuation, or \
capitalization. Answer 'yes' if the question is about food recipes, cooking, \
ingredients, or flavors; 'no' otherwise.";

const GRADE_SYSTEM: &str = "\
You are a grader assessing whether a retrieved document can help answer a \
user's food question. Grade 'yes' when the document shares keywords, concepts, \
or semantic meaning with the question: a matching recipe, ingredients, or a \
general food idea counts. Related ingredients and dishes count for a specific \
food type; a cuisine within a broader region the user named counts; consider \
synonyms and subsets (e.g. 'Asian' covers 'Thai' or 'Korean') even when the \
exact word is absent. Grade 'no' only when the document is completely \
unrelated to the question. Reply with the single word 'yes' or 'no'.";

const GENERATE_SYSTEM: &str = "\
You are an expert personal cooking assistant. First decide the source line: \
when Documents Relevant is 'yes', the recipe comes from the personal recipe \
collection; when Documents Relevant is 'no' and Web Search is 'yes', it comes \
from outside sources; in all other cases state no source. Then write a \
detailed recipe from the provided context, keeping every ingredient and step. \
Start with the source statement when one applies, and answer in a casual, \
caring tone.";

/// OpenAI Chat Completions client implementing the three LLM capabilities.
///
/// Uses `OPENAI_API_KEY` from the environment by default; pass a custom
/// [`OpenAIConfig`] for another key or base URL. Share one instance behind
/// `Arc` so classifier, grader, and generator reuse the same connection pool.
pub struct OpenAiChat {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiChat {
    /// Build with default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    /// Build with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: 0.0,
        }
    }

    /// Set temperature (0–2). Defaults to 0 for deterministic grading.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// One system+user completion returning the assistant text.
    async fn complete(&self, system: &str, user: String) -> Result<String, AdapterError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(system)),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                user.as_str(),
            )),
        ];
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| AdapterError::Transport(format!("request build failed: {}", e)))?;

        debug!(model = %self.model, "OpenAI chat create");
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AdapterError::Transport(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AdapterError::MalformedOutput("no choices in completion".to_string()))?;
        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(AdapterError::MalformedOutput(
                "empty completion content".to_string(),
            )),
        }
    }
}

/// Parses a yes/no reply, tolerating case and surrounding prose.
fn parse_binary(reply: &str) -> Result<Label, AdapterError> {
    let lower = reply.to_lowercase();
    if lower.contains("yes") {
        Ok(Label::Yes)
    } else if lower.contains("no") {
        Ok(Label::No)
    } else {
        Err(AdapterError::MalformedOutput(format!(
            "expected yes/no, got {:?}",
            reply
        )))
    }
}

#[async_trait]
impl Classifier for OpenAiChat {
    async fn classify(&self, question: &str) -> Result<Label, AdapterError> {
        let reply = self
            .complete(CLASSIFY_SYSTEM, format!("User question: {}", question))
            .await?;
        parse_binary(&reply)
    }
}

#[async_trait]
impl Grader for OpenAiChat {
    async fn grade(
        &self,
        question: &str,
        documents: &DocumentSet,
    ) -> Result<Label, AdapterError> {
        let user = format!(
            "Retrieved document:\n\n{}\n\nUser question: {}",
            documents.as_text(),
            question
        );
        let reply = self.complete(GRADE_SYSTEM, user).await?;
        parse_binary(&reply)
    }
}

#[async_trait]
impl Generator for OpenAiChat {
    async fn generate(
        &self,
        question: &str,
        context: &DocumentSet,
        provenance: Provenance,
    ) -> Result<String, AdapterError> {
        let user = format!(
            "Retrieved document:\n\n{}\n\nUser question: {}\n\nFrom web search: {:?}\n\n\
             Recipe relevant: {:?}\n\nDocuments relevant: {:?}\n\nGenerate answer",
            context.as_text(),
            question,
            provenance.web_search,
            provenance.recipe_relevant,
            provenance.documents_relevant,
        );
        self.complete(GENERATE_SYSTEM, user).await
    }
}

/// OpenAI Embeddings client implementing [`Embedder`].
///
/// Default model `text-embedding-3-small`; the retriever only needs a query
/// vector, so single-input requests are enough.
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiEmbedder {
    /// Build with default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    /// Build with custom config.
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AdapterError> {
        let request = CreateEmbeddingRequest {
            input: EmbeddingInput::String(text.to_string()),
            model: self.model.clone(),
            ..Default::default()
        };
        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| AdapterError::Transport(format!("OpenAI API error: {}", e)))?;
        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AdapterError::MalformedOutput("no embedding returned".to_string()))
    }
}
