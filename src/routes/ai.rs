//! `/api/ai` handlers.
//!
//! Every tool call is logged to `ai_usage`; the logged success flag says
//! whether a provider (rather than a fallback) produced the answer.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::db::{blogs, usage, users};
use crate::error::{ApiError, ApiResult};
use crate::models::{AiTool, NewBlog};
use crate::state::SharedState;

fn default_length() -> String {
    "medium".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

#[derive(Debug, Deserialize)]
pub struct GenerateBlogRequest {
    pub topic: String,
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ToneRequest {
    pub content: String,
    pub tone: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageContentRequest {
    pub content: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub image_base64: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    #[allow(dead_code)] // Accepted for client compatibility
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct TextToSpeechRequest {
    #[allow(dead_code)] // Accepted for client compatibility
    pub text: String,
    #[allow(dead_code)]
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn language_or_default(language: Option<String>) -> String {
    language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(default_language)
}

/// Log a tool call. Failures are reported but never fail the request.
async fn record_usage(state: &SharedState, tool: AiTool, success: bool) {
    if let Err(e) = state
        .db
        .call(move |conn| usage::record(conn, tool.as_str(), success))
        .await
    {
        warn!("Failed to log AI usage for {}: {}", tool, e);
    }
}

pub async fn generate_blog(
    State(state): State<SharedState>,
    Json(request): Json<GenerateBlogRequest>,
) -> ApiResult<Json<Value>> {
    let topic = match request.topic.trim() {
        "" => "your topic".to_string(),
        trimmed => trimmed.to_string(),
    };

    let generated = state
        .ai
        .generate_blog(&topic, &request.length, &request.language)
        .await;
    record_usage(&state, AiTool::BlogGenerator, generated.from_provider).await;

    let user_id = request.user_id;
    let content = generated.value.clone();
    let saved = state
        .db
        .call(move |conn| {
            let author = match user_id {
                Some(id) => users::get(conn, id)?.map(|u| u.full_name),
                None => None,
            };
            blogs::insert(
                conn,
                &NewBlog {
                    title: topic,
                    content,
                    author: author.unwrap_or_else(|| "AI Generated".to_string()),
                    user_id,
                    tags: vec!["AI Generated".to_string()],
                },
            )
        })
        .await;

    let blog_id = match saved {
        Ok(blog) => {
            info!("Saved generated blog {} ({})", blog.id, blog.title);
            Some(blog.id)
        }
        Err(e) => {
            warn!("Failed to save generated blog: {}", e);
            None
        }
    };

    Ok(Json(json!({
        "success": true,
        "content": generated.value,
        "message": generated.message,
        "blog_id": blog_id,
    })))
}

pub async fn summarize(
    State(state): State<SharedState>,
    Json(request): Json<ContentRequest>,
) -> Json<Value> {
    let generated = state.ai.summarize(&request.content).await;
    record_usage(&state, AiTool::Summarizer, generated.from_provider).await;

    Json(json!({
        "success": true,
        "summary": generated.value,
        "message": generated.message,
    }))
}

pub async fn generate_headline(
    State(state): State<SharedState>,
    Json(request): Json<ContentRequest>,
) -> Json<Value> {
    let generated = state.ai.headlines(&request.content).await;
    record_usage(&state, AiTool::HeadlineGenerator, generated.from_provider).await;

    Json(json!({
        "success": true,
        "headlines": generated.value,
        "message": generated.message,
    }))
}

pub async fn change_tone(
    State(state): State<SharedState>,
    Json(request): Json<ToneRequest>,
) -> Json<Value> {
    let result = state.ai.change_tone(&request.content, &request.tone).await;
    record_usage(&state, AiTool::ToneChanger, result.is_ok()).await;

    match result {
        Ok(generated) => Json(json!({
            "success": true,
            "content": generated.value,
            "message": generated.message,
        })),
        Err(e) => {
            warn!("Tone change failed: {}", e);
            Json(json!({
                "success": false,
                "content": "Could not change tone. Please check backend logs.",
            }))
        }
    }
}

pub async fn grammar_check(
    State(state): State<SharedState>,
    Json(request): Json<LanguageContentRequest>,
) -> Json<Value> {
    let language = language_or_default(request.language);
    let result = state.ai.grammar_check(&request.content, &language).await;
    record_usage(&state, AiTool::GrammarChecker, result.is_ok()).await;

    match result {
        Ok(generated) => Json(json!({
            "success": true,
            "corrected_content": generated.value,
            "message": generated.message,
        })),
        Err(e) => {
            warn!("Grammar check failed: {}", e);
            Json(json!({
                "success": false,
                "corrected_content": request.content,
                "message": "Could not check grammar. Backend error.",
            }))
        }
    }
}

pub async fn translate(
    State(state): State<SharedState>,
    Json(request): Json<TranslateRequest>,
) -> ApiResult<Json<Value>> {
    let result = state.ai.translate(&request.text, &request.target_language).await;
    record_usage(&state, AiTool::Translator, result.is_ok()).await;

    Ok(Json(json!({ "translated_text": result? })))
}

pub async fn plagiarism_check(
    State(state): State<SharedState>,
    Json(request): Json<LanguageContentRequest>,
) -> ApiResult<Json<Value>> {
    let language = language_or_default(request.language);
    let result = state.ai.plagiarism_check(&request.content, &language).await;
    record_usage(&state, AiTool::PlagiarismChecker, result.is_ok()).await;

    let (originality, provider) = result?;
    Ok(Json(json!({
        "success": true,
        "originality_score": originality.score,
        "is_original": originality.is_original(),
        "message": format!("{} Analysis in {}: {}", provider, language, originality.analysis),
    })))
}

pub async fn image_caption(
    State(state): State<SharedState>,
    Json(request): Json<ImageRequest>,
) -> ApiResult<Json<Value>> {
    let language = language_or_default(request.language);
    let result = state.ai.caption_image(&request.image_base64, &language).await;
    record_usage(&state, AiTool::ImageCaptioner, result.is_ok()).await;

    match result {
        Ok(caption) => Ok(Json(json!({ "caption": caption }))),
        Err(e) => {
            warn!("Image caption failed: {}", e);
            Err(ApiError::Internal("Failed to generate caption".to_string()))
        }
    }
}

pub async fn analyze_image(
    State(state): State<SharedState>,
    Json(request): Json<ImageRequest>,
) -> Json<Value> {
    let result = state.ai.analyze_image(&request.image_base64).await;
    record_usage(&state, AiTool::ImageAnalyzer, result.is_ok()).await;

    match result {
        Ok(completion) => Json(json!({
            "success": true,
            "caption": completion.text,
            "message": format!("Image analysis generated using {} vision.", completion.provider),
        })),
        Err(e) => Json(json!({
            "success": false,
            "caption": format!("Vision AI failed. Last error: {}", e),
            "message": format!("Vision AI failed: {}", e),
        })),
    }
}

pub async fn generate_image(Json(_request): Json<GenerateImageRequest>) -> Json<Value> {
    Json(json!({
        "success": false,
        "message": "Image generation is currently disabled.",
    }))
}

pub async fn text_to_speech(Json(_request): Json<TextToSpeechRequest>) -> Json<Value> {
    Json(json!({
        "success": false,
        "message": "Text-to-Speech is currently disabled.",
    }))
}
