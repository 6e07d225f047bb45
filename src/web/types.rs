// file: src/web/types.rs
// description: JSON envelopes, view models and error mapping of the HTTP API
// reference: https://docs.rs/axum/latest/axum/response/index.html

use super::session::DisplaySettings;
use crate::error::SearchError;
use crate::models::{Facets, PagedResult, Paragraph, ParagraphField};
use crate::results::{HighlightKind, highlight_field_content};
use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

impl PageParams {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

/// Paragraph with its fields rendered for display.
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphView {
    pub id: u64,
    pub score: f64,
    pub genre: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub chunk: u64,
    pub char_count: u64,
    pub word_count: u64,
    pub language: String,
    pub ocr_quality: String,
    pub source_uuid: String,
    pub source: String,
    pub book_id: Option<u64>,
    pub datetime: Option<String>,
    pub context_page: u64,
}

impl ParagraphView {
    pub fn render(paragraph: &Paragraph, single_line: bool, page_size: usize) -> Self {
        let text = |field| highlight_field_content(paragraph, field, HighlightKind::Text, true);
        let document = &paragraph.document;

        Self {
            id: paragraph.id,
            score: paragraph.score,
            genre: text(ParagraphField::Genre),
            author: text(ParagraphField::Author),
            title: text(ParagraphField::Title),
            content: highlight_field_content(
                paragraph,
                ParagraphField::Content,
                HighlightKind::Markdown,
                single_line,
            ),
            chunk: document.chunk,
            char_count: document.char_count,
            word_count: document.word_count,
            language: document.language.clone(),
            ocr_quality: document.ocr_quality.clone(),
            source_uuid: document.source_uuid.clone(),
            source: document.source.clone(),
            book_id: document.book_id,
            datetime: paragraph.datetime_utc().map(|dt| dt.to_rfc3339()),
            context_page: paragraph.context_page(page_size),
        }
    }

    pub fn page(
        results: PagedResult<Paragraph>,
        single_line: bool,
        page_size: usize,
    ) -> PagedResult<ParagraphView> {
        results.map(|p| ParagraphView::render(&p, single_line, page_size))
    }
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub results: PagedResult<ParagraphView>,
    pub facets: Facets,
    pub notice: Option<String>,
    pub settings: DisplaySettings,
}

pub struct ApiError(pub SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(SearchError::InvalidArgument(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(SearchError::InvalidArgument(rejection.body_text()))
    }
}

pub fn status_for(err: &SearchError) -> StatusCode {
    match err {
        SearchError::EmptyQuery | SearchError::InvalidIdList(_) | SearchError::InvalidArgument(_) => {
            StatusCode::BAD_REQUEST
        }
        SearchError::NotFound(_) => StatusCode::NOT_FOUND,
        SearchError::Engine { .. } | SearchError::Http(_) | SearchError::Decode(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.0.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
