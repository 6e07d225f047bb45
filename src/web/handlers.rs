// file: src/web/handlers.rs
// description: axum handlers of the JSON search API
// reference: https://docs.rs/axum/latest/axum/extract/index.html

use super::AppState;
use super::session::{DisplaySettings, SettingsUpdate};
use super::types::{ApiError, ApiResponse, PageParams, ParagraphView, SearchView};
use crate::models::{Facets, PagedResult};
use crate::query::SearchCriteria;
use crate::utils::HealthReport;
use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tower_cookies::Cookies;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// Extractor failures are answered with the JSON envelope, not axum's plain text.
type QueryParams<T> = Result<Query<T>, QueryRejection>;
type PathParam<T> = Result<Path<T>, PathRejection>;

pub async fn search(
    State(state): State<AppState>,
    cookies: Cookies,
    criteria: QueryParams<SearchCriteria>,
    paging: QueryParams<PageParams>,
) -> ApiResult<SearchView> {
    let Query(criteria) = criteria?;
    let Query(paging) = paging?;
    let settings = DisplaySettings::from_cookies(&cookies);
    let single_line = criteria.single_line_mode || settings.single_line;

    let outcome = state.service.search(&criteria, paging.page()).await?;
    let page_size = state.service.page_size();

    Ok(ApiResponse::ok(SearchView {
        results: ParagraphView::page(outcome.results, single_line, page_size),
        facets: outcome.facets,
        notice: outcome.notice,
        settings,
    }))
}

pub async fn facets(State(state): State<AppState>) -> ApiResult<Facets> {
    Ok(ApiResponse::ok(state.service.all_facets().await?))
}

pub async fn context(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(source_uuid): Path<String>,
    paging: QueryParams<PageParams>,
) -> ApiResult<PagedResult<ParagraphView>> {
    let Query(paging) = paging?;
    let settings = DisplaySettings::from_cookies(&cookies);
    let results = state.service.context(&source_uuid, paging.page()).await?;
    Ok(ApiResponse::ok(ParagraphView::page(
        results,
        settings.single_line,
        state.service.page_size(),
    )))
}

pub async fn paragraph(
    State(state): State<AppState>,
    cookies: Cookies,
    id: PathParam<u64>,
) -> ApiResult<ParagraphView> {
    let Path(id) = id?;
    let settings = DisplaySettings::from_cookies(&cookies);
    let paragraph = state.service.paragraph(id).await?;
    Ok(ApiResponse::ok(ParagraphView::render(
        &paragraph,
        settings.single_line,
        state.service.page_size(),
    )))
}

pub async fn book(
    State(state): State<AppState>,
    cookies: Cookies,
    book_id: PathParam<u64>,
) -> ApiResult<ParagraphView> {
    let Path(book_id) = book_id?;
    let settings = DisplaySettings::from_cookies(&cookies);
    let paragraph = state.service.book(book_id).await?;
    Ok(ApiResponse::ok(ParagraphView::render(
        &paragraph,
        settings.single_line,
        state.service.page_size(),
    )))
}

pub async fn book_paragraphs(
    State(state): State<AppState>,
    cookies: Cookies,
    book_id: PathParam<u64>,
    paging: QueryParams<PageParams>,
) -> ApiResult<PagedResult<ParagraphView>> {
    let Path(book_id) = book_id?;
    let Query(paging) = paging?;
    let settings = DisplaySettings::from_cookies(&cookies);
    let results = state
        .service
        .book_paragraphs(book_id, paging.page())
        .await?;
    Ok(ApiResponse::ok(ParagraphView::page(
        results,
        settings.single_line,
        state.service.page_size(),
    )))
}

pub async fn get_settings(cookies: Cookies) -> Json<ApiResponse<DisplaySettings>> {
    ApiResponse::ok(DisplaySettings::from_cookies(&cookies))
}

pub async fn update_settings(
    cookies: Cookies,
    Json(update): Json<SettingsUpdate>,
) -> Json<ApiResponse<DisplaySettings>> {
    let settings = DisplaySettings::from_cookies(&cookies).apply(&update);
    settings.store(&cookies);
    ApiResponse::ok(settings)
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.service.health().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
