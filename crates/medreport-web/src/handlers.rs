//! HTTP处理器

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use medreport_core::{
    utils::validate_file, ErrorResponse, MedicalReportDataDetailed, ReportError, UploadConfig,
};
use medreport_extract::RecordAssembler;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 处理器共享状态，规则表只读共享
#[derive(Debug, Clone)]
pub struct AppState {
    pub assembler: RecordAssembler,
    pub upload: Arc<UploadConfig>,
}

impl AppState {
    pub fn new(assembler: RecordAssembler, upload: UploadConfig) -> Self {
        Self {
            assembler,
            upload: Arc::new(upload),
        }
    }
}

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "message": "Medical Report OCR Extractor API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "parse": "/api/v1/parse",
            "health": "/health"
        }
    }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "Medical Report OCR Extractor",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// 解析请求体
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    /// OCR输出文本
    pub text: String,
    /// 源文件名
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ParseQuery {
    #[serde(default)]
    pub detailed: bool,
}

/// 报告解析处理器
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn parse_report(
    State(state): State<AppState>,
    Query(query): Query<ParseQuery>,
    Json(request): Json<ParseRequest>,
) -> Result<Response, ApiError> {
    if let Some(filename) = request.filename.as_deref() {
        info!("Processing file: {}", filename);
        validate_file(Some(filename), Some(request.text.len() as u64), &state.upload)?;
    }

    if request.text.trim().is_empty() {
        return Err(ReportError::EmptyText(
            "Please ensure the file contains readable text.".to_string(),
        )
        .into());
    }

    let record = state.assembler.parse(&request.text);

    if query.detailed {
        let extracted = RecordAssembler::count_non_absent(&record);
        let detailed =
            MedicalReportDataDetailed::new(record, Some(request.text), request.filename, extracted);
        Ok(Json(detailed).into_response())
    } else {
        Ok(Json(record).into_response())
    }
}

/// HTTP层错误
#[derive(Debug)]
pub struct ApiError(pub ReportError);

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ReportError::Validation(_) | ReportError::UnknownField(_) => StatusCode::BAD_REQUEST,
            ReportError::EmptyText(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReportError::MalformedRule { .. }
            | ReportError::Config(_)
            | ReportError::Io(_)
            | ReportError::Serialization(_)
            | ReportError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = ErrorResponse::new(self.0.to_string(), status.as_u16());
        (status, Json(body)).into_response()
    }
}
