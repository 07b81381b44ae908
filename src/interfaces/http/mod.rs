use std::sync::{Arc, Mutex, MutexGuard};

use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{delete, dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::application::{SourceResolver, TableAnalyzer, TableFilter};
use crate::domain::error::{AppError, Result};
use crate::domain::session::{Notice, SessionContext};
use crate::domain::source::{Delimiter, DetectedEncoding, FileKind, IngestReport};
use crate::domain::table::{Cell, FilterValue, Table, ValueFilter};
use crate::infrastructure::csv::CsvWriter;

/// Largest accepted upload body
const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

const FULL_EXPORT_NAME: &str = "fichier_complet.csv";
const FILTERED_EXPORT_NAME: &str = "filtered.csv";

pub struct HttpState {
    pub session: Mutex<SessionContext>,
    pub resolver: Arc<SourceResolver>,
    pub analyzer: TableAnalyzer,
}

impl HttpState {
    pub fn new(resolver: Arc<SourceResolver>) -> Self {
        let config = resolver.config();
        Self {
            session: Mutex::new(SessionContext::new(config.max_notices)),
            analyzer: TableAnalyzer::new(config.preview_rows),
            resolver,
        }
    }

    fn session(&self) -> MutexGuard<'_, SessionContext> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

#[derive(Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub scope: Scope,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Full,
    Filtered,
}

#[derive(Deserialize)]
pub struct FilterRequest {
    pub column: String,
    /// Value labels; the missing label selects missing cells
    pub values: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub kind: FileKind,
    pub rows: usize,
    pub columns: Vec<String>,
    pub encoding: Option<DetectedEncoding>,
    pub delimiter: Option<Delimiter>,
    pub warning: Option<String>,
    pub failed_attempts: Vec<String>,
    pub generation: u64,
}

impl IngestResponse {
    fn from_report(report: &IngestReport, generation: u64) -> Self {
        Self {
            kind: report.kind,
            rows: report.table.row_count(),
            columns: report.table.columns.clone(),
            encoding: report.encoding.clone(),
            delimiter: report.delimiter,
            warning: report.warning.as_ref().map(|w| w.to_string()),
            failed_attempts: report
                .failed_attempts
                .iter()
                .map(|f| format!("{}: {}", f.strategy, f.error))
                .collect(),
            generation,
        }
    }
}

/// Rows laid out in column order; missing cells serialize as `null`
#[derive(Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub filter_active: bool,
}

impl TableView {
    fn new(table: &Table, filter_active: bool) -> Self {
        Self {
            columns: table.columns.clone(),
            rows: (0..table.row_count())
                .map(|i| table.row_cells(i).into_iter().cloned().collect())
                .collect(),
            filter_active,
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub generation: u64,
}

fn error_response(err: &AppError) -> HttpResponse {
    let status = match err {
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::Internal(_) | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    HttpResponse::build(status).json(ErrorResponse {
        error: err.to_string(),
        kind: err.kind().to_string(),
    })
}

fn no_table() -> AppError {
    AppError::NotFound("no file loaded".to_string())
}

/// Table selected by `scope`; the filtered scope falls back to the full
/// table when no filter is active.
fn scoped_table(session: &SessionContext, scope: Scope) -> Result<&Table> {
    let table = match scope {
        Scope::Full => session.table(),
        Scope::Filtered => session.active_table(),
    };
    table.ok_or_else(no_table)
}

/// Install a finished ingestion into the session, or record its failure
/// and leave the loaded table alone.
fn finish_ingestion(data: &HttpState, outcome: Result<IngestReport>) -> HttpResponse {
    let mut session = data.session();
    match outcome {
        Ok(report) => {
            let response = IngestResponse::from_report(&report, session.generation);
            session.load(report);
            HttpResponse::Ok().json(response)
        }
        Err(err) => {
            error!(error = %err, "ingestion failed");
            session.record_failure(&err);
            error_response(&err)
        }
    }
}

#[post("/upload")]
async fn upload(
    data: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let file_name = query.into_inner().filename;
    info!(file_name = %file_name, bytes = body.len(), "upload received");

    let resolver = data.resolver.clone();
    let outcome = web::block(move || resolver.resolve_upload(&file_name, body.to_vec()))
        .await
        .unwrap_or_else(|e| Err(AppError::Internal(format!("Ingestion task failed: {}", e))));

    finish_ingestion(&data, outcome)
}

#[post("/url")]
async fn ingest_url(data: web::Data<HttpState>, req: web::Json<UrlRequest>) -> impl Responder {
    let url = req.into_inner().url;
    info!(url = %url, "URL ingestion requested");

    let resolver = data.resolver.clone();
    let outcome = web::block(move || resolver.resolve_url(&url))
        .await
        .unwrap_or_else(|e| Err(AppError::Internal(format!("Ingestion task failed: {}", e))));

    finish_ingestion(&data, outcome)
}

#[get("/table")]
async fn get_table(data: web::Data<HttpState>, query: web::Query<ScopeQuery>) -> impl Responder {
    let session = data.session();
    match scoped_table(&session, query.scope) {
        Ok(table) => HttpResponse::Ok().json(TableView::new(
            table,
            query.scope == Scope::Filtered && session.filter_active(),
        )),
        Err(err) => error_response(&err),
    }
}

#[get("/table/summary")]
async fn table_summary(
    data: web::Data<HttpState>,
    query: web::Query<ScopeQuery>,
) -> impl Responder {
    let session = data.session();
    match scoped_table(&session, query.scope) {
        Ok(table) => HttpResponse::Ok().json(data.analyzer.summarize(table)),
        Err(err) => error_response(&err),
    }
}

#[get("/table/columns/{name}")]
async fn explore_column(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ScopeQuery>,
) -> impl Responder {
    let session = data.session();
    let result = scoped_table(&session, query.scope)
        .and_then(|table| data.analyzer.explore_column(table, &path));
    match result {
        Ok(exploration) => HttpResponse::Ok().json(exploration),
        Err(err) => error_response(&err),
    }
}

#[get("/table/values/{name}")]
async fn column_values(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let session = data.session();
    let result = session
        .table()
        .ok_or_else(no_table)
        .and_then(|table| TableFilter::distinct_values(table, &path));
    match result {
        Ok(values) => {
            let labels: Vec<&str> = values.iter().map(FilterValue::label).collect();
            HttpResponse::Ok().json(labels)
        }
        Err(err) => error_response(&err),
    }
}

#[post("/table/filter")]
async fn set_filter(data: web::Data<HttpState>, req: web::Json<FilterRequest>) -> impl Responder {
    let req = req.into_inner();
    let filter = ValueFilter::new(
        req.column,
        req.values.iter().map(|v| FilterValue::from_label(v)).collect(),
    );

    let mut session = data.session();
    let result = session
        .table()
        .ok_or_else(no_table)
        .and_then(|table| TableFilter::apply(table, &filter));

    match result {
        Ok(filtered) => {
            let view = TableView::new(&filtered, filter.is_active());
            session.set_filter(filter, filtered);
            HttpResponse::Ok().json(view)
        }
        Err(err) => error_response(&err),
    }
}

#[delete("/table/filter")]
async fn clear_filter(data: web::Data<HttpState>) -> impl Responder {
    data.session().clear_filter();
    HttpResponse::NoContent().finish()
}

#[get("/table/export")]
async fn export_table(data: web::Data<HttpState>, query: web::Query<ScopeQuery>) -> impl Responder {
    let session = data.session();
    let file_name = match query.scope {
        Scope::Full => FULL_EXPORT_NAME,
        Scope::Filtered => FILTERED_EXPORT_NAME,
    };

    let result = scoped_table(&session, query.scope)
        .and_then(|table| CsvWriter::new().write_table(table));

    match result {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(file_name.to_string())],
            })
            .body(bytes),
        Err(err) => error_response(&err),
    }
}

#[post("/session/reset")]
async fn reset_session(data: web::Data<HttpState>) -> impl Responder {
    let mut session = data.session();
    let next = session.reset();
    info!(generation = next.generation, "session reset");
    *session = next;
    HttpResponse::Ok().json(SessionResponse {
        id: session.id.to_string(),
        generation: session.generation,
    })
}

#[get("/notices")]
async fn get_notices(data: web::Data<HttpState>) -> impl Responder {
    let notices: Vec<Notice> = data.session().notices().to_vec();
    HttpResponse::Ok().json(notices)
}

/// Register the API routes; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .service(upload)
            .service(ingest_url)
            .service(get_table)
            .service(table_summary)
            .service(explore_column)
            .service(column_values)
            .service(set_filter)
            .service(clear_filter)
            .service(export_table)
            .service(reset_session)
            .service(get_notices),
    );
}

pub fn start_server(state: web::Data<HttpState>, host: &str, port: u16) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
