use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{post, put},
    Json, Router,
};
use bench_office::{
    dto::candidate_dto::CandidateForm,
    error::Error,
    middleware::auth::{LoginRedirect, MemoryCredentialStore, Session},
    models::document::DocumentType,
    models::file::LocalFile,
    models::upload::{TypedUpload, UploadBatch},
    BackOffice,
};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
struct RecordedPart {
    name: String,
    filename: Option<String>,
    text: Option<String>,
}

#[derive(Clone, Default)]
struct Recorder {
    parts: Arc<Mutex<Vec<RecordedPart>>>,
    query: Arc<Mutex<HashMap<String, String>>>,
    authorization: Arc<Mutex<Option<String>>>,
}

impl Recorder {
    fn parts(&self) -> Vec<RecordedPart> {
        self.parts.lock().unwrap().clone()
    }
}

async fn record(recorder: &Recorder, headers: &HeaderMap, mut multipart: Multipart) {
    *recorder.authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.expect("field bytes");
        let text = if filename.is_none() {
            Some(String::from_utf8_lossy(&bytes).to_string())
        } else {
            None
        };
        recorder.parts.lock().unwrap().push(RecordedPart { name, filename, text });
    }
}

fn document_json(id: i64, name: &str, kind: &str) -> JsonValue {
    json!({ "id": id, "originalFilename": name, "documentType": kind, "fileSize": 12 })
}

async fn upload_many(
    State(recorder): State<Recorder>,
    Path(candidate_id): Path<i64>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Json<JsonValue> {
    record(&recorder, &headers, multipart).await;
    let docs: Vec<JsonValue> = recorder
        .parts()
        .iter()
        .filter(|p| p.filename.is_some())
        .enumerate()
        .map(|(i, p)| document_json(candidate_id * 100 + i as i64, p.filename.as_deref().unwrap(), "OTHER"))
        .collect();
    Json(JsonValue::Array(docs))
}

async fn upload_one(
    State(recorder): State<Recorder>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Json<JsonValue> {
    *recorder.query.lock().unwrap() = query.clone();
    record(&recorder, &headers, multipart).await;
    let kind = query.get("documentType").cloned().unwrap_or_default();
    Json(document_json(1, "resume.pdf", &kind))
}

async fn save_candidate(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    multipart: Multipart,
) -> (StatusCode, Json<JsonValue>) {
    record(&recorder, &headers, multipart).await;
    (StatusCode::CREATED, Json(json!({ "id": 42, "fullName": "Ana Lopez" })))
}

async fn spawn_backend() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/api/bench-candidates", post(save_candidate))
        .route("/api/bench-candidates/:id", put(save_candidate))
        .route("/api/bench-candidates/:id/documents", post(upload_one))
        .route("/api/bench-candidates/:id/documents/multiple", post(upload_many))
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{}/api", addr), recorder)
}

fn office(base_url: &str) -> BackOffice {
    let session = Session::open(
        Url::parse(&format!("{}/", base_url)).expect("url"),
        Arc::new(MemoryCredentialStore::with_token("tok-123")),
        Arc::new(LoginRedirect::new()),
    );
    BackOffice::with_session(session, 1024 * 1024).expect("office")
}

fn pdf(name: &str) -> LocalFile {
    LocalFile::new(name, "application/pdf", format!("%PDF {}", name).into_bytes())
}

fn candidate_form() -> CandidateForm {
    CandidateForm {
        first_name: "Ana".into(),
        last_name: "Lopez".into(),
        phone_number: "555-0100".into(),
        email: "ana@example.com".into(),
        city: "Austin".into(),
        state: "TX".into(),
        primary_skill: "Java Developer".into(),
        experience_years: 6,
        linkedin_url: Some("in/ana-lopez".into()),
        domains: vec!["Healthcare".into(), "Retail".into()],
        ..CandidateForm::default()
    }
}

#[tokio::test]
async fn multi_upload_pairs_each_file_with_its_type() {
    let (base_url, recorder) = spawn_backend().await;
    let office = office(&base_url);

    let uploads = vec![
        TypedUpload::new(pdf("resume.pdf"), DocumentType::Resume),
        TypedUpload::new(pdf("passport.pdf"), DocumentType::Passport),
        TypedUpload::new(pdf("misc.pdf"), DocumentType::Other),
    ];
    let created = office.documents.upload_many(9, &uploads).await.expect("upload");
    assert_eq!(created.len(), 3);

    let parts = recorder.parts();
    let files: Vec<_> = parts
        .iter()
        .filter(|p| p.name == "files")
        .map(|p| p.filename.clone().unwrap())
        .collect();
    let types: Vec<_> = parts
        .iter()
        .filter(|p| p.name == "documentTypes")
        .map(|p| p.text.clone().unwrap())
        .collect();
    assert_eq!(files, vec!["resume.pdf", "passport.pdf", "misc.pdf"]);
    assert_eq!(types, vec!["RESUME", "PASSPORT", "OTHER"]);

    // Each file part is immediately followed by its own type part.
    for pair in parts.chunks(2) {
        assert_eq!(pair[0].name, "files");
        assert_eq!(pair[1].name, "documentTypes");
    }
    assert_eq!(
        recorder.authorization.lock().unwrap().as_deref(),
        Some("Bearer tok-123")
    );
}

#[tokio::test]
async fn single_upload_sends_type_as_query() {
    let (base_url, recorder) = spawn_backend().await;
    let office = office(&base_url);

    let upload = TypedUpload::new(pdf("resume.pdf"), DocumentType::Resume).with_description("latest");
    let doc = office.documents.upload(3, &upload).await.expect("upload");
    assert_eq!(doc.document_type, DocumentType::Resume);

    assert_eq!(
        recorder.query.lock().unwrap().get("documentType").map(String::as_str),
        Some("RESUME")
    );
    let parts = recorder.parts();
    assert_eq!(parts[0].name, "file");
    assert_eq!(parts[0].filename.as_deref(), Some("resume.pdf"));
    assert_eq!(parts[1].text.as_deref(), Some("latest"));
}

#[tokio::test]
async fn candidate_create_sends_fields_and_typed_documents_only() {
    let (base_url, recorder) = spawn_backend().await;
    let office = office(&base_url);

    // --- Pending uploads: one left untyped ---
    let mut batch = UploadBatch::new();
    batch.add_typed(pdf("resume.pdf"), DocumentType::Resume);
    batch.add(pdf("untyped.pdf"));
    let i94 = batch.add_typed(pdf("i94.pdf"), DocumentType::I94);
    batch.set_description(i94, "arrival record");
    let uploads = batch.into_submission();

    let created = office
        .candidates
        .create(&candidate_form(), &uploads)
        .await
        .expect("create");
    assert_eq!(created.id, 42);

    let parts = recorder.parts();
    let text = |name: &str| {
        parts
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.text.clone())
    };
    assert_eq!(text("fullName").as_deref(), Some("Ana Lopez"));
    assert_eq!(text("domains").as_deref(), Some("Healthcare,Retail"));
    assert_eq!(
        text("linkedinUrl").as_deref(),
        Some("https://www.linkedin.com/in/ana-lopez")
    );
    assert!(text("middleName").is_none());
    assert!(text("passportNumber").is_none());

    let docs: Vec<_> = parts
        .iter()
        .filter(|p| p.name == "documents")
        .filter_map(|p| p.filename.clone())
        .collect();
    assert_eq!(docs, vec!["resume.pdf", "i94.pdf"]);

    let kinds: Vec<_> = parts
        .iter()
        .filter(|p| p.name == "documentTypes")
        .filter_map(|p| p.text.clone())
        .collect();
    assert_eq!(kinds, vec!["RESUME", "I94"]);

    let descriptions: Vec<_> = parts
        .iter()
        .filter(|p| p.name == "documentDescriptions")
        .filter_map(|p| p.text.clone())
        .collect();
    assert_eq!(descriptions, vec!["", "arrival record"]);
}

#[tokio::test]
async fn oversize_file_is_refused_before_sending() {
    let (base_url, recorder) = spawn_backend().await;
    let office = office(&base_url);

    let big = LocalFile::new("scan.pdf", "application/pdf", vec![b'x'; 2 * 1024 * 1024]);
    let err = office
        .candidates
        .update(42, &candidate_form(), &[TypedUpload::new(big, DocumentType::Other)])
        .await
        .unwrap_err();

    match err {
        Error::InvalidFile(errors) => assert!(errors[0].contains("exceeds")),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(recorder.parts().is_empty());
}
