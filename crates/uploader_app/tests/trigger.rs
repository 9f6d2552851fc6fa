use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use uploader_app::{PickedFiles, StatusDisplay, UploadTrigger};
use uploader_core::SelectedFile;
use uploader_engine::{
    EngineHandle, ServerReply, UploadError, UploadFile, UploadId, UploadSettings, Uploader,
    UPLOAD_PATH,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingStatus {
    texts: Mutex<Vec<String>>,
}

impl RecordingStatus {
    fn take(&self) -> Vec<String> {
        self.texts.lock().unwrap().drain(..).collect()
    }
}

impl StatusDisplay for RecordingStatus {
    fn set_text(&self, text: &str) {
        self.texts.lock().unwrap().push(text.to_string());
    }
}

fn syllabus() -> SelectedFile {
    SelectedFile::new("syllabus.txt", b"Week 1: ownership".to_vec()).with_mime_type("text/plain")
}

fn endpoint(server: &MockServer) -> String {
    format!("{}{UPLOAD_PATH}", server.uri())
}

/// Triggers once per selection, in order, then waits for every reply.
/// Returns every status text written, in order.
async fn run_triggers(endpoint: String, selections: Vec<Vec<SelectedFile>>) -> Vec<String> {
    tokio::task::spawn_blocking(move || {
        engine_logging::initialize_for_tests();
        let status = RecordingStatus::default();
        let mut trigger = UploadTrigger::new(UploadSettings::new(endpoint)).unwrap();
        for files in selections {
            trigger.trigger(&PickedFiles::new(files), &status);
        }
        assert!(trigger.settle(&status, Some(Duration::from_secs(10))));
        assert_eq!(trigger.uploads_in_flight(), 0);
        status.take()
    })
    .await
    .unwrap()
}

async fn reply_with(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn no_file_selected_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let texts = run_triggers(endpoint(&server), vec![Vec::new()]).await;
    assert_eq!(texts, vec!["Choose a file first".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn one_file_is_posted_as_file_part() {
    let server = MockServer::start().await;
    reply_with(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Successfully uploaded syllabus.txt"
        })),
    )
    .await;

    let texts = run_triggers(endpoint(&server), vec![vec![syllabus()]]).await;
    assert_eq!(texts, vec!["Successfully uploaded syllabus.txt".to_string()]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body).to_ascii_lowercase();
    assert_eq!(body.matches("content-disposition: form-data;").count(), 1);
    assert!(body.contains(r#"name="file"; filename="syllabus.txt""#));
    assert!(body.contains("week 1: ownership"));
}

#[tokio::test(flavor = "multi_thread")]
async fn message_is_displayed_verbatim() {
    let server = MockServer::start().await;
    reply_with(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({ "message": "Uploaded 3 slides" })),
    )
    .await;

    let texts = run_triggers(endpoint(&server), vec![vec![syllabus()]]).await;
    assert_eq!(texts, vec!["Uploaded 3 slides".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn error_is_displayed_when_message_missing() {
    let server = MockServer::start().await;
    reply_with(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": "Bad format" })),
    )
    .await;

    let texts = run_triggers(endpoint(&server), vec![vec![syllabus()]]).await;
    assert_eq!(texts, vec!["Bad format".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_reply_writes_empty_status() {
    let server = MockServer::start().await;
    reply_with(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({})),
    )
    .await;

    let texts = run_triggers(endpoint(&server), vec![vec![syllabus()]]).await;
    assert_eq!(texts, vec![String::new()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn http_error_status_with_json_is_still_displayed() {
    let server = MockServer::start().await;
    reply_with(
        &server,
        ResponseTemplate::new(500)
            .set_body_json(serde_json::json!({ "error": "PdfReadError: EOF marker not found" })),
    )
    .await;

    let texts = run_triggers(endpoint(&server), vec![vec![syllabus()]]).await;
    assert_eq!(texts, vec!["PdfReadError: EOF marker not found".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_json_reply_is_a_failed_upload() {
    let server = MockServer::start().await;
    reply_with(
        &server,
        ResponseTemplate::new(502).set_body_raw("<h1>Bad Gateway</h1>", "text/html"),
    )
    .await;

    let texts = run_triggers(endpoint(&server), vec![vec![syllabus()]]).await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("Failed Upload: "), "got {:?}", texts[0]);
    assert!(texts[0].len() > "Failed Upload: ".len());
}

#[tokio::test(flavor = "multi_thread")]
async fn refused_connection_is_a_failed_upload() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let texts = run_triggers(
        format!("http://127.0.0.1:{port}{UPLOAD_PATH}"),
        vec![vec![syllabus()]],
    )
    .await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("Failed Upload: "), "got {:?}", texts[0]);
}

#[tokio::test(flavor = "multi_thread")]
async fn only_first_selected_file_is_sent() {
    let server = MockServer::start().await;
    reply_with(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "ok" })),
    )
    .await;

    let notes = SelectedFile::new("notes.pdf", b"%PDF-1.7".to_vec());
    let texts = run_triggers(endpoint(&server), vec![vec![syllabus(), notes]]).await;
    assert_eq!(texts, vec!["ok".to_string()]);

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("syllabus.txt"));
    assert!(!body.contains("notes.pdf"));
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_earlier_reply_does_not_overwrite_later_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains("first.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_json(serde_json::json!({ "message": "first" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains("second.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "second" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let texts = run_triggers(
        endpoint(&server),
        vec![
            vec![SelectedFile::new("first.txt", b"1".to_vec())],
            vec![SelectedFile::new("second.txt", b"2".to_vec())],
        ],
    )
    .await;
    assert_eq!(texts, vec!["second".to_string()]);
}

struct PanickingUploader;

#[async_trait::async_trait]
impl Uploader for PanickingUploader {
    async fn upload(
        &self,
        _upload_id: UploadId,
        _file: &UploadFile,
    ) -> Result<ServerReply, UploadError> {
        panic!("uploader bug");
    }
}

#[test]
fn crashed_upload_is_reported_and_settle_returns() {
    engine_logging::initialize_for_tests();
    let engine = EngineHandle::with_uploader(Arc::new(PanickingUploader)).unwrap();
    let mut trigger = UploadTrigger::with_engine(engine);
    let status = RecordingStatus::default();

    trigger.trigger(&PickedFiles::new(vec![syllabus()]), &status);
    assert_eq!(trigger.uploads_in_flight(), 1);
    assert!(trigger.settle(&status, None));

    let texts = status.take();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("Failed Upload: "), "got {:?}", texts[0]);
    assert_eq!(trigger.uploads_in_flight(), 0);
}
