use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::blob::FsBlobHost;
use crate::resolve::SubfolderTemplate;

const RECORD: &str = "Quality/Manuals/PR-03 Calibration.docx";

fn tree_with(files: &[&str]) -> serde_json::Value {
    let children: Vec<serde_json::Value> = files
        .iter()
        .map(|name| serde_json::json!({"type": "file", "name": name}))
        .collect();
    serde_json::json!([
        {"type": "folder", "name": "Quality", "children": [
            {"type": "file", "name": "PR-03 Calibration.docx"},
            {"type": "folder", "name": "Informação Documentada - Procedimento PR-03", "children": children}
        ]}
    ])
}

fn session_for(server: &MockServer, dir: &TempDir) -> AttachmentSession<FsBlobHost> {
    let config = ServiceConfig {
        preview_release_delay: Duration::from_millis(50),
        ..ServiceConfig::with_base_url(server.uri()).unwrap()
    };
    let blobs = FsBlobHost::new(dir.path().join("staging"), dir.path().join("downloads"))
        .with_viewer(|_| true);
    AttachmentSession::new(&config, blobs).unwrap()
}

#[tokio::test]
async fn new_session_starts_empty() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = session_for(&server, &dir);

    assert!(session.attachments().is_empty());
    assert!(session.available_files().is_empty());
    assert!(session.folder_path().is_none());
    assert!(!session.is_loading());
    assert!(!session.is_uploading());
    assert!(session.last_fetch_error().is_none());
    assert_eq!(session.get_attachments_as_string(), "");
}

#[tokio::test]
async fn fetch_then_toggle_and_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list-files-tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree_with(&["a.pdf", "b.pdf"])))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let session = session_for(&server, &dir);

    let files = session.fetch_available_files(RECORD).await;
    let names: Vec<&str> = files.iter().map(|f| f.display_name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    assert_eq!(
        session.folder_path().as_deref(),
        Some("Quality/Informação Documentada - Procedimento PR-03")
    );

    assert!(session.toggle_attachment("b.pdf"));
    assert!(session.toggle_attachment("a.pdf"));
    assert_eq!(session.get_attachments_as_string(), "b.pdf\na.pdf");

    assert!(!session.toggle_attachment("b.pdf"));
    assert_eq!(session.attachments(), vec!["a.pdf".to_string()]);
}

#[tokio::test]
async fn attachments_survive_catalog_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list-files-tree"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let session = session_for(&server, &dir);

    session.set_attachments_from_string("a.pdf, b.pdf");
    let files = session.fetch_available_files(RECORD).await;

    assert!(files.is_empty());
    assert!(matches!(
        session.last_fetch_error(),
        Some(Error::FetchFailure(_))
    ));
    assert_eq!(session.attachments(), vec!["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn import_replaces_and_clear_empties() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = session_for(&server, &dir);

    session.toggle_attachment("old.pdf");
    session.set_attachments_from_string("x.pdf\ny.pdf,\n z.pdf ");
    assert_eq!(session.attachments(), vec!["x.pdf", "y.pdf", "z.pdf"]);
    assert!(!session.is_attached("old.pdf"));

    let exported = session.get_attachments_as_string();
    session.clear_attachments();
    assert!(session.attachments().is_empty());

    session.set_attachments_from_string(&exported);
    assert_eq!(session.attachments(), vec!["x.pdf", "y.pdf", "z.pdf"]);
}

#[tokio::test]
async fn upload_refreshes_catalog_and_marks_file_attached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-document"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list-files-tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree_with(&["a.pdf", "new.pdf"])))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let session = session_for(&server, &dir);

    let outcome = session
        .upload_file(
            &UploadFile::new("new.pdf", b"%PDF".to_vec()).with_content_type("application/pdf"),
            RECORD,
        )
        .await
        .unwrap();

    assert_eq!(outcome.message, "File uploaded successfully");
    assert_eq!(session.available_files().len(), 2);
    assert!(session.is_attached("new.pdf"));
    assert!(!session.is_uploading());
}

#[tokio::test]
async fn preview_and_download_of_unknown_file_issue_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let session = session_for(&server, &dir);

    assert!(matches!(
        session.preview_file("ghost.pdf").await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        session.download_file("ghost.pdf").await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn preview_and_download_resolve_catalog_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list-files-tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree_with(&["a.pdf"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/get-pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-preview".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-raw".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let session = session_for(&server, &dir);
    session.fetch_available_files(RECORD).await;

    let handle = session.preview_file("a.pdf").await.unwrap();
    assert_eq!(handle.mime_type, "application/pdf");

    let saved = session.download_file("a.pdf").await.unwrap();
    assert_eq!(std::fs::read(saved).unwrap(), b"%PDF-raw".to_vec());
}

#[tokio::test]
async fn custom_template_drives_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list-files-tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"type": "folder", "name": "Quality", "children": [
                {"type": "folder", "name": "Records PR-03", "children": [
                    {"type": "file", "name": "log.csv"}
                ]}
            ]}
        ])))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig {
        subfolder_template: SubfolderTemplate::new("Records {prefix}").unwrap(),
        ..ServiceConfig::with_base_url(server.uri()).unwrap()
    };
    let session = AttachmentSession::new(&config, FsBlobHost::new(dir.path(), dir.path())).unwrap();

    let files = session.fetch_available_files(RECORD).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].full_path, "Quality/Records PR-03/log.csv");
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "Requires DOCATTACH_API_BASE_URL and DOCATTACH_TEST_RECORD plus network access"]
async fn live_service_lists_files_for_record() {
    let _ = dotenvy::dotenv();

    let record = std::env::var("DOCATTACH_TEST_RECORD").expect("DOCATTACH_TEST_RECORD must be set");
    let dir = tempfile::tempdir().unwrap();
    let session = AttachmentSession::from_env(FsBlobHost::in_temp_dir(dir.path()))
        .expect("configuration should load");

    session.fetch_available_files(&record).await;

    assert!(
        session.last_fetch_error().is_none(),
        "catalog fetch failed: {:?}",
        session.last_fetch_error()
    );
    assert!(session.folder_path().is_some());
}
