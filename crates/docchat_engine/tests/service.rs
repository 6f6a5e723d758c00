use std::io::Write;
use std::sync::{Arc, Mutex};

use docchat_engine::{
    DocumentRecord, DocumentService, EngineEvent, FailureKind, PageNumbers, ProgressSink,
    QueryBody, QueryService, ReqwestClient, ServiceSettings, SourceRecord,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn percents(&self) -> Vec<u8> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::UploadProgress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn client_for(server: &MockServer) -> ReqwestClient {
    ReqwestClient::new(ServiceSettings::new(server.uri())).expect("client")
}

fn temp_pdf(bytes: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .unwrap();
    let mut content = b"%PDF-1.4\n".to_vec();
    content.resize(bytes, b'x');
    file.write_all(&content).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn lists_documents_in_service_order() {
    docchat_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "d2", "filename": "b.pdf", "page_count": 3},
            {"id": "d1", "filename": "a.pdf", "page_count": null, "file_size": 1024},
        ])))
        .mount(&server)
        .await;

    let docs = client_for(&server).list_documents().await.expect("list ok");

    assert_eq!(
        docs,
        vec![
            DocumentRecord {
                id: "d2".to_string(),
                filename: "b.pdf".to_string(),
                page_count: Some(3),
                upload_time: None,
                file_size: None,
                status: None,
            },
            DocumentRecord {
                id: "d1".to_string(),
                filename: "a.pdf".to_string(),
                page_count: None,
                upload_time: None,
                file_size: Some(1024),
                status: None,
            },
        ]
    );
}

#[tokio::test]
async fn listing_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).list_documents().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn upload_streams_file_and_reports_progress() {
    docchat_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents/"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("report.pdf"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "new-doc",
            "filename": "report.pdf",
            "page_count": 7,
            "upload_time": "2024-05-01T10:00:00",
            "file_size": 4096,
            "status": "processed",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pdf = temp_pdf(4096);
    let settings = ServiceSettings {
        upload_chunk_size: 1024,
        ..ServiceSettings::new(server.uri())
    };
    let client = ReqwestClient::new(settings).unwrap();
    let sink = Arc::new(TestSink::default());

    let doc = client
        .upload_document(5, pdf.path(), "report.pdf", sink.clone())
        .await
        .expect("upload ok");

    assert_eq!(doc.id, "new-doc");
    assert_eq!(doc.page_count, Some(7));
    assert_eq!(doc.status.as_deref(), Some("processed"));

    let percents = sink.percents();
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(percents.last(), Some(&100));
    let all_for_upload = sink.events.lock().unwrap().iter().all(|event| {
        matches!(event, EngineEvent::UploadProgress { upload_id: 5, .. })
    });
    assert!(all_for_upload);
}

#[tokio::test]
async fn upload_of_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let sink = Arc::new(TestSink::default());

    let err = client_for(&server)
        .upload_document(1, std::path::Path::new("/nonexistent/x.pdf"), "x.pdf", sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
}

#[tokio::test]
async fn upload_rejected_by_service_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Only PDF files are supported"})),
        )
        .mount(&server)
        .await;

    let pdf = temp_pdf(100);
    let err = client_for(&server)
        .upload_document(2, pdf.path(), "x.pdf", Arc::new(TestSink::default()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
}

#[tokio::test]
async fn query_posts_json_body_and_decodes_answer() {
    docchat_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query/"))
        .and(body_json(json!({
            "query": "What is this?",
            "document_ids": ["d1"],
            "top_k": 3,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "It's a report.",
            "documents": [
                {"filename": "a.pdf", "page_num": 2, "content": "quarterly report", "score": 0.9},
                {"content": "no metadata"},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = client_for(&server)
        .query(&QueryBody {
            query: "What is this?".to_string(),
            document_ids: vec!["d1".to_string()],
            top_k: 3,
        })
        .await
        .expect("query ok");

    assert_eq!(answer.answer, "It's a report.");
    assert_eq!(
        answer.documents,
        vec![
            SourceRecord {
                filename: Some("a.pdf".to_string()),
                page_num: Some(PageNumbers::Number(2)),
                content: Some("quarterly report".to_string()),
                score: Some(0.9),
            },
            SourceRecord {
                content: Some("no metadata".to_string()),
                ..SourceRecord::default()
            },
        ]
    );
}

#[tokio::test]
async fn query_accepts_joined_page_lists_and_extra_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Revenue grew.",
            "documents": [
                {
                    "content": "Revenue grew 10%.",
                    "filename": "report.pdf",
                    "page_num": "3,4",
                    "score": 0.82,
                    "document_id": "d1",
                    "chunk_id": "c-17",
                    "headings": ["Results", "Revenue"],
                },
                {
                    "content": "Cover page.",
                    "filename": "report.pdf",
                    "page_num": "",
                    "score": 0.41,
                    "document_id": "d1",
                    "chunk_id": "c-01",
                    "headings": [],
                },
                {"content": null, "filename": null, "page_num": null, "score": null},
            ],
        })))
        .mount(&server)
        .await;

    let answer = client_for(&server)
        .query(&QueryBody {
            query: "How did revenue change?".to_string(),
            document_ids: vec!["d1".to_string()],
            top_k: 3,
        })
        .await
        .expect("query ok");

    assert_eq!(answer.answer, "Revenue grew.");
    assert_eq!(
        answer.documents,
        vec![
            SourceRecord {
                filename: Some("report.pdf".to_string()),
                page_num: Some(PageNumbers::Text("3,4".to_string())),
                content: Some("Revenue grew 10%.".to_string()),
                score: Some(0.82),
            },
            SourceRecord {
                filename: Some("report.pdf".to_string()),
                page_num: Some(PageNumbers::Text(String::new())),
                content: Some("Cover page.".to_string()),
                score: Some(0.41),
            },
            SourceRecord::default(),
        ]
    );
    assert_eq!(answer.documents[0].page_num.as_ref().unwrap().to_string(), "3,4");
}

#[tokio::test]
async fn query_with_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .query(&QueryBody {
            query: "q".to_string(),
            document_ids: vec!["d1".to_string()],
            top_k: 3,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn query_against_unreachable_service_is_network_error() {
    // Nothing listens on port 1.
    let client = ReqwestClient::new(ServiceSettings::new("http://127.0.0.1:1/")).unwrap();

    let err = client
        .query(&QueryBody {
            query: "q".to_string(),
            document_ids: Vec::new(),
            top_k: 3,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}
