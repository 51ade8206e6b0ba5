use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::*;

#[derive(Deserialize, Debug)]
struct Clip {
    title: String,
}

fn client_for(server: &MockServer) -> AppwriteClient {
    let config = ClientConfig {
        endpoint: format!("{}/v1/", server.uri()),
        project_id: "aora-test".to_string(),
        platform: "com.jeremy.aora".to_string(),
    };
    AppwriteClient::new(&config).unwrap()
}

fn document(id: &str, title: &str) -> serde_json::Value {
    json!({
        "$id": id,
        "$collectionId": "videos",
        "$databaseId": "main",
        "$createdAt": "2024-03-01T08:15:42.120+00:00",
        "$updatedAt": "2024-03-01T08:15:42.120+00:00",
        "$permissions": [],
        "title": title,
    })
}

#[tokio::test]
async fn test_list_documents_sends_indexed_queries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/databases/main/collections/videos/documents"))
        .and(header("X-Appwrite-Project", "aora-test"))
        .and(query_param("queries[0]", r#"orderDesc("$createdAt")"#))
        .and(query_param("queries[1]", "limit(7)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "documents": [document("p2", "Second"), document("p1", "First")],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let list: DocumentList<Clip> = client
        .list_documents("main", "videos", &[Query::order_desc("$createdAt"), Query::limit(7)])
        .await
        .unwrap();

    assert_eq!(list.total, 2);
    assert_eq!(list.documents[0].id, "p2");
    assert_eq!(list.documents[0].data.title, "Second");
    assert_eq!(list.documents[1].collection_id, "videos");
}

#[tokio::test]
async fn test_service_error_keeps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "User (role: guests) missing scope (account)",
            "code": 401,
            "type": "general_unauthorized_scope",
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_account().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "User (role: guests) missing scope (account)");
    match err {
        Error::Service { kind, .. } => assert_eq!(kind, "general_unauthorized_scope"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_session_fallback_cookies_are_echoed() {
    let server = MockServer::start().await;
    let cookies = r#"{"a_session_aora-test":"s3cr3t"}"#;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .and(body_partial_json(json!({ "email": "jeremy@example.com" })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Fallback-Cookies", cookies)
                .set_body_json(json!({
                    "$id": "sess1",
                    "userId": "acc1",
                    "expire": "2025-03-01T08:15:42.120+00:00",
                    "provider": "email",
                    "current": true,
                })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .and(header("X-Fallback-Cookies", cookies))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "$id": "acc1",
            "$createdAt": "2024-03-01T08:15:42.120+00:00",
            "name": "jeremy",
            "email": "jeremy@example.com",
            "status": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.create_email_session("jeremy@example.com", "hunter22").await.unwrap();
    assert_eq!(session.user_id, "acc1");
    let account = client.get_account().await.unwrap();
    assert_eq!(account.name, "jeremy");
}

#[tokio::test]
async fn test_delete_session_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).delete_session("current").await.unwrap();
}

#[tokio::test]
async fn test_create_file_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/storage/buckets/media/files"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "f1",
            "bucketId": "media",
            "name": "thumb.png",
            "mimeType": "image/png",
            "sizeOriginal": 4,
            "chunksTotal": 1,
            "chunksUploaded": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = InputFile {
        name: "thumb.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    };
    let uploaded = client_for(&server).create_file("media", ID::unique(), &file).await.unwrap();
    assert_eq!(uploaded.id, "f1");
    assert_eq!(uploaded.size_original, 4);
}

#[test]
fn test_local_urls() {
    let config = ClientConfig {
        endpoint: "https://cloud.appwrite.io/v1".to_string(),
        project_id: "aora".to_string(),
        platform: "com.jeremy.aora".to_string(),
    };
    let client = AppwriteClient::new(&config).unwrap();

    let view = client.file_view_url("media", "f1").unwrap();
    assert_eq!(
        view.as_str(),
        "https://cloud.appwrite.io/v1/storage/buckets/media/files/f1/view?project=aora"
    );

    let options = PreviewOptions {
        width: Some(2000),
        height: Some(2000),
        gravity: Some(Gravity::Top),
        quality: Some(100),
    };
    let preview = client.file_preview_url("media", "f1", &options).unwrap();
    assert_eq!(
        preview.as_str(),
        "https://cloud.appwrite.io/v1/storage/buckets/media/files/f1/preview?width=2000&height=2000&gravity=top&quality=100&project=aora"
    );

    let avatar = client.initials_url("Jeremy Doe").unwrap();
    assert_eq!(
        avatar.as_str(),
        "https://cloud.appwrite.io/v1/avatars/initials?name=Jeremy+Doe&project=aora"
    );
}

#[tokio::test]
async fn test_create_file_in_chunks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/storage/buckets/media/files"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "big1",
            "bucketId": "media",
            "name": "clip.mp4",
            "mimeType": "video/mp4",
            "sizeOriginal": 11534336,
            "chunksTotal": 3,
            "chunksUploaded": 3,
        })))
        .expect(3)
        .mount(&server)
        .await;

    let file = InputFile {
        name: "clip.mp4".to_string(),
        mime_type: "video/mp4".to_string(),
        bytes: vec![0; 11 * 1024 * 1024],
    };
    let uploaded = client_for(&server).create_file("media", ID::unique(), &file).await.unwrap();
    assert_eq!(uploaded.id, "big1");

    let requests = server.received_requests().await.unwrap();
    let header_of = |i: usize, name: &str| {
        requests[i]
            .headers
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    };
    assert_eq!(requests.len(), 3);
    assert_eq!(header_of(0, "content-range").as_deref(), Some("bytes 0-5242879/11534336"));
    assert_eq!(header_of(1, "content-range").as_deref(), Some("bytes 5242880-10485759/11534336"));
    assert_eq!(header_of(2, "content-range").as_deref(), Some("bytes 10485760-11534335/11534336"));
    assert_eq!(header_of(0, "x-appwrite-id"), None);
    assert_eq!(header_of(1, "x-appwrite-id").as_deref(), Some("big1"));
    assert_eq!(header_of(2, "x-appwrite-id").as_deref(), Some("big1"));
}

#[tokio::test]
async fn test_unwritable_log_dir_does_not_fail_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/databases/main/collections/videos/documents"))
        .respond_with(ResponseTemplate::new(201).set_body_json(document("p9", "Logged")))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.log_dir = Some(std::path::PathBuf::from("/nonexistent/aora/logs"));
    let created: Document<Clip> = client
        .create_document("main", "videos", ID::unique(), &json!({ "title": "Logged" }))
        .await
        .unwrap();
    assert_eq!(created.id, "p9");
}
