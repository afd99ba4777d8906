#![cfg(feature = "object_storage")]

use openstack_sdk::auth::StaticAuthentication;
use openstack_sdk::object_storage::types_rs::{ArchiveFormat, ByteRange, ObjectBody};
use openstack_sdk::object_storage::{self, ObjectMetadata, StorageMetaExt};
use openstack_sdk::Error;
use serde_json::json;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio_stream::StreamExt;
use wiremock::matchers::{
    body_bytes, header, header_exists, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TOKEN: &str = "swift-token";
const ACCOUNT: &str = "/v1/AUTH_test";

async fn setup() -> (MockServer, object_storage::Client) {
    let server = MockServer::start().await;
    let auth = StaticAuthentication::new(Some(TOKEN.to_owned()))
        .with_endpoint("object-store", format!("{}{ACCOUNT}", server.uri()));
    let client = object_storage::Client::builder()
        .auth(Arc::new(auth))
        .build();
    (server, client)
}

async fn requests_with_method(server: &MockServer, name: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == name)
        .collect()
}

fn header_str<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers.get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn list_containers_by_marker() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(ACCOUNT))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("marker"))
        .and(header("X-Auth-Token", TOKEN))
        .and(header("X-Newest", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Account-Meta-Owner", "ops")
                .insert_header("X-Account-Container-Count", "3")
                .set_body_json(json!([
                    {"name": "alpha", "count": 2, "bytes": 10},
                    {"name": "beta", "count": 0, "bytes": 0}
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ACCOUNT))
        .and(query_param("limit", "2"))
        .and(query_param("marker", "beta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "gamma", "count": 1, "bytes": 5}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ACCOUNT))
        .and(query_param("marker", "gamma"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (account, first) = client
        .list_containers()
        .limit(2)
        .newest(true)
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(account.meta("owner"), Some("ops"));
    assert_eq!(account.container_count(), Some(3));
    assert_eq!(first.len(), 2);
    assert_eq!(
        first.next_page_uri().unwrap().query(),
        Some("limit=2&marker=beta")
    );

    let names: Vec<String> = client
        .pages(first)
        .map(|page| page.unwrap().into_items())
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .flatten()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn empty_listing_has_no_next_page() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("{ACCOUNT}/photos")))
        .and(query_param("delimiter", "/"))
        .and(query_param("prefix", "2024/"))
        .respond_with(ResponseTemplate::new(204).insert_header("X-Container-Object-Count", "0"))
        .mount(&server)
        .await;

    let (container, page) = client
        .list_objects()
        .container("photos")
        .delimiter('/')
        .prefix("2024/")
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(container.object_count(), Some(0));
    assert!(page.is_empty());
    assert!(!page.has_next_page());
    assert!(client.next_page(&page).await.unwrap().is_none());
}

#[tokio::test]
async fn account_metadata_round_trip() {
    let (server, client) = setup().await;
    Mock::given(method("HEAD"))
        .and(path(ACCOUNT))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("X-Account-Meta-Temp-URL-Key", "secret")
                .insert_header("X-Account-Bytes-Used", "1024"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACCOUNT))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let meta = client.get_account_metadata().build().send().await.unwrap();
    assert_eq!(meta.meta("temp-url-key"), Some("secret"));
    assert_eq!(meta.bytes_used(), Some(1024));

    client
        .update_account_metadata()
        .meta("Owner", "ops")
        .build()
        .send()
        .await
        .unwrap();
    client.remove_account_metadata(&["Old"]).await.unwrap();

    let posts = requests_with_method(&server, "POST").await;
    assert_eq!(header_str(&posts[0], "x-account-meta-owner"), Some("ops"));
    assert_eq!(header_str(&posts[1], "x-account-meta-old"), Some(""));

    let err = client.remove_account_metadata(&[""]).await;
    assert!(matches!(err, Err(Error::Common(_))));
}

#[tokio::test]
async fn create_and_remove_container() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ACCOUNT}/docs")))
        .and(header("X-Container-Meta-Project", "apollo"))
        .and(header("X-Versions-Location", "docs%20versions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ACCOUNT}/docs")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path(format!("{ACCOUNT}/docs")))
        .respond_with(
            ResponseTemplate::new(204).insert_header("X-Versions-Location", "docs%20versions"),
        )
        .mount(&server)
        .await;

    client
        .create_container()
        .meta("Project", "apollo")
        .container("docs")
        .versions_location("docs versions")
        .build()
        .send()
        .await
        .unwrap();
    let meta = client
        .get_container_metadata()
        .container("docs")
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(meta.versions_location().as_deref(), Some("docs versions"));
    client.remove_container("docs").await.unwrap();
}

#[tokio::test]
async fn invalid_names_never_reach_the_wire() {
    let (server, client) = setup().await;
    assert!(client.remove_container("a/b").await.is_err());
    assert!(client.remove_object("docs", "").await.is_err());
    assert!(requests_with_method(&server, "DELETE").await.is_empty());
}

#[tokio::test]
async fn create_object_sends_etag_and_schedule() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ACCOUNT}/docs/report.txt")))
        .and(header("ETag", "5eb63bbbe01eeed093cb22bb8f5acdc3"))
        .and(header("Content-Type", "text/plain"))
        .and(header("X-Object-Meta-Author", "ann"))
        .and(header("X-Delete-After", "3600"))
        .and(body_bytes(b"hello world".to_vec()))
        .respond_with(ResponseTemplate::new(201).insert_header("ETag", "5eb63bbbe01eeed093cb22bb8f5acdc3"))
        .expect(1)
        .mount(&server)
        .await;

    let meta = client
        .create_object()
        .meta("Author", "ann")
        .container("docs")
        .object("report.txt")
        .content_type("text/plain")
        .delete_after(3600)
        .build()
        .send(ObjectBody::Bytes(b"hello world".to_vec()))
        .await
        .unwrap();
    assert_eq!(meta.etag(), Some("5eb63bbbe01eeed093cb22bb8f5acdc3"));
}

#[tokio::test]
async fn create_object_from_file() {
    let (server, client) = setup().await;
    let file_path = std::env::temp_dir().join("openstack-sdk-upload-test.bin");
    tokio::fs::write(&file_path, b"file contents").await.unwrap();

    Mock::given(method("PUT"))
        .and(path(format!("{ACCOUNT}/docs/upload.bin")))
        .and(body_bytes(b"file contents".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_object()
        .container("docs")
        .object("upload.bin")
        .build()
        .send(ObjectBody::FilePath(&file_path))
        .await
        .unwrap();
    tokio::fs::remove_file(&file_path).await.unwrap();
}

#[tokio::test]
async fn copy_and_move_object() {
    let (server, client) = setup().await;
    Mock::given(method("COPY"))
        .and(path(format!("{ACCOUNT}/docs/a.txt")))
        .and(header("Destination", "/archive/2024/a.txt"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ACCOUNT}/docs/a.txt")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let at = OffsetDateTime::from_unix_timestamp(1_900_000_000).unwrap();
    client
        .copy_object()
        .source_container("docs")
        .source_object("a.txt")
        .destination_container("archive")
        .destination_object("2024/a.txt")
        .delete_at(at)
        .build()
        .send()
        .await
        .unwrap();
    client
        .move_object("docs", "a.txt", "archive", "2024/a.txt")
        .await
        .unwrap();

    let copies = requests_with_method(&server, "COPY").await;
    assert_eq!(header_str(&copies[0], "x-delete-at"), Some("1900000000"));
    assert_eq!(header_str(&copies[1], "x-delete-at"), None);
}

#[tokio::test]
async fn get_object_with_range() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("{ACCOUNT}/docs/a.txt")))
        .and(header("Range", "bytes=0-4"))
        .and(header("X-Newest", "true"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("X-Object-Meta-Author", "ann")
                .insert_header("X-Delete-At", "1900000000")
                .set_body_bytes(b"hello".to_vec()),
        )
        .expect(2)
        .mount(&server)
        .await;

    let request = client
        .get_object()
        .container("docs")
        .object("a.txt")
        .range(ByteRange::Between(0, 4))
        .newest(true)
        .build();

    let (data, meta) = request.receive_bytes().await.unwrap();
    assert_eq!(&data[..], b"hello");
    assert_eq!(meta.meta("author"), Some("ann"));
    assert_eq!(
        meta.scheduled_deletion_time(),
        Some(OffsetDateTime::from_unix_timestamp(1_900_000_000).unwrap())
    );

    let (stream, _) = request.receive_bytes_stream().await.unwrap();
    let chunks: Vec<_> = stream.collect::<Vec<_>>().await;
    let body: Vec<u8> = chunks
        .into_iter()
        .flat_map(|c| c.unwrap().to_vec())
        .collect();
    assert_eq!(body, b"hello");
}

#[tokio::test]
async fn update_object_metadata_merges_and_filters() {
    let (server, client) = setup().await;
    Mock::given(method("HEAD"))
        .and(path(format!("{ACCOUNT}/docs/a.txt")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/plain")
                .insert_header("ETag", "abc")
                .insert_header("X-Timestamp", "1700000000.00000")
                .insert_header("X-Object-Meta-Author", "ann")
                .insert_header("X-Object-Meta-Stale", "yes"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{ACCOUNT}/docs/a.txt")))
        .and(header_exists("X-Auth-Token"))
        .respond_with(ResponseTemplate::new(202))
        .expect(3)
        .mount(&server)
        .await;

    let updates = ObjectMetadata::default().with_meta("Reviewer", "bob");
    client
        .update_object_metadata("docs", "a.txt", &updates)
        .await
        .unwrap();
    client
        .remove_object_metadata("docs", "a.txt", &["stale"])
        .await
        .unwrap();
    client
        .set_object_delete_after("docs", "a.txt", 60)
        .await
        .unwrap();

    let posts = requests_with_method(&server, "POST").await;
    let merged = &posts[0];
    assert_eq!(header_str(merged, "x-object-meta-author"), Some("ann"));
    assert_eq!(header_str(merged, "x-object-meta-reviewer"), Some("bob"));
    assert_eq!(header_str(merged, "content-type"), Some("text/plain"));
    assert_eq!(header_str(merged, "etag"), None);
    assert_eq!(header_str(merged, "x-timestamp"), None);

    let removed = &posts[1];
    assert_eq!(header_str(removed, "x-object-meta-stale"), None);
    assert_eq!(header_str(removed, "x-object-meta-author"), Some("ann"));

    assert_eq!(header_str(&posts[2], "x-delete-after"), Some("60"));
}

#[tokio::test]
async fn static_website_configuration() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("{ACCOUNT}/site")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{ACCOUNT}/site")))
        .and(header("X-Container-Meta-Web-Index", "index.html"))
        .and(header("X-Container-Meta-Web-Error", "error.html"))
        .and(header("X-Container-Meta-Web-Listings", "TRUE"))
        .and(header("X-Container-Meta-Web-Listings-CSS", "listing.css"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_static_website_container("site", "index.html", "error.html", Some("listing.css"))
        .await
        .unwrap();
    client
        .set_static_website("site", "home.html", "oops.html", None)
        .await
        .unwrap();
    client
        .set_static_website_listings_css("site", "dark.css")
        .await
        .unwrap();
    client.remove_static_website_index("site").await.unwrap();

    let posts = requests_with_method(&server, "POST").await;
    let website = &posts[0];
    assert_eq!(header_str(website, "x-container-meta-web-index"), Some("home.html"));
    assert_eq!(header_str(website, "x-container-meta-web-listings"), Some(""));
    assert_eq!(header_str(website, "x-container-meta-web-listings-css"), Some(""));

    let css = &posts[1];
    assert_eq!(header_str(css, "x-container-meta-web-listings"), Some("TRUE"));
    assert_eq!(header_str(css, "x-container-meta-web-listings-css"), Some("dark.css"));
    assert_eq!(header_str(css, "x-container-meta-web-index"), None);

    assert_eq!(header_str(&posts[2], "x-container-meta-web-index"), Some(""));
}

#[tokio::test]
async fn container_quotas() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("{ACCOUNT}/limited")))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path(format!("{ACCOUNT}/limited")))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("X-Container-Meta-Quota-Bytes", "1048576")
                .insert_header("X-Container-Meta-Quota-Count", "100"),
        )
        .mount(&server)
        .await;

    client
        .set_container_quota("limited", Some(1_048_576), None)
        .await
        .unwrap();
    client.remove_container_quota("limited").await.unwrap();

    let posts = requests_with_method(&server, "POST").await;
    assert_eq!(header_str(&posts[0], "x-container-meta-quota-bytes"), Some("1048576"));
    assert_eq!(header_str(&posts[0], "x-container-meta-quota-count"), None);
    assert_eq!(header_str(&posts[1], "x-container-meta-quota-count"), Some(""));
    assert_eq!(header_str(&posts[1], "x-container-meta-quota-bytes"), Some(""));

    let meta = client
        .get_container_metadata()
        .container("limited")
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(meta.quota_bytes(), Some(1_048_576));
    assert_eq!(meta.quota_count(), Some(100));
}

#[tokio::test]
async fn info_is_host_relative() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "swift": {"max_file_size": 5368709122_i64},
            "slo": {"max_manifest_segments": 1000, "min_segment_size": 1, "max_manifest_size": 8388608},
            "container_quotas": {},
            "staticweb": {},
            "formpost": {}
        })))
        .mount(&server)
        .await;

    let info = client.get_info().await.unwrap();
    assert_eq!(info.max_object_size(), Some(5368709122));
    assert_eq!(info.max_manifest_segments(), Some(1000));
    assert!(client.supports_container_quotas().await.unwrap());
    assert!(client.supports_static_website().await.unwrap());
    assert!(client.supports_form_post().await.unwrap());
    assert!(!client.supports_extract_archive().await.unwrap());
}

#[tokio::test]
async fn extract_archive_into_container() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ACCOUNT}/backups")))
        .and(query_param("extract-archive", "tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Number Files Created": 3,
            "Response Status": "201 Created",
            "Response Body": "",
            "Errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .extract_archive()
        .container("backups")
        .format(ArchiveFormat::TarGz)
        .build()
        .send(ObjectBody::Bytes(vec![0x1f, 0x8b]))
        .await
        .unwrap();
    assert!(resp.is_success());
    assert_eq!(resp.files_created, 3);

    let err = client
        .extract_archive()
        .object_prefix("x/")
        .format(ArchiveFormat::Tar)
        .build()
        .send(ObjectBody::Bytes(Vec::new()))
        .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn list_objects_continues_after_subdir() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("{ACCOUNT}/photos")))
        .and(query_param("delimiter", "/"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "a.txt", "hash": "abc", "bytes": 3, "content_type": "text/plain"},
            {"subdir": "b/"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{ACCOUNT}/photos")))
        .and(query_param("delimiter", "/"))
        .and(query_param("marker", "b/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (_, first) = client
        .list_objects()
        .container("photos")
        .delimiter('/')
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.items()[1].is_directory());

    let next = client.next_page(&first).await.unwrap().unwrap();
    assert!(next.is_empty());
    assert!(!next.has_next_page());
}

#[tokio::test]
async fn download_object_to_file() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("{ACCOUNT}/docs/a.txt")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Object-Meta-Author", "ann")
                .set_body_bytes(b"downloaded body".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let file_path = std::env::temp_dir().join("openstack-sdk-download-test.txt");
    let meta = client
        .get_object()
        .container("docs")
        .object("a.txt")
        .build()
        .download_to_file(&file_path)
        .await
        .unwrap();
    assert_eq!(meta.meta("author"), Some("ann"));
    assert_eq!(tokio::fs::read(&file_path).await.unwrap(), b"downloaded body");
    tokio::fs::remove_file(&file_path).await.unwrap();
}

#[tokio::test]
async fn scheduled_deletion_at_and_cancel() {
    let (server, client) = setup().await;
    Mock::given(method("HEAD"))
        .and(path(format!("{ACCOUNT}/docs/a.txt")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Delete-At", "1800000000")
                .insert_header("X-Object-Meta-Author", "ann"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{ACCOUNT}/docs/a.txt")))
        .respond_with(ResponseTemplate::new(202))
        .expect(2)
        .mount(&server)
        .await;

    let at = OffsetDateTime::from_unix_timestamp(1_900_000_000).unwrap();
    client
        .set_object_delete_at("docs", "a.txt", at)
        .await
        .unwrap();
    client
        .remove_object_scheduled_deletion("docs", "a.txt")
        .await
        .unwrap();

    let posts = requests_with_method(&server, "POST").await;
    assert_eq!(header_str(&posts[0], "x-delete-at"), Some("1900000000"));
    assert_eq!(header_str(&posts[0], "x-object-meta-author"), Some("ann"));

    assert_eq!(header_str(&posts[1], "x-delete-at"), None);
    assert_eq!(header_str(&posts[1], "x-delete-after"), None);
    assert_eq!(header_str(&posts[1], "x-object-meta-author"), Some("ann"));
}

#[tokio::test]
async fn static_website_error_page_and_listings() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("{ACCOUNT}/site")))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    client
        .set_static_website_error("site", "oops.html")
        .await
        .unwrap();
    client.remove_static_website_error("site").await.unwrap();
    client
        .remove_static_website_listings_css("site")
        .await
        .unwrap();

    let posts = requests_with_method(&server, "POST").await;
    assert_eq!(header_str(&posts[0], "x-container-meta-web-error"), Some("oops.html"));
    assert_eq!(header_str(&posts[0], "x-container-meta-web-index"), None);
    assert_eq!(header_str(&posts[0], "x-container-meta-web-listings"), None);

    assert_eq!(header_str(&posts[1], "x-container-meta-web-error"), Some(""));
    assert_eq!(posts[1].url.query(), None);

    let listings = &posts[2];
    assert_eq!(header_str(listings, "x-container-meta-web-listings"), Some(""));
    assert_eq!(header_str(listings, "x-container-meta-web-listings-css"), Some(""));
    assert_eq!(header_str(listings, "x-container-meta-web-error"), None);
}

#[tokio::test]
async fn update_and_remove_container_metadata() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("{ACCOUNT}/docs")))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    client
        .update_container_metadata()
        .meta("Owner", "ops")
        .container("docs")
        .versions_location("docs versions")
        .build()
        .send()
        .await
        .unwrap();
    client
        .remove_container_metadata("docs", &["Old"])
        .await
        .unwrap();

    let posts = requests_with_method(&server, "POST").await;
    assert_eq!(header_str(&posts[0], "x-container-meta-owner"), Some("ops"));
    assert_eq!(header_str(&posts[0], "x-versions-location"), Some("docs%20versions"));

    assert_eq!(header_str(&posts[1], "x-container-meta-old"), Some(""));
    assert_eq!(header_str(&posts[1], "x-container-meta-owner"), None);
    assert_eq!(header_str(&posts[1], "x-versions-location"), None);
}

#[tokio::test]
async fn versioned_container_helpers() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ACCOUNT}/docs")))
        .and(header("X-Versions-Location", "docs-versions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{ACCOUNT}/docs")))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    client
        .create_versioned_container("docs", "docs-versions")
        .await
        .unwrap();
    client
        .set_versions_location("docs", "older")
        .await
        .unwrap();
    client.remove_versions_location("docs").await.unwrap();
    assert!(client.set_versions_location("docs", "a/b").await.is_err());

    let posts = requests_with_method(&server, "POST").await;
    assert_eq!(posts.len(), 2);
    assert_eq!(header_str(&posts[0], "x-versions-location"), Some("older"));
    assert_eq!(header_str(&posts[1], "x-versions-location"), Some(""));
}

#[tokio::test]
async fn extract_archive_prefix_stays_in_path() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ACCOUNT}/backups/what%3F/")))
        .and(query_param("extract-archive", "tar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Number Files Created": 1,
            "Response Status": "201 Created",
            "Response Body": "",
            "Errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .extract_archive()
        .container("backups")
        .object_prefix("what?/")
        .format(ArchiveFormat::Tar)
        .build()
        .send(ObjectBody::Bytes(vec![0x75, 0x73]))
        .await
        .unwrap();
    assert_eq!(resp.files_created, 1);

    let puts = requests_with_method(&server, "PUT").await;
    assert_eq!(puts[0].url.query(), Some("extract-archive=tar"));
}

#[tokio::test]
async fn not_found_is_request_failure() {
    let (server, client) = setup().await;
    Mock::given(method("HEAD"))
        .and(path(format!("{ACCOUNT}/docs/missing")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client
        .get_object_metadata()
        .container("docs")
        .object("missing")
        .build()
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
}

/// Runs against a real cluster described by `tests/object_storage/config.toml`.
#[tokio::test]
#[ignore]
async fn live_list_containers() {
    let file_str = std::fs::read_to_string("tests/object_storage/config.toml").unwrap();
    let auth: StaticAuthentication = toml::from_str(&file_str).unwrap();
    let client = object_storage::Client::builder()
        .auth(Arc::new(auth))
        .build();

    let res = client.list_containers().build().send().await;
    match res {
        Ok((meta, page)) => println!("meta:\n{:#?}\nres:\n{:#?}", meta, page.items()),
        Err(e) => println!("{}", e),
    }
}
