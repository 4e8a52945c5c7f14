use std::time::Duration;

use scopus_roster::crossref::CrossrefClient;
use scopus_roster::pipeline::{self, authors_unavailable, authors_without_doi, PipelineOptions};
use scopus_roster::roster::{AuthorRecord, Roster};
use scopus_roster::scopus::ScopusClient;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn roster() -> Roster {
    Roster::new(vec![
        AuthorRecord {
            orcid: Some("0000-0002-3485-9329".to_string()),
            scopus_id: "57211082959".to_string(),
            name: "Vasilis Naserentin".to_string(),
        },
        AuthorRecord {
            orcid: None,
            scopus_id: "7101892857".to_string(),
            name: "Graham Kemp".to_string(),
        },
    ])
}

fn options() -> PipelineOptions {
    PipelineOptions {
        year: Some(2024),
        max_results: 50,
        author_delay: Duration::ZERO,
    }
}

async fn mount_scopus(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/content/search/scopus"))
        .and(query_param("query", "AU-ID(57211082959) AND PUBYEAR IS 2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search-results": { "entry": [
                {
                    "dc:title": "Digital twins for city planning",
                    "prism:publicationName": "Buildings",
                    "prism:doi": "10.3390/dt1"
                },
                { "prism:publicationName": "Untitled Proceedings" },
                {
                    "dc:title": "Mesh generation for urban CFD",
                    "prism:publicationName": "Computers & Graphics"
                }
            ]}
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/content/search/scopus"))
        .and(query_param("query", "AU-ID(7101892857) AND PUBYEAR IS 2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search-results": { "entry": [
                { "@_fa": "true", "error": "Result set was empty" }
            ]}
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn two_author_roster_produces_two_rows() {
    let server = MockServer::start().await;
    mount_scopus(&server).await;
    Mock::given(method("GET"))
        .and(path("/works/10.3390/dt1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "author": [
                { "given": "Vasilis", "family": "Naserentin" },
                { "given": "Anders", "family": "Logg" }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let scopus = ScopusClient::new("key", Duration::from_secs(5))
        .expect("scopus")
        .with_base_url(server.uri());
    let crossref = CrossrefClient::new("tests@example.com", Duration::from_secs(5))
        .expect("crossref")
        .with_base_url(server.uri());

    let table = pipeline::run(&roster(), &scopus, Some(&crossref), &options()).await;
    assert_eq!(table.len(), 2);

    let rows = table.rows();
    assert_eq!(rows[0].authors, "Vasilis Naserentin, Anders Logg");
    assert_eq!(rows[1].title.as_deref(), Some("Mesh generation for urban CFD"));
    assert_eq!(rows[1].authors, authors_without_doi("Vasilis Naserentin"));

    let dir = TempDir::new().expect("tempdir");
    let out = dir.path().join("publications.csv");
    table.write_csv(&out).expect("write");

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&out)
        .expect("reader");
    let records: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>().expect("rows");
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.len(), 8);
    assert_eq!(&first[0], "Digital twins for city planning");
    assert_eq!(&first[2], "10.3390/dt1");
    assert_eq!(&first[5], "Vasilis Naserentin, Anders Logg");
    assert_eq!(&first[7], "Buildings");
    for blank in [1, 3, 4, 6] {
        assert!(first[blank].is_empty());
    }
    assert_eq!(&records[1][2], "No DOI available");
    assert_eq!(&records[1][7], "Computers & Graphics");
}

#[tokio::test]
async fn empty_crossref_answer_uses_unavailable_note() {
    let server = MockServer::start().await;
    mount_scopus(&server).await;
    Mock::given(method("GET"))
        .and(path("/works/10.3390/dt1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let scopus = ScopusClient::new("key", Duration::from_secs(5))
        .expect("scopus")
        .with_base_url(server.uri());
    let crossref = CrossrefClient::new("tests@example.com", Duration::from_secs(5))
        .expect("crossref")
        .with_base_url(server.uri());

    let table = pipeline::run(&roster(), &scopus, Some(&crossref), &options()).await;
    assert_eq!(table.rows()[0].authors, authors_unavailable("Vasilis Naserentin"));
}

#[tokio::test]
async fn dedup_collapses_shared_publications() {
    let server = MockServer::start().await;
    let shared = json!({
        "search-results": { "entry": [
            { "dc:title": "Shared paper", "prism:publicationName": "Buildings" }
        ]}
    });
    Mock::given(method("GET"))
        .and(path("/content/search/scopus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shared))
        .expect(2)
        .mount(&server)
        .await;

    let scopus = ScopusClient::new("key", Duration::from_secs(5))
        .expect("scopus")
        .with_base_url(server.uri());

    let table = pipeline::run(&roster(), &scopus, None, &options()).await;
    assert_eq!(table.len(), 2);

    let deduped = table.dedup_by_title();
    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped.rows()[0].authors, authors_without_doi("Vasilis Naserentin"));
    assert_eq!(deduped.dedup_by_title(), deduped);
}
