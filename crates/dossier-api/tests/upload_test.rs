//! Registration upload API integration tests.
//!
//! Run with: `cargo test -p dossier-api --test upload_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use dossier_services::{sha256_hex, VirusTotalService};
use helpers::fixtures::{create_minimal_png, create_test_pdf, file_part};
use helpers::{create_test_config, setup_test_app, setup_test_app_with, StubReputation};
use serde_json::Value;
use std::collections::HashMap;

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_upload_single_pdf_with_unknown_hash() {
    let app = setup_test_app();
    let pdf = create_test_pdf("cpf");

    let form = MultipartForm::new().add_part(
        "repdoc1",
        file_part(pdf.clone(), "cpf.pdf", "application/pdf"),
    );
    let response = app
        .client()
        .post("/register/contact-42/upload")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    let timestamp = body["timestamp"].as_str().expect("timestamp should be a string");
    assert!(timestamp.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    assert_eq!(app.storage.keys(), vec!["contact-42/01-rep-documento-cpf.pdf"]);
    assert_eq!(
        app.storage.read("contact-42/01-rep-documento-cpf.pdf").await,
        pdf
    );
    assert_eq!(app.reputation.call_count(), 1);
}

#[tokio::test]
async fn test_unknown_field_makes_no_external_calls() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_part(
        "randomfield",
        file_part(create_minimal_png(), "photo.png", "image/png"),
    );
    let response = app
        .client()
        .post("/register/contact-42/upload")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unknown field");
    assert_eq!(body["code"], "UNKNOWN_FIELD");
    assert_eq!(app.reputation.call_count(), 0);
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_unknown_file_type_rejected() {
    let app = setup_test_app();

    let form = MultipartForm::new()
        .add_part(
            "admdoc1",
            file_part(create_test_pdf("contrato"), "contrato.pdf", "application/pdf"),
        )
        .add_part("admdoc2", file_part(b"GIF89a".to_vec(), "balanco.gif", "image/gif"));
    let response = app
        .client()
        .post("/register/contact-42/upload")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unknown file type");
    assert_eq!(body["code"], "UNKNOWN_FILE_TYPE");
    assert_eq!(app.reputation.call_count(), 0);
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_all_document_slots_stored_in_request_order() {
    let app = setup_test_app();

    let fields = [
        ("admdoc1", "adm-contrato-social"),
        ("admdoc2", "adm-demonstracao-contabil"),
        ("admdoc3", "adm-documento-identidade-empresario"),
        ("admdoc4", "adm-documento-identidade-administrador"),
        ("admdoc5", "adm-procuracao-operador"),
        ("repdoc1", "rep-documento-cpf"),
        ("repdoc2", "rep-documento-rg"),
        ("repdoc3", "rep-comprovante-endereco"),
    ];

    let mut form = MultipartForm::new();
    for (field, _) in fields.iter().rev() {
        form = form.add_part(
            *field,
            file_part(
                create_test_pdf(field),
                &format!("{}.pdf", field),
                "application/pdf",
            ),
        );
    }

    let response = app
        .client()
        .post("/register/c-100/upload")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200);
    let expected: Vec<String> = fields
        .iter()
        .rev()
        .enumerate()
        .map(|(i, (_, slot))| format!("c-100/{:02}-{}.pdf", i + 1, slot))
        .collect();
    assert_eq!(app.storage.keys(), expected);
    assert_eq!(app.reputation.call_count(), 8);
}

#[tokio::test]
async fn test_single_detection_is_tolerated() {
    let png = create_minimal_png();
    let reputation = StubReputation {
        detections: HashMap::from([(sha256_hex(&png), 1)]),
        ..StubReputation::default()
    };
    let app = setup_test_app_with(create_test_config(), reputation);

    let form = MultipartForm::new().add_part("repdoc2", file_part(png, "rg.PNG", "image/png"));
    let response = app.client().post("/register/abc/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.storage.keys(), vec!["abc/01-rep-documento-rg.PNG"]);
}

#[tokio::test]
async fn test_virus_detected_via_virustotal_blocks_batch() {
    let clean = create_test_pdf("clean");
    let infected = create_test_pdf("infected");

    let mut server = mockito::Server::new_async().await;
    let clean_mock = server
        .mock("GET", format!("/api/v3/files/{}", sha256_hex(&clean)).as_str())
        .match_header("x-apikey", "test-key")
        .with_status(404)
        .create_async()
        .await;
    let infected_mock = server
        .mock("GET", format!("/api/v3/files/{}", sha256_hex(&infected)).as_str())
        .match_header("x-apikey", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "data": { "attributes": { "last_analysis_stats": {
                    "malicious": 5, "suspicious": 0, "undetected": 55, "harmless": 0
                } } }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = create_test_config();
    config.virustotal_base_url = server.url();
    let virustotal = VirusTotalService::new(server.url(), "test-key".to_string(), 5, false)
        .expect("Failed to create VirusTotal client");
    let app = setup_test_app_with(config, virustotal);

    let form = MultipartForm::new()
        .add_part("admdoc1", file_part(clean, "contrato.pdf", "application/pdf"))
        .add_part("admdoc2", file_part(infected, "balanco.pdf", "application/pdf"));
    let response = app
        .client()
        .post("/register/contact-7/upload")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Virus detected");
    assert_eq!(body["code"], "VIRUS_DETECTED");
    assert!(app.storage.keys().is_empty());

    clean_mock.assert_async().await;
    infected_mock.assert_async().await;
}

#[tokio::test]
async fn test_reputation_fault_is_bad_gateway() {
    let pdf = create_test_pdf("any");
    let reputation = StubReputation {
        failing: vec![sha256_hex(&pdf)],
        ..StubReputation::default()
    };
    let app = setup_test_app_with(create_test_config(), reputation);

    let form =
        MultipartForm::new().add_part("repdoc1", file_part(pdf, "cpf.pdf", "application/pdf"));
    let response = app.client().post("/register/c1/upload").multipart(form).await;

    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert_eq!(body["code"], "REPUTATION_ERROR");
    // Collaborator details never leak to clients
    assert!(body.get("details").is_none());
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_oversized_file_rejected() {
    let mut config = create_test_config();
    config.max_file_size_bytes = 1024;
    let app = setup_test_app_with(config, StubReputation::default());

    let form = MultipartForm::new().add_part(
        "admdoc1",
        file_part(vec![b'a'; 4096], "contrato.pdf", "application/pdf"),
    );
    let response = app.client().post("/register/c1/upload").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(app.reputation.call_count(), 0);
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_too_many_files_rejected() {
    let mut config = create_test_config();
    config.max_files = 2;
    let app = setup_test_app_with(config, StubReputation::default());

    let form = MultipartForm::new()
        .add_part("admdoc1", file_part(create_test_pdf("1"), "1.pdf", "application/pdf"))
        .add_part("admdoc2", file_part(create_test_pdf("2"), "2.pdf", "application/pdf"))
        .add_part("admdoc3", file_part(create_test_pdf("3"), "3.pdf", "application/pdf"));
    let response = app.client().post("/register/c1/upload").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_plain_text_field_rejected() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_text("comment", "hello");
    let response = app.client().post("/register/c1/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_contact_id_kept_verbatim_in_key() {
    let app = setup_test_app();
    let pdf = create_test_pdf("cpf");

    let form = MultipartForm::new().add_part(
        "repdoc1",
        file_part(pdf.clone(), "cpf.pdf", "application/pdf"),
    );
    let response = app
        .client()
        .post("/register/ana%231/upload")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.storage.keys(), vec!["ana#1/01-rep-documento-cpf.pdf"]);
    assert_eq!(app.storage.read("ana#1/01-rep-documento-cpf.pdf").await, pdf);
}
