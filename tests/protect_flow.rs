//! End-to-end material protection against a mock Indico instance.

use indico_client::Event;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crier::error::CrierError;
use crier::protect::protect_event_material;

fn export_body(server_uri: &str) -> serde_json::Value {
    json!({
        "count": 1,
        "results": [{
            "sessions": [{
                "id": 1,
                "contributions": [{
                    "id": 77,
                    "url": format!("{server_uri}/event/424242/contributions/77/"),
                    "folders": [{
                        "id": 8,
                        "title": "Presentation materials",
                        "attachments": [
                            {
                                "id": 9,
                                "filename": "slides.pdf",
                                "description": "",
                                "is_protected": false,
                                "download_url": format!("{server_uri}/event/424242/contributions/77/attachments/8/9/slides.pdf"),
                            },
                            {
                                "id": 10,
                                "filename": "notes.pdf",
                                "description": "",
                                "is_protected": true,
                                "download_url": format!("{server_uri}/event/424242/contributions/77/attachments/8/10/notes.pdf"),
                            },
                            {
                                "id": 11,
                                "filename": "agenda.pdf",
                                "description": "Draft agenda",
                                "is_protected": false,
                                "download_url": format!("{server_uri}/event/424242/contributions/77/attachments/8/11/agenda.pdf"),
                            },
                        ],
                    }],
                }],
            }],
        }],
    })
}

async fn mount_export(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/export/event/424242.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(export_body(&server.uri())))
        .mount(server)
        .await;
}

async fn mount_registration_forms(server: &MockServer, forms: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/event/424242/api/registration-forms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forms))
        .mount(server)
        .await;
}

fn single_form() -> serde_json::Value {
    json!([{"identifier": "RegistrationForm:99", "title": "Participants"}])
}

fn event_for(server: &MockServer) -> Event {
    Event::new(424242, "tok")
        .unwrap()
        .with_instance_url(server.uri())
}

#[tokio::test]
async fn protects_unprotected_attachments_with_registrant_acl() {
    let server = MockServer::start().await;
    mount_export(&server).await;
    mount_registration_forms(&server, single_form()).await;

    // Attachment 9 has no description: the protection notice stands alone.
    Mock::given(method("POST"))
        .and(path("/event/424242/manage/contributions/77/attachments/8/9"))
        .and(body_string_contains("folder=__None"))
        .and(body_string_contains("protected=y"))
        .and(body_string_contains("acl=%5B%22RegistrationForm%3A99%22%5D"))
        .and(body_string_contains(
            "description=The+organisers+have+restricted+access",
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    // Attachment 11 keeps its existing description in front of the notice.
    Mock::given(method("POST"))
        .and(path("/event/424242/manage/contributions/77/attachments/8/11"))
        .and(body_string_contains(
            "description=Draft+agenda.%0A%0AThe+organisers",
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let report = protect_event_material(&event_for(&server)).await.unwrap();
    assert_eq!(report.protected, 2);
    assert_eq!(report.already_protected, 1);
}

#[tokio::test]
async fn zero_registration_forms_aborts_without_updates() {
    let server = MockServer::start().await;
    mount_export(&server).await;
    mount_registration_forms(&server, json!([])).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = protect_event_material(&event_for(&server)).await;
    assert!(matches!(result, Err(CrierError::Protect(_))));
}

#[tokio::test]
async fn multiple_registration_forms_abort_without_updates() {
    let server = MockServer::start().await;
    mount_export(&server).await;
    mount_registration_forms(
        &server,
        json!([
            {"identifier": "RegistrationForm:1", "title": "Speakers"},
            {"identifier": "RegistrationForm:2", "title": "Participants"},
        ]),
    )
    .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = protect_event_material(&event_for(&server)).await;
    match result {
        Err(CrierError::Protect(message)) => {
            assert!(message.contains("RegistrationForm:1"), "{message}");
            assert!(message.contains("RegistrationForm:2"), "{message}");
        }
        other => panic!("expected protect error, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_update_aborts_the_run() {
    let server = MockServer::start().await;
    mount_export(&server).await;
    mount_registration_forms(&server, single_form()).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let result = protect_event_material(&event_for(&server)).await;
    assert!(matches!(result, Err(CrierError::Indico(_))));
}
