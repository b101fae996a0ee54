use cvpress::analyze::AtsClient;
use cvpress::Error;

#[test]
fn uploads_pdf_and_decodes_report() {
    // Stub analysis endpoint serving a canned scoring report
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();

    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let body = r#"{"atsScore": 78, "strengths": ["clear formatting"], "gaps": ["no metrics"], "fixes": ["quantify impact"]}"#;
            let response = tiny_http::Response::from_string(body).with_header(
                "Content-Type: application/json"
                    .parse::<tiny_http::Header>()
                    .unwrap(),
            );
            let _ = request.respond(response);
        }
    });

    let url = format!("http://{}/api/resume/analyze", addr);
    let client = AtsClient::new(&url, 5_000).expect("client");
    let report = client
        .analyze_bytes("resume.pdf", b"%PDF-1.7 stub".to_vec())
        .expect("analysis request");

    assert_eq!(report.ats_score, 78);
    assert_eq!(report.strengths, vec!["clear formatting"]);
    assert_eq!(report.gaps, vec!["no metrics"]);
    assert_eq!(report.fixes, vec!["quantify impact"]);
}

#[test]
fn non_success_status_is_an_upload_error() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();

    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = tiny_http::Response::from_string("busy").with_status_code(503);
            let _ = request.respond(response);
        }
    });

    let url = format!("http://{}/api/resume/analyze", addr);
    let client = AtsClient::new(&url, 5_000).expect("client");
    let err = client.analyze_bytes("resume.pdf", b"%PDF-1.7 stub".to_vec()).err();
    assert!(matches!(err, Some(Error::UploadError(_))));
}
