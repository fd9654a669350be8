//! HerokuClient against a canned local HTTP responder.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use launchpad_core::{AddonId, AppName, RemoteAppHandle};
use launchpad_platform::{HerokuClient, PlatformApi, PlatformError};
use rstest::rstest;

/// One request as seen by the responder.
#[derive(Debug)]
struct Captured {
    request_line: String,
    headers: Vec<String>,
    body: String,
}

/// Serve `responses` in order, one connection each, and report what was
/// received. Returns the base URL.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("header");
                let line = line.trim_end().to_owned();
                if line.is_empty() {
                    break;
                }
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap_or(0);
                }
                headers.push(line);
            }
            let mut buf = vec![0u8; content_length];
            reader.read_exact(&mut buf).expect("body");

            let _ = tx.send(Captured {
                request_line: request_line.trim_end().to_owned(),
                headers,
                body: String::from_utf8_lossy(&buf).into_owned(),
            });

            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("respond");
        }
    });

    (base, rx)
}

fn handle() -> RemoteAppHandle {
    RemoteAppHandle {
        id: "01234567".into(),
        name: AppName::parse("demo").unwrap(),
    }
}

#[test]
fn create_app_posts_name_and_decodes_app() {
    let (base, rx) = serve(vec![(
        201,
        r#"{"id":"01234567","name":"demo","git_url":"https://git.heroku.com/demo.git","web_url":"https://demo.herokuapp.com/"}"#,
    )]);
    let client = HerokuClient::with_base_url("secret-key", base);

    let app = client.create_app(&AppName::parse("demo").unwrap()).expect("create");
    assert_eq!(app.id, "01234567");
    assert_eq!(app.git_url.as_deref(), Some("https://git.heroku.com/demo.git"));

    let req = rx.recv().expect("captured");
    assert_eq!(req.request_line, "POST /apps HTTP/1.1");
    assert!(req.body.contains(r#""name":"demo""#), "body: {}", req.body);
    assert!(req
        .headers
        .iter()
        .any(|h| h.eq_ignore_ascii_case("authorization: Bearer secret-key")));
    assert!(req
        .headers
        .iter()
        .any(|h| h.to_ascii_lowercase().starts_with("accept: application/vnd.heroku+json")));
}

#[test]
fn install_addon_scale_and_config_vars_hit_app_paths() {
    let (base, rx) = serve(vec![
        (201, r#"{"id":"a1"}"#),
        (200, r#"{"MONGOLAB_URI":"mongodb://u:p@h:1/db","FOO":"bar"}"#),
        (200, r#"{"quantity":3}"#),
    ]);
    let client = HerokuClient::with_base_url("k", base);
    let app = handle();

    client
        .install_addon(&app, &AddonId::from("mongolab"))
        .expect("addon");
    let vars = client.config_vars(&app).expect("vars");
    client.scale_process(&app, "worker", 3).expect("scale");

    assert_eq!(vars.get("FOO").map(String::as_str), Some("bar"));

    let addon = rx.recv().unwrap();
    assert_eq!(addon.request_line, "POST /apps/demo/addons HTTP/1.1");
    assert!(addon.body.contains(r#""plan":"mongolab""#));

    let fetch = rx.recv().unwrap();
    assert_eq!(fetch.request_line, "GET /apps/demo/config-vars HTTP/1.1");

    let scale = rx.recv().unwrap();
    assert_eq!(scale.request_line, "PATCH /apps/demo/formation/worker HTTP/1.1");
    assert!(scale.body.contains(r#""quantity":3"#));
}

#[rstest]
#[case::unauthorized(401, r#"{"id":"unauthorized","message":"Invalid credentials provided."}"#)]
#[case::taken(422, r#"{"id":"invalid_params","message":"Name demo is already taken"}"#)]
#[case::server(503, r#"{"id":"unavailable","message":"down"}"#)]
fn error_statuses_are_classified(#[case] status: u16, #[case] body: &'static str) {
    let (base, _rx) = serve(vec![(status, body)]);
    let client = HerokuClient::with_base_url("k", base);

    let err = client.create_app(&AppName::parse("demo").unwrap()).unwrap_err();
    match status {
        401 => assert!(matches!(err, PlatformError::Unauthorized { .. }), "{err}"),
        422 => assert!(matches!(err, PlatformError::Conflict { .. }), "{err}"),
        _ => assert!(matches!(err, PlatformError::Status { code: 503, .. }), "{err}"),
    }
}

#[test]
fn unreachable_host_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = HerokuClient::with_base_url("k", base);
    let err = client.app_info(&handle()).unwrap_err();
    assert!(matches!(err, PlatformError::Transport(_)), "{err}");
}

#[test]
fn garbage_body_is_decode_error() {
    let (base, _rx) = serve(vec![(200, "not json")]);
    let client = HerokuClient::with_base_url("k", base);
    let err = client.config_vars(&handle()).unwrap_err();
    assert!(matches!(err, PlatformError::Decode(_)), "{err}");
}
