use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use comicsync::FetchError;
use comicsync::XkcdClient;
use comicsync::error::IsRetryable;
use comicsync::source::RetryPolicy;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;
use url::Url;

const COMIC_614: &str = r#"{"month": "7", "num": 614, "link": "", "year": "2009", "news": "", "safe_title": "Woodpecker", "transcript": "", "alt": "If you don't have an extension cord I can get that too.  Because we're friends!  Right?", "img": "https://imgs.xkcd.com/comics/woodpecker.png", "title": "Woodpecker", "day": "24"}"#;

/// Serves `failures` error responses with `status`, then `body`.
#[derive(Clone)]
struct Scripted {
    status: StatusCode,
    failures: usize,
    body: &'static str,
    hits: Arc<AtomicUsize>,
}

impl Scripted {
    fn new(status: StatusCode, failures: usize, body: &'static str) -> Self {
        Self {
            status,
            failures,
            body,
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn scripted_handler(State(s): State<Scripted>) -> Response {
    let n = s.hits.fetch_add(1, Ordering::SeqCst);
    if n < s.failures {
        return (s.status, "upstream unhappy").into_response();
    }
    ([(header::CONTENT_TYPE, "application/json")], s.body).into_response()
}

async fn spawn_upstream(s: Scripted) -> Url {
    let app = Router::new()
        .route("/info.0.json", get(scripted_handler))
        .route("/614/info.0.json", get(scripted_handler))
        .with_state(s);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{addr}")).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

fn client(base: Url, max_times: usize) -> XkcdClient {
    XkcdClient::with_client(
        reqwest::Client::new(),
        base,
        RetryPolicy::new(max_times, Duration::from_millis(10)),
    )
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let s = Scripted::new(StatusCode::SERVICE_UNAVAILABLE, 2, COMIC_614);
    let base = spawn_upstream(s.clone()).await;

    let latest = client(base, 3).fetch_latest().await.expect("third attempt succeeds");
    assert_eq!(latest.id, 614);
    assert_eq!(latest.title, "Woodpecker");
    assert_eq!(s.hits(), 3);
}

#[tokio::test]
async fn rate_limiting_exhausts_the_retry_budget() {
    let s = Scripted::new(StatusCode::TOO_MANY_REQUESTS, usize::MAX, COMIC_614);
    let base = spawn_upstream(s.clone()).await;

    let err = client(base, 2).fetch_latest().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    assert!(err.is_retryable());
    assert_eq!(s.hits(), 3);
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let s = Scripted::new(StatusCode::NOT_FOUND, usize::MAX, COMIC_614);
    let base = spawn_upstream(s.clone()).await;

    let err = client(base, 3).fetch_item(614).await.unwrap_err();
    assert!(matches!(err, FetchError::UpstreamStatus { status, .. } if status == StatusCode::NOT_FOUND));
    assert_eq!(s.hits(), 1);
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    let s = Scripted::new(StatusCode::OK, 0, "<html>maintenance</html>");
    let base = spawn_upstream(s.clone()).await;

    let err = client(base, 3).fetch_latest().await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedBody { .. }), "{err}");
    assert_eq!(s.hits(), 1);
}

#[tokio::test]
async fn item_is_decoded_into_a_comic() {
    let s = Scripted::new(StatusCode::OK, 0, COMIC_614);
    let base = spawn_upstream(s.clone()).await;

    let comic = client(base, 0).fetch_item(614).await.expect("comic 614");
    assert_eq!(comic.id, 614);
    assert_eq!(comic.img_url, "https://imgs.xkcd.com/comics/woodpecker.png");
    assert_eq!(comic.date_published.to_string(), "2009-07-24");
}

#[tokio::test]
async fn connection_refused_is_a_retryable_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let base = Url::parse(&format!("http://{addr}")).unwrap();

    let err = client(base, 1).fetch_latest().await.unwrap_err();
    assert!(matches!(err, FetchError::Request { .. }), "{err}");
    assert!(err.is_retryable());
}
