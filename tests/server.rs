use std::sync::Arc;

use stockroom::products::MemoryStore;
use stockroom::{app, Config, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

async fn exchange(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

#[tokio::test]
async fn serves_over_tcp_and_shuts_down_gracefully() {
    let config = Config { api_key: "k".to_owned(), seed_sample_data: false, ..Config::default() };
    let router = app::build(&config, Arc::new(MemoryStore::new()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(
        Server::from_listener(listener).serve_with_shutdown(router, async {
            let _ = stopped.await;
        }),
    );

    let welcome = exchange(addr, "GET / HTTP/1.1\r\nhost: test\r\nconnection: close\r\n\r\n").await;
    assert!(welcome.starts_with("HTTP/1.1 200 OK"), "{welcome}");
    assert!(welcome.contains("Welcome to the Product API!"));

    let body = r#"{"name":"Desk","price":150,"category":"office"}"#;
    let created = exchange(
        addr,
        &format!(
            "POST /api/products HTTP/1.1\r\nhost: test\r\nx-api-key: k\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;
    assert!(created.starts_with("HTTP/1.1 201 Created"), "{created}");
    assert!(created.contains(r#""inStock":true"#));

    let denied = exchange(
        addr,
        "DELETE /api/products/1 HTTP/1.1\r\nhost: test\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(denied.starts_with("HTTP/1.1 401 Unauthorized"), "{denied}");

    let odd = exchange(addr, "BREW /pot HTTP/1.1\r\nhost: test\r\nconnection: close\r\n\r\n").await;
    assert!(odd.starts_with("HTTP/1.1 405"), "{odd}");

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
