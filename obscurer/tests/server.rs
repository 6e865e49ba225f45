use std::sync::Arc;

use obscurer::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

struct Create;
struct Order;

#[async_trait]
impl Handler for Create {
    async fn handle(
        &self,
        _request: &Request,
        response: &mut dyn ResponseWriter,
    ) -> Result<(), Error> {
        response.set_header("location", "/orders/1");
        response.write_head(201);
        response.write(b"created");
        Ok(())
    }
}

#[async_trait]
impl Handler for Order {
    async fn handle(
        &self,
        request: &Request,
        response: &mut dyn ResponseWriter,
    ) -> Result<(), Error> {
        response.write(format!("order at {}", request.path()).as_bytes());
        Ok(())
    }
}

async fn start(store: Arc<MemoryStore>) -> String {
    let router = Router::new()
        .route("/orders", Create)
        .route("/orders/1", Order);
    let server = Server::new(Obscure::new(Arc::new(Sha1Obscurer), store, router));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        server.serve(listener).await.unwrap();
    });

    addr
}

async fn get(addr: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            format!(
                "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
                path, addr
            )
            .as_bytes(),
        )
        .await
        .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

fn header<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    response
        .split("\r\n\r\n")
        .next()?
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
}

#[tokio::test]
async fn test_obscure_and_follow() {
    let store = Arc::new(MemoryStore::new());
    let addr = start(store.clone()).await;

    let response = get(&addr, "/orders").await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"));
    assert!(response.ends_with("created"));

    let location = header(&response, "location").unwrap().to_string();
    let expected = Sha1Obscurer.obscure(&Url::parse("/orders/1").unwrap());
    assert_eq!(location, expected.to_string());
    assert_eq!(store.size(), 1);

    // Following the obscured URL reaches the original resource.
    let response = get(&addr, &location).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("order at /orders/1"));
    assert_eq!(header(&response, "connection"), Some("close"));
}

#[tokio::test]
async fn test_forget_missing() {
    let store = Arc::new(MemoryStore::new());
    store
        .put(&Url::parse("/abc").unwrap(), &Url::parse("/orders/2").unwrap())
        .unwrap();
    let addr = start(store.clone()).await;

    let response = get(&addr, "/abc").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(response.contains("404 - Not Found"));
    assert_eq!(store.size(), 0);
}
