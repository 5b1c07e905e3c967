//! In-process stand-in for the image service

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use backdrop::cache::{CacheManager, ImageFetcher};
use backdrop::catalog::Catalog;
use backdrop::config::Config;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Routes = Arc<Mutex<HashMap<String, (u16, Vec<u8>)>>>;

/// Minimal HTTP/1.1 server answering each request target from a route table
///
/// Unknown targets get a 404. Every request target is recorded in order.
pub struct ImageServer {
    pub base_url: String,
    routes: Routes,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ImageServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Listener should have an address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes: Routes = Arc::new(Mutex::new(HashMap::new()));

        let table = routes.clone();
        let log = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let table = table.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    while read < buf.len() {
                        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        read += n;
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]);
                    let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    log.lock().unwrap().push(target.clone());

                    let (status, body) = table
                        .lock()
                        .unwrap()
                        .get(&target)
                        .cloned()
                        .unwrap_or((404, Vec::new()));
                    let reason = if status == 200 { "OK" } else { "Not Found" };
                    let head = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        status,
                        reason,
                        body.len()
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            routes,
            requests,
        }
    }

    /// Answers `url` with `status` and `body`
    pub fn route(&self, url: &str, status: u16, body: Vec<u8>) {
        let target = url.strip_prefix(&self.base_url).unwrap_or(url).to_string();
        self.routes.lock().unwrap().insert(target, (status, body));
    }

    /// Serves every catalog entry with status 200 except those named in `missing`
    pub fn serve_catalog(&self, catalog: &Catalog, missing: &[&str]) {
        for image in catalog.entries() {
            if !missing.contains(&image.name.as_str()) {
                self.route(&image.url, 200, body_for(&image.name));
            }
        }
    }

    /// Request targets received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Body served for a catalog entry; unique per name so content can be checked
pub fn body_for(name: &str) -> Vec<u8> {
    format!("jpeg bytes of {}", name).into_bytes()
}

/// Cache manager for `catalog` in a fresh `img` directory under `root`
///
/// The fetcher bypasses any system proxy so requests reach the loopback server.
pub fn cache_manager(root: &std::path::Path, catalog: Catalog) -> CacheManager {
    let config = Config::with_image_dir(root.join("img")).with_catalog(catalog);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .no_proxy()
        .build()
        .expect("client should build");
    CacheManager::with_fetcher(config, ImageFetcher::with_client(client))
}
