#[cfg(test)]
use axum::Router;

#[cfg(test)]
use crate::features::inspection::models::PhotoFile;

/// Serve `router` on an ephemeral local port and return its base URL
#[cfg(test)]
pub async fn spawn_test_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[cfg(test)]
pub fn sample_photo(name: &str) -> PhotoFile {
    PhotoFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
}

#[cfg(test)]
pub fn sample_photos(count: usize) -> Vec<PhotoFile> {
    (0..count)
        .map(|i| sample_photo(&format!("photo-{}.jpg", i)))
        .collect()
}
