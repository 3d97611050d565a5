use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Reply {
    message: &'static str,
    status: &'static str,
}

async fn root() -> Json<Reply> {
    Json(Reply {
        message: "Hello World",
        status: "ok",
    })
}

async fn health() -> Json<Reply> {
    Json(Reply {
        message: "",
        status: "healthy",
    })
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
    println!("Server running on http://localhost:8000");
    axum::serve(listener, app).await.unwrap();
}
