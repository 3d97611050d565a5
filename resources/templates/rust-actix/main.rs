use actix_web::{get, web, App, HttpServer, Responder};
use serde::Serialize;

#[derive(Serialize)]
struct Reply {
    message: &'static str,
    status: &'static str,
}

#[get("/")]
async fn root() -> impl Responder {
    web::Json(Reply {
        message: "Hello World",
        status: "ok",
    })
}

#[get("/health")]
async fn health() -> impl Responder {
    web::Json(Reply {
        message: "",
        status: "healthy",
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Server running on http://localhost:8000");
    HttpServer::new(|| App::new().service(root).service(health))
        .bind(("0.0.0.0", 8000))?
        .run()
        .await
}
