#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use routine_editor::{JsonFileSource, RoutineOptions, RoutineSession, http_api};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("ROUTINE_EDITOR_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let mut session = RoutineSession::new(RoutineOptions::from_env());
    if let Ok(path) = std::env::var("ROUTINE_CLASS_LIST") {
        session.load_classes(&JsonFileSource::new(path));
    }

    println!("routine-editor HTTP API listening on http://{addr}");
    http_api::serve(addr, session).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
