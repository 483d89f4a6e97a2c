use axum::{extract::Path, routing::any, Router};

pub fn new_router() -> Router {
    Router::new().route("/todos/:todo_id", any(todo_show))
}

/// Echoes the path parameter. Served outside the pipeline.
async fn todo_show(Path(todo_id): Path<String>) -> String {
    format!("Todo show: {todo_id}\n")
}
