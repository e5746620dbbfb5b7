use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "TaskFlow API",
        version = "0.1.0",
        description = "Per-user task lists with account registration and login"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/tasks", api = domain_tasks::ApiDoc)
    )
)]
struct TasksDoc;

/// Combined API documentation. Account routes live at the API root,
/// so their document is merged rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = TasksDoc::openapi();
        doc.merge(domain_users::ApiDoc::openapi());
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_task_and_account_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.starts_with("/tasks")));
        assert!(paths.iter().any(|p| p.as_str() == "/register"));
        assert!(paths.iter().any(|p| p.as_str() == "/login"));
    }
}
