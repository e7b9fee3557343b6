//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, items, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Circulation API",
        version = "0.3.0",
        description = "Library circulation REST API: checkout, return, loan listings",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Inventory
        items::get_availability,
        // Loans
        loans::create_loan,
        loans::return_loan,
        loans::list_loans,
    ),
    components(
        schemas(
            // Inventory
            crate::models::item::Availability,
            // Loans
            loans::CheckoutRequestBody,
            loans::LoanResponse,
            loans::ReturnResponse,
            crate::models::loan::LoanRecord,
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanView,
            crate::models::loan::DueStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Inventory availability"),
        (name = "loans", description = "Loan lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
