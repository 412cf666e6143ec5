//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every pool and health endpoint, the error schemas
//! and the `BearerToken` security scheme. Swagger UI serves it at `/docs` in
//! debug builds.

use crate::inbound::http::polls::{
    CreatePoolRequestBody, CreatePoolResponseBody, GetPoolResponseBody, JoinPoolRequestBody,
    ListPoolsResponseBody, PoolCountResponseBody, PoolSummaryBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer session scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Opaque session token issued by the identity service.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pools backend API",
        description = "Create, join and browse prediction pools.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::polls::count_pools,
        crate::inbound::http::polls::create_pool,
        crate::inbound::http::polls::join_pool,
        crate::inbound::http::polls::list_pools,
        crate::inbound::http::polls::get_pool,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PoolCountResponseBody,
        CreatePoolRequestBody,
        CreatePoolResponseBody,
        JoinPoolRequestBody,
        PoolSummaryBody,
        ListPoolsResponseBody,
        GetPoolResponseBody,
    )),
    tags(
        (name = "polls", description = "Pool creation, membership and listing"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
