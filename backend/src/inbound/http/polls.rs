//! Pool HTTP handlers.
//!
//! ```text
//! GET  /polls/count
//! POST /polls          {"title":"World Cup office pool"}
//! POST /polls/join     {"code":"AB12CD"}
//! GET  /polls
//! GET  /polls/{id}
//! ```
//!
//! `/polls/count` and `/polls/join` must be registered before `/polls/{id}`
//! so the literal segments win; see [`configure`].

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{CreatePoolRequest, GetPoolRequest, JoinPoolRequest, ListPoolsRequest};
use crate::domain::{ParticipantPreview, PoolOwner, PoolSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, OptionalUser};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_pool_id, require_field};

const TITLE_FIELD: FieldName = FieldName::new("title");
const CODE_FIELD: FieldName = FieldName::new("code");
const ID_FIELD: FieldName = FieldName::new("id");

/// Response body for `GET /polls/count`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PoolCountResponseBody {
    #[schema(example = 42)]
    pub count: u64,
}

/// Request body for `POST /polls`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequestBody {
    #[schema(example = "World Cup office pool")]
    pub title: Option<String>,
}

/// Response body for `POST /polls`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePoolResponseBody {
    #[schema(example = "AB12CD")]
    pub code: String,
}

/// Request body for `POST /polls/join`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinPoolRequestBody {
    #[schema(example = "ab12cd")]
    pub code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantCountBody {
    pub participants: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantUserBody {
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantPreviewBody {
    pub id: String,
    pub user: ParticipantUserBody,
}

impl From<&ParticipantPreview> for ParticipantPreviewBody {
    fn from(value: &ParticipantPreview) -> Self {
        Self {
            id: value.id.to_string(),
            user: ParticipantUserBody {
                avatar_url: value.avatar_url.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PoolOwnerBody {
    pub id: String,
    pub name: String,
}

impl From<&PoolOwner> for PoolOwnerBody {
    fn from(value: &PoolOwner) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
        }
    }
}

/// Pool read model as clients see it.
///
/// `_count.participants` is the full participant count while
/// `participants` is capped at four samples ordered by join time.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummaryBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub title: String,
    #[schema(example = "AB12CD")]
    pub code: String,
    #[schema(example = "2026-06-11T18:00:00Z")]
    pub created_at: String,
    pub owner_id: Option<String>,
    #[serde(rename = "_count")]
    pub count: ParticipantCountBody,
    pub participants: Vec<ParticipantPreviewBody>,
    pub owner: Option<PoolOwnerBody>,
}

impl From<&PoolSummary> for PoolSummaryBody {
    fn from(value: &PoolSummary) -> Self {
        let pool = value.pool();
        Self {
            id: pool.id.to_string(),
            title: pool.title.clone(),
            code: pool.code.clone(),
            created_at: pool.created_at.to_rfc3339(),
            owner_id: pool.owner_id.as_ref().map(ToString::to_string),
            count: ParticipantCountBody {
                participants: value.participant_count(),
            },
            participants: value
                .participants()
                .iter()
                .map(ParticipantPreviewBody::from)
                .collect(),
            owner: value.owner().map(PoolOwnerBody::from),
        }
    }
}

/// Response body for `GET /polls`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListPoolsResponseBody {
    pub polls: Vec<PoolSummaryBody>,
}

/// Response body for `GET /polls/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GetPoolResponseBody {
    pub poll: Option<PoolSummaryBody>,
}

/// Register the pool routes in matching order.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use pools::inbound::http::polls;
///
/// let _app = App::new().configure(polls::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(count_pools)
        .service(join_pool)
        .service(create_pool)
        .service(list_pools)
        .service(get_pool);
}

/// Count every pool.
#[utoipa::path(
    get,
    path = "/polls/count",
    responses(
        (status = 200, description = "Total number of pools", body = PoolCountResponseBody),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["polls"],
    operation_id = "countPolls",
    security([])
)]
#[get("/polls/count")]
pub async fn count_pools(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<PoolCountResponseBody>> {
    let count = state.pools_query.count_pools().await?;
    Ok(web::Json(PoolCountResponseBody { count }))
}

/// Create a pool. A verified caller becomes its owner and first participant.
#[utoipa::path(
    post,
    path = "/polls",
    request_body = CreatePoolRequestBody,
    responses(
        (status = 201, description = "Pool created", body = CreatePoolResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Join code collision", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["polls"],
    operation_id = "createPoll",
    security((), ("BearerToken" = []))
)]
#[post("/polls")]
pub async fn create_pool(
    state: web::Data<HttpState>,
    caller: OptionalUser,
    payload: web::Json<CreatePoolRequestBody>,
) -> ApiResult<HttpResponse> {
    let title = require_field(payload.into_inner().title, TITLE_FIELD)?;
    let owner = caller.into_inner();
    let anonymous = owner.is_none();

    let created = state
        .pools
        .create_pool(CreatePoolRequest { title, owner })
        .await?;

    info!(pool_id = %created.pool_id, anonymous, "pool created");
    Ok(HttpResponse::Created().json(CreatePoolResponseBody {
        code: created.code.into(),
    }))
}

/// Join a pool by its code.
#[utoipa::path(
    post,
    path = "/polls/join",
    request_body = JoinPoolRequestBody,
    responses(
        (status = 201, description = "Joined"),
        (status = 400, description = "Invalid code, unknown pool or already joined", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["polls"],
    operation_id = "joinPoll",
    security(("BearerToken" = []))
)]
#[post("/polls/join")]
pub async fn join_pool(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<JoinPoolRequestBody>,
) -> ApiResult<HttpResponse> {
    let code = require_field(payload.into_inner().code, CODE_FIELD)?;
    state
        .pools
        .join_pool(JoinPoolRequest {
            code,
            user_id: caller.into_inner(),
        })
        .await?;
    Ok(HttpResponse::Created().finish())
}

/// List the pools the caller participates in, newest first.
#[utoipa::path(
    get,
    path = "/polls",
    responses(
        (status = 200, description = "Caller's pools", body = ListPoolsResponseBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["polls"],
    operation_id = "listPolls",
    security(("BearerToken" = []))
)]
#[get("/polls")]
pub async fn list_pools(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<ListPoolsResponseBody>> {
    let response = state
        .pools_query
        .list_pools(ListPoolsRequest {
            user_id: caller.into_inner(),
        })
        .await?;
    Ok(web::Json(ListPoolsResponseBody {
        polls: response.pools.iter().map(PoolSummaryBody::from).collect(),
    }))
}

/// Fetch one pool. An unknown id yields `{"poll": null}`.
#[utoipa::path(
    get,
    path = "/polls/{id}",
    params(("id" = String, Path, description = "Pool identifier (UUID)")),
    responses(
        (status = 200, description = "Pool detail", body = GetPoolResponseBody),
        (status = 400, description = "Invalid pool id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["polls"],
    operation_id = "getPoll",
    security(("BearerToken" = []))
)]
#[get("/polls/{id}")]
pub async fn get_pool(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<GetPoolResponseBody>> {
    let pool_id = parse_pool_id(&path.into_inner(), ID_FIELD)?;
    let response = state
        .pools_query
        .get_pool(GetPoolRequest { pool_id })
        .await?;
    Ok(web::Json(GetPoolResponseBody {
        poll: response.pool.as_ref().map(PoolSummaryBody::from),
    }))
}

#[cfg(test)]
#[path = "polls_tests.rs"]
mod tests;
