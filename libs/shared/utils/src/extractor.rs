use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use axum_extra::{typed_header::TypedHeaderRejection, TypedHeader};
use headers::{authorization::Bearer, Authorization};
use tracing::debug;

use shared_models::error::AppError;

use crate::guard::{authorize, Access};
use crate::jwt::validate_token;
use crate::state::AppState;

/// Middleware state: the app state plus the access rule of the routes it wraps.
#[derive(Clone)]
pub struct AccessGuard {
    state: AppState,
    access: Access,
}

/// Verifies the bearer assertion, applies the access rule and hands the
/// resulting [`shared_models::auth::Identity`] to handlers as an extension.
pub async fn auth_middleware(
    State(guard): State<AccessGuard>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = match bearer {
        Ok(TypedHeader(Authorization(bearer))) => {
            let identity = validate_token(bearer.token(), &guard.state.config.jwt_secret)
                .map_err(|e| AppError::Unauthorized(e.to_string()))?;
            Some(identity)
        }
        Err(rejection) if rejection.is_missing() => None,
        Err(rejection) => {
            debug!("Rejected authorization header: {}", rejection);
            return Err(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ));
        }
    };

    let identity = authorize(identity.as_ref(), guard.access)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Puts every route already in `router` behind `access`.
pub fn guarded(router: Router<AppState>, state: &AppState, access: Access) -> Router<AppState> {
    let guard = AccessGuard {
        state: state.clone(),
        access,
    };
    router.route_layer(middleware::from_fn_with_state(guard, auth_middleware))
}
