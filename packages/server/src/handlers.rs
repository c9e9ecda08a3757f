//! HTTP handler functions for the dashboard.

use actix_web::{HttpResponse, http::header::ContentType, web};
use crime_dashboard::Session;
use crime_dashboard_geography_models::DIVISION_ID_PROPERTY;
use crime_dashboard_server_models::{
    ApiError, ApiHealth, LayoutResponse, UpdateRequest, YearOption,
};

use crate::AppState;

/// Page title shown in the header and the browser tab.
pub const PAGE_TITLE: &str = "Los Angeles - Violent Crime Ratio by Division";

const INDEX_HTML: &str = include_str!("../static/index.html");

/// `GET /`
///
/// Serves the single-page dashboard.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML.replace("{{TITLE}}", PAGE_TITLE))
}

/// `GET /_dashboard/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        incidents: state.context.incidents().len() as u64,
        divisions: state.context.boundaries().len() as u64,
    })
}

/// `GET /_dashboard/layout`
///
/// Opens a session in the initial state and returns its id with the page
/// layout and the initial render.
pub async fn layout(state: web::Data<AppState>) -> HttpResponse {
    let ctx = state.context.as_ref();

    let mut session = Session::new(ctx);
    let initial = session.render(ctx);

    let Ok(mut sessions) = state.sessions.lock() else {
        log::error!("Session store lock poisoned");
        return HttpResponse::InternalServerError().json(ApiError::new("Session unavailable"));
    };
    let id = sessions.open(session);
    log::debug!("Opened session {id} ({} open)", sessions.len());
    drop(sessions);

    let years = ctx
        .year_options()
        .into_iter()
        .map(|value| YearOption {
            label: value.label(ctx.years()),
            value,
        })
        .collect();

    HttpResponse::Ok().json(LayoutResponse {
        session: id,
        title: PAGE_TITLE.to_string(),
        years,
        divisions: ctx.boundaries().summaries(),
        division_id_property: DIVISION_ID_PROPERTY.to_string(),
        boundaries: ctx.boundaries().to_feature_collection(),
        initial,
    })
}

/// `POST /_dashboard/update`
///
/// Applies one interaction event to the caller's session and returns the
/// parts of the page that changed.
pub async fn update(
    state: web::Data<AppState>,
    request: web::Json<UpdateRequest>,
) -> HttpResponse {
    let ctx = state.context.as_ref();
    let UpdateRequest { session, event } = request.into_inner();

    let Ok(mut sessions) = state.sessions.lock() else {
        log::error!("Session store lock poisoned");
        return HttpResponse::InternalServerError().json(ApiError::new("Session unavailable"));
    };
    let Some(current) = sessions.get_mut(&session) else {
        log::debug!("Update for unknown session {session}");
        return HttpResponse::NotFound()
            .json(ApiError::new("Session expired; reload the page"));
    };

    match current.apply(ctx, &event) {
        Ok(payload) => HttpResponse::Ok().json(payload),
        Err(e) => {
            log::warn!("Refused {event:?}: {e}");
            HttpResponse::BadRequest().json(ApiError::new(e))
        }
    }
}
