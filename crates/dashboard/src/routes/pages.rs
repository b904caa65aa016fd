//! Page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect};

use crate::filters;
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::user::User;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub user: Option<User>,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: User,
}

/// Display the landing page.
pub async fn landing(OptionalUser(user): OptionalUser) -> impl IntoResponse {
    LandingTemplate { user }
}

/// Legacy alias for the landing page.
pub async fn landing_redirect() -> Redirect {
    Redirect::to("/")
}

/// Display the dashboard for the logged-in user.
pub async fn dashboard(RequireUser(user): RequireUser) -> impl IntoResponse {
    DashboardTemplate { user }
}
