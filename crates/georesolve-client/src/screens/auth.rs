//! Login, registration and logout. The only writers of the session.

use tracing::info;

use georesolve_shared::protocol::{AuthResponse, LoginRequest, RegisterRequest};
use georesolve_shared::{Role, User, ValidationError};

use super::ScreenContext;
use crate::error::{ClientError, Result};
use crate::events::Notice;
use crate::routes::Route;

fn required(value: &str, field: &'static str) -> std::result::Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Persist the session and pick the role's home screen.
fn establish(
    ctx: &ScreenContext,
    response: Result<AuthResponse>,
    success: &str,
    fallback: &str,
) -> Result<Route> {
    match response.and_then(|auth| ctx.session.begin(auth)) {
        Ok(session) => {
            ctx.notify(Notice::success(success));
            Ok(Route::home_for(session.role()))
        }
        Err(e) => {
            ctx.notify_error(&e, fallback);
            Err(e)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    fn validate(&self) -> std::result::Result<LoginRequest, ValidationError> {
        Ok(LoginRequest {
            email: required(&self.email, "Email")?,
            password: required(&self.password, "Password")?,
        })
    }

    /// Returns the screen to show next.
    pub async fn submit(&self, ctx: &ScreenContext) -> Result<Route> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(e) => {
                let e = ClientError::from(e);
                ctx.notify_error(&e, "Login failed");
                return Err(e);
            }
        };
        info!(email = %request.email, "logging in");
        let response = ctx.auth.login(&request).await;
        establish(ctx, response, "Login successful!", "Login failed")
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            role: Role::Citizen,
        }
    }
}

impl RegisterForm {
    fn validate(&self) -> std::result::Result<RegisterRequest, ValidationError> {
        Ok(RegisterRequest {
            name: required(&self.name, "Name")?,
            email: required(&self.email, "Email")?,
            phone: required(&self.phone, "Phone")?,
            password: required(&self.password, "Password")?,
            role: self.role,
        })
    }

    pub async fn submit(&self, ctx: &ScreenContext) -> Result<Route> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(e) => {
                let e = ClientError::from(e);
                ctx.notify_error(&e, "Registration failed");
                return Err(e);
            }
        };
        info!(email = %request.email, role = %request.role, "registering");
        let response = ctx.auth.register(&request).await;
        establish(ctx, response, "Registration successful!", "Registration failed")
    }
}

/// Clear both persisted keys and return to the login screen.
pub fn logout(ctx: &ScreenContext) -> Result<Route> {
    ctx.session.end()?;
    ctx.notify(Notice::success("Logged out successfully"));
    Ok(Route::Login)
}

/// Ask the backend who the persisted credential belongs to.
pub async fn whoami(ctx: &ScreenContext) -> Result<User> {
    ctx.session()?;
    ctx.auth.me().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::events::NoticeLevel;
    use crate::test_support::{fake_env, screen_context};

    #[tokio::test]
    async fn test_citizen_login_lands_on_citizen_dashboard() {
        let (session, backend) = fake_env();
        let (ctx, notices) = screen_context(&session, &backend);
        let user = backend.add_account("Ravi", "s3cret", Role::Citizen);

        let form = LoginForm {
            email: user.email.clone(),
            password: "s3cret".into(),
        };
        let next = form.submit(&ctx).await.unwrap();

        assert_eq!(next, Route::CitizenDashboard);
        assert_eq!(ctx.session.navigate(next).0, Route::CitizenDashboard);
        assert_eq!(session.current().unwrap().user, user);
        assert_eq!(notices.drain(), vec![Notice::success("Login successful!")]);
    }

    #[tokio::test]
    async fn test_bad_password_keeps_user_logged_out() {
        let (session, backend) = fake_env();
        let (ctx, notices) = screen_context(&session, &backend);
        let user = backend.add_account("Ravi", "s3cret", Role::Citizen);

        let err = LoginForm {
            email: user.email,
            password: "nope".into(),
        }
        .submit(&ctx)
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AuthFailure);
        assert!(session.current().is_none());
        assert_eq!(notices.drain(), vec![Notice::error("Invalid email or password")]);
    }

    #[tokio::test]
    async fn test_register_admin_goes_to_admin_dashboard() {
        let (session, backend) = fake_env();
        let (ctx, notices) = screen_context(&session, &backend);

        let form = RegisterForm {
            name: "Lakshmi".into(),
            email: "lakshmi@ward.gov".into(),
            phone: "+91 98480 00000".into(),
            password: "pw".into(),
            role: Role::Admin,
        };
        assert_eq!(form.submit(&ctx).await.unwrap(), Route::AdminDashboard);
        assert_eq!(notices.drain()[0].message, "Registration successful!");

        let err = form.submit(&ctx).await.unwrap_err();
        assert_eq!(err.user_message("Registration failed"), "Email already registered");
        assert_eq!(whoami(&ctx).await.unwrap().name, "Lakshmi");
    }

    #[tokio::test]
    async fn test_missing_field_is_caught_locally() {
        let (session, backend) = fake_env();
        let (ctx, notices) = screen_context(&session, &backend);

        let err = LoginForm {
            email: "  ".into(),
            password: "x".into(),
        }
        .submit(&ctx)
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert_eq!(notices.drain(), vec![Notice::error("Email is required")]);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (session, backend) = fake_env();
        let (ctx, notices) = screen_context(&session, &backend);
        crate::test_support::logged_in(&backend, &session, Role::Citizen).await;

        assert_eq!(logout(&ctx).unwrap(), Route::Login);
        assert!(session.current().is_none());
        assert_eq!(ctx.session.navigate(Route::CitizenHistory).0, Route::Login);
        let notice = notices.drain().pop().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Logged out successfully");
        assert!(matches!(whoami(&ctx).await, Err(ClientError::Unauthenticated)));
    }
}
