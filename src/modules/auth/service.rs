use registrar_auth::{TOKEN_TTL_SECONDS, create_access_token};
use registrar_config::{JwtConfig, PasswordConfig};
use registrar_core::validation::normalize_optional;
use registrar_core::{AppError, AppResult, hash_password, verify_missing_account, verify_password};
use registrar_models::UserRole;
use tracing::{info, instrument, warn};

use super::model::{LoginOutcome, LoginRequest, NewUser, RegisterRequest, User};
use super::repository::UserRepository;

const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;
const REF_ID_MAX: usize = 20;

const USERNAME_TAKEN: &str = "username already taken";
const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Register input after every check that needs no storage.
#[derive(Debug)]
struct Registration {
    username: String,
    role: UserRole,
    ref_id: Option<String>,
}

pub struct AuthService;

impl AuthService {
    fn check_registration(request: &RegisterRequest) -> AppResult<Registration> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(AppError::invalid_input("username is required"));
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(AppError::invalid_input(format!(
                "username must be at most {USERNAME_MAX} characters"
            )));
        }
        if request.password.chars().count() < PASSWORD_MIN {
            return Err(AppError::invalid_input(format!(
                "password must be at least {PASSWORD_MIN} characters"
            )));
        }
        let role = UserRole::parse_trimmed(&request.role)?;

        let ref_id = normalize_optional(request.ref_id.clone());
        if let Some(ref_id) = &ref_id
            && ref_id.chars().count() > REF_ID_MAX
        {
            return Err(AppError::invalid_input(format!(
                "ref_id must be at most {REF_ID_MAX} characters"
            )));
        }
        match role {
            UserRole::Student | UserRole::Lecturer if ref_id.is_none() => {
                return Err(AppError::invalid_input(format!(
                    "ref_id is required for role {role}"
                )));
            }
            UserRole::Operator if ref_id.is_some() => {
                return Err(AppError::invalid_input(
                    "ref_id is not allowed for role operator",
                ));
            }
            _ => {}
        }

        Ok(Registration {
            username: username.to_string(),
            role,
            ref_id,
        })
    }

    /// Checks the referenced student or lecturer exists.
    async fn check_reference(
        repo: &dyn UserRepository,
        role: UserRole,
        ref_id: Option<&str>,
    ) -> AppResult<()> {
        let exists = match (role, ref_id) {
            (UserRole::Student, Some(id)) => repo.student_exists(id).await?,
            (UserRole::Lecturer, Some(id)) => repo.lecturer_exists(id).await?,
            _ => return Ok(()),
        };
        if !exists {
            return Err(AppError::invalid_input(format!(
                "ref_id does not reference an existing {}",
                if role == UserRole::Student { "student" } else { "lecturer" }
            )));
        }
        Ok(())
    }

    /// Creates a credential. The password is hashed only after every other
    /// check has passed.
    #[instrument(skip(repo, password_config, request), fields(username = %request.username, role = %request.role))]
    pub async fn register(
        repo: &dyn UserRepository,
        password_config: &PasswordConfig,
        request: RegisterRequest,
    ) -> AppResult<User> {
        let registration = Self::check_registration(&request)?;

        if repo.username_exists(&registration.username).await? {
            warn!("username already taken");
            return Err(AppError::conflict(USERNAME_TAKEN));
        }
        Self::check_reference(repo, registration.role, registration.ref_id.as_deref()).await?;

        let password_hash = hash_password(&request.password, password_config.bcrypt_cost)?;
        let mut user = repo
            .create(&NewUser {
                username: registration.username,
                password_hash,
                role: registration.role,
                ref_id: registration.ref_id,
            })
            .await
            .map_err(|e| e.into_write_error(USERNAME_TAKEN))?;
        user.password_hash.clear();

        info!(user.id = user.id_user, user.role = %user.role, "user registered");
        Ok(user)
    }

    /// Unknown usernames and wrong passwords fail identically, and both
    /// pay for one bcrypt verification.
    #[instrument(skip(repo, jwt_config, request), fields(username = %request.username))]
    pub async fn login(
        repo: &dyn UserRepository,
        jwt_config: &JwtConfig,
        request: LoginRequest,
    ) -> AppResult<LoginOutcome> {
        let user = match repo.find_by_username(&request.username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                verify_missing_account(&request.password);
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
            Err(err) => {
                warn!(error = %err, "credential lookup failed");
                verify_missing_account(&request.password);
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
        };
        if !verify_password(&request.password, &user.password_hash) {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = create_access_token(
            user.id_user,
            &user.username,
            user.role.as_str(),
            user.ref_id.as_deref(),
            jwt_config,
        )?;

        let mut user = user;
        user.password_hash.clear();

        info!(user.id = user.id_user, "user logged in");
        Ok(LoginOutcome {
            token,
            expires_in: TOKEN_TTL_SECONDS,
            user,
        })
    }
}
