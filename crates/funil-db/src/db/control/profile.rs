use funil_core::models::{Profile, UserRole};
use funil_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create or refresh the profile of an authenticated user.
    ///
    /// The email follows the identity provider; a name already stored
    /// (possibly edited by the user) is kept. Role and tenant are never
    /// touched here.
    #[tracing::instrument(skip(self, email, full_name), fields(db.table = "profiles", db.operation = "upsert"))]
    pub async fn upsert_from_identity(
        &self,
        id: Uuid,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<Profile, AppError> {
        sqlx::query_as::<Postgres, Profile>(
            r#"
            INSERT INTO profiles (id, email, full_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                full_name = COALESCE(profiles.full_name, EXCLUDED.full_name),
                updated_at = CASE
                    WHEN profiles.email IS DISTINCT FROM EXCLUDED.email
                      OR (profiles.full_name IS NULL AND EXCLUDED.full_name IS NOT NULL)
                    THEN NOW()
                    ELSE profiles.updated_at
                END
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, profile_id = %id, "Failed to upsert profile");
            AppError::Database(e)
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<Postgres, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, profile_id = %id, "Failed to fetch profile");
                AppError::Database(e)
            })
    }

    #[tracing::instrument(skip(self, full_name), fields(db.table = "profiles", db.operation = "update"))]
    pub async fn update_full_name(
        &self,
        id: Uuid,
        full_name: Option<&str>,
    ) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<Postgres, Profile>(
            r#"
            UPDATE profiles SET full_name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(full_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, profile_id = %id, "Failed to update profile");
            AppError::Database(e)
        })
    }

    /// Change a user's role (admin CLI)
    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "update"))]
    pub async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<Postgres, Profile>(
            r#"
            UPDATE profiles SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, profile_id = %id, "Failed to set profile role");
            AppError::Database(e)
        })?;

        if profile.is_some() {
            tracing::info!(profile_id = %id, role = %role, "Profile role changed");
        }
        Ok(profile)
    }
}
