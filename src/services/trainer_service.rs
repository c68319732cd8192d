// src/services/trainer_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateTrainerPayload, UpdateTrainerPayload, User, UserRole},
};

#[derive(Clone)]
pub struct TrainerService {
    user_repo: UserRepository,
}

impl TrainerService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<User>, AppError> {
        self.user_repo.list_trainers(organization_id).await
    }

    pub async fn get(&self, organization_id: Uuid, trainer_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_trainer(organization_id, trainer_id)
            .await?
            .ok_or(AppError::TrainerNotFound)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &CreateTrainerPayload,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Só os dois papéis de professor passam por esta rota
        let role = match payload.role {
            Some(UserRole::Pt) => UserRole::Pt,
            _ => UserRole::Trainer,
        };

        // Sem hash de senha: o professor define a sua no primeiro acesso,
        // e um hash vazio nunca valida no login.
        self.user_repo
            .create_user(
                executor,
                organization_id,
                payload.branch_id,
                &payload.email,
                "",
                &payload.first_name,
                &payload.last_name,
                payload.phone.as_deref(),
                role,
            )
            .await
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        trainer_id: Uuid,
        payload: &UpdateTrainerPayload,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let trainer = self
            .user_repo
            .find_trainer(organization_id, trainer_id)
            .await?
            .ok_or(AppError::TrainerNotFound)?;

        let updated = self
            .user_repo
            .update_trainer(
                &mut *tx,
                trainer.id,
                payload.first_name.as_deref(),
                payload.last_name.as_deref(),
                payload.phone.as_deref(),
                payload.avatar.as_deref(),
                payload.branch_id,
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn deactivate<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        trainer_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trainer = self
            .user_repo
            .find_trainer(organization_id, trainer_id)
            .await?
            .ok_or(AppError::TrainerNotFound)?;

        self.user_repo.deactivate(executor, trainer.id).await
    }
}
