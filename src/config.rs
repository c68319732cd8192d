// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        AttendanceRepository, ClassRepository, DashboardRepository, LeadRepository,
        MemberRepository, MembershipRepository, OrganizationRepository, PaymentRepository,
        PlanRepository, UserRepository,
    },
    services::{
        AttendanceService, AuthService, ClassService, DashboardService, LeadService,
        MemberService, MembershipService, PaymentService, PlanService, TrainerService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,

    pub auth_service: AuthService,
    pub member_service: MemberService,
    pub plan_service: PlanService,
    pub membership_service: MembershipService,
    pub payment_service: PaymentService,
    pub lead_service: LeadService,
    pub attendance_service: AttendanceService,
    pub class_service: ClassService,
    pub trainer_service: TrainerService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, quem chama
    // decide o que fazer (no main, abortar a inicialização).
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let jwt_refresh_secret =
            env::var("JWT_REFRESH_SECRET").expect("JWT_REFRESH_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let organization_repo = OrganizationRepository::new(db_pool.clone());
        let member_repo = MemberRepository::new(db_pool.clone());
        let plan_repo = PlanRepository::new(db_pool.clone());
        let membership_repo = MembershipRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let attendance_repo = AttendanceRepository::new(db_pool.clone());
        let class_repo = ClassRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            organization_repo.clone(),
            jwt_secret,
            jwt_refresh_secret,
            db_pool.clone(),
        );
        let member_service = MemberService::new(
            member_repo.clone(),
            membership_repo.clone(),
            organization_repo.clone(),
        );
        let plan_service = PlanService::new(plan_repo.clone(), organization_repo.clone());
        let membership_service = MembershipService::new(
            membership_repo.clone(),
            member_repo.clone(),
            plan_repo.clone(),
        );
        let payment_service = PaymentService::new(
            payment_repo.clone(),
            member_repo.clone(),
            organization_repo.clone(),
        );
        let lead_service = LeadService::new(
            lead_repo.clone(),
            member_repo.clone(),
            organization_repo.clone(),
        );
        let attendance_service = AttendanceService::new(
            attendance_repo.clone(),
            member_repo.clone(),
            membership_repo.clone(),
        );
        let class_service =
            ClassService::new(class_repo.clone(), member_repo.clone(), membership_repo.clone());
        let trainer_service = TrainerService::new(user_repo.clone());
        let dashboard_service = DashboardService::new(dashboard_repo.clone());

        Ok(Self {
            db_pool,
            auth_service,
            member_service,
            plan_service,
            membership_service,
            payment_service,
            lead_service,
            attendance_service,
            class_service,
            trainer_service,
            dashboard_service,
        })
    }
}
