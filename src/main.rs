// src/main.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger antes de qualquer coisa.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação públicas (o /me protegido entra separado)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/logout", post(handlers::auth::logout))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::me))
                .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    let member_routes = Router::new()
        .route("/"
               , post(handlers::members::create_member)
               .get(handlers::members::list_members)
        )
        .route("/{id}"
               , get(handlers::members::get_member)
               .patch(handlers::members::update_member)
               .delete(handlers::members::delete_member)
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // A vitrine pública fica fora do guard; o resto exige token
    let plan_routes = Router::new()
        .route("/public/{organizationSlug}", get(handlers::plans::public_plans))
        .merge(
            Router::new()
                .route("/"
                       , post(handlers::plans::create_plan)
                       .get(handlers::plans::list_plans)
                )
                .route("/{id}"
                       , get(handlers::plans::get_plan)
                       .patch(handlers::plans::update_plan)
                       .delete(handlers::plans::delete_plan)
                )
                .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    let membership_routes = Router::new()
        .route("/"
               , post(handlers::memberships::assign_membership)
               .get(handlers::memberships::list_memberships)
        )
        .route("/{id}", get(handlers::memberships::get_membership))
        .route("/{id}/renew", post(handlers::memberships::renew_membership))
        .route("/{id}/freeze", post(handlers::memberships::freeze_membership))
        .route("/{id}/unfreeze", post(handlers::memberships::unfreeze_membership))
        .route("/{id}/cancel", post(handlers::memberships::cancel_membership))
        .route("/{id}/upgrade", post(handlers::memberships::upgrade_membership))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let payment_routes = Router::new()
        .route("/"
               , post(handlers::payments::create_payment)
               .get(handlers::payments::list_payments)
        )
        .route("/stats", get(handlers::payments::payment_stats))
        .route("/member/{memberId}", get(handlers::payments::member_payments))
        .route("/{id}", get(handlers::payments::get_payment))
        .route("/{id}/refund", post(handlers::payments::refund_payment))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let lead_routes = Router::new()
        .route("/"
               , post(handlers::leads::create_lead)
               .get(handlers::leads::list_leads)
        )
        .route("/stats", get(handlers::leads::lead_stats))
        .route("/{id}"
               , get(handlers::leads::get_lead)
               .patch(handlers::leads::update_lead)
               .delete(handlers::leads::delete_lead)
        )
        .route("/{id}/activities", post(handlers::leads::add_lead_activity))
        .route("/{id}/convert", post(handlers::leads::convert_lead))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let attendance_routes = Router::new()
        .route("/check-in", post(handlers::attendance::check_in))
        .route("/check-in/member-id", post(handlers::attendance::check_in_by_code))
        .route("/check-out", post(handlers::attendance::check_out))
        .route("/today", get(handlers::attendance::today_attendance))
        .route("/member/{memberId}", get(handlers::attendance::member_attendance))
        .route("/", get(handlers::attendance::attendance_history))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let class_routes = Router::new()
        .route("/"
               , post(handlers::classes::create_class)
               .get(handlers::classes::list_classes)
        )
        .route("/schedules"
               , post(handlers::classes::create_schedule)
               .get(handlers::classes::list_schedules)
        )
        .route("/bookings", post(handlers::classes::book_class))
        .route("/bookings/{id}/cancel", post(handlers::classes::cancel_booking))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let trainer_routes = Router::new()
        .route("/"
               , post(handlers::trainers::create_trainer)
               .get(handlers::trainers::list_trainers)
        )
        .route("/{id}"
               , get(handlers::trainers::get_trainer)
               .patch(handlers::trainers::update_trainer)
               .delete(handlers::trainers::delete_trainer)
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::summary))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/members", member_routes)
        .nest("/plans", plan_routes)
        .nest("/memberships", membership_routes)
        .nest("/payments", payment_routes)
        .nest("/leads", lead_routes)
        .nest("/attendance", attendance_routes)
        .nest("/classes", class_routes)
        .nest("/trainers", trainer_routes)
        .nest("/dashboard", dashboard_routes);

    let app = Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "status": "ok",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }))
            }),
        )
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
