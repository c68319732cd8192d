use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Cada variante carrega um código estável que o dashboard usa para
// decidir o que mostrar; a mensagem é apenas para humanos.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Autenticação ---
    #[error("E-mail ou senha inválidos")]
    InvalidCredentials,

    #[error("Token de autenticação inválido ou ausente")]
    InvalidToken,

    #[error("Este e-mail já está em uso")]
    EmailAlreadyExists,

    // --- Entidades não encontradas ---
    // Registros de outra organização também caem aqui, de propósito:
    // um 404 não revela se o registro existe em outro tenant.
    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Organização não encontrada")]
    OrganizationNotFound,

    #[error("Membro não encontrado")]
    MemberNotFound,

    #[error("Plano não encontrado")]
    PlanNotFound,

    #[error("Matrícula não encontrada")]
    MembershipNotFound,

    #[error("Pagamento não encontrado")]
    PaymentNotFound,

    #[error("Lead não encontrado")]
    LeadNotFound,

    #[error("Professor não encontrado")]
    TrainerNotFound,

    #[error("Aula não encontrada")]
    ClassNotFound,

    #[error("Horário não encontrado")]
    ScheduleNotFound,

    #[error("Reserva não encontrada")]
    BookingNotFound,

    // --- Regras de negócio: matrículas ---
    #[error("Duração inválida para este plano")]
    InvalidDuration,

    #[error("{0}")]
    InvalidStatus(String),

    #[error("Este plano não permite congelamento")]
    FreezeNotAllowed,

    #[error("Máximo de dias de congelamento ({0}) excedido")]
    MaxFreezeExceeded(i32),

    // --- Regras de negócio: pagamentos e leads ---
    #[error("Pagamento já estornado")]
    AlreadyRefunded,

    #[error("Lead já convertido")]
    AlreadyConverted,

    // --- Regras de negócio: presença e aulas ---
    #[error("Membro bloqueado")]
    MemberBlocked,

    #[error("Matrícula congelada")]
    MembershipFrozen,

    #[error("Membro sem matrícula ativa")]
    NoActiveMembership,

    #[error("Check-in já registrado hoje")]
    AlreadyCheckedIn,

    #[error("Nenhum check-in em aberto encontrado")]
    NoActiveCheckIn,

    #[error("Membro já reservado para esta aula")]
    AlreadyBooked,

    #[error("Reserva já cancelada")]
    AlreadyCancelled,

    #[error("Aula lotada")]
    ClassFull,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // Código estável exposto no corpo do erro.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::EmailAlreadyExists => "EMAIL_EXISTS",
            AppError::UserNotFound
            | AppError::OrganizationNotFound
            | AppError::MemberNotFound
            | AppError::PlanNotFound
            | AppError::MembershipNotFound
            | AppError::PaymentNotFound
            | AppError::LeadNotFound
            | AppError::TrainerNotFound
            | AppError::ClassNotFound
            | AppError::ScheduleNotFound
            | AppError::BookingNotFound => "NOT_FOUND",
            AppError::InvalidDuration => "INVALID_DURATION",
            AppError::InvalidStatus(_) => "INVALID_STATUS",
            AppError::FreezeNotAllowed => "FREEZE_NOT_ALLOWED",
            AppError::MaxFreezeExceeded(_) => "MAX_FREEZE_EXCEEDED",
            AppError::AlreadyRefunded => "ALREADY_REFUNDED",
            AppError::AlreadyConverted => "ALREADY_CONVERTED",
            AppError::MemberBlocked => "MEMBER_BLOCKED",
            AppError::MembershipFrozen => "MEMBERSHIP_FROZEN",
            AppError::NoActiveMembership => "NO_ACTIVE_MEMBERSHIP",
            AppError::AlreadyCheckedIn => "ALREADY_CHECKED_IN",
            AppError::NoActiveCheckIn => "NO_ACTIVE_CHECKIN",
            AppError::AlreadyBooked => "ALREADY_BOOKED",
            AppError::AlreadyCancelled => "ALREADY_CANCELLED",
            AppError::ClassFull => "CLASS_FULL",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidDuration
            | AppError::InvalidStatus(_)
            | AppError::FreezeNotAllowed
            | AppError::MaxFreezeExceeded(_)
            | AppError::AlreadyRefunded
            | AppError::AlreadyConverted
            | AppError::AlreadyCheckedIn
            | AppError::AlreadyBooked
            | AppError::AlreadyCancelled
            | AppError::ClassFull => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::MemberBlocked
            | AppError::MembershipFrozen
            | AppError::NoActiveMembership => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::OrganizationNotFound
            | AppError::MemberNotFound
            | AppError::PlanNotFound
            | AppError::MembershipNotFound
            | AppError::PaymentNotFound
            | AppError::LeadNotFound
            | AppError::TrainerNotFound
            | AppError::ClassNotFound
            | AppError::ScheduleNotFound
            | AppError::BookingNotFound
            | AppError::NoActiveCheckIn => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Validação retorna todos os detalhes por campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "success": false,
                "error": {
                    "code": self.code(),
                    "message": "Um ou mais campos são inválidos.",
                    "details": details,
                },
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let status = self.status_code();

        // Erros inesperados viram 500 genérico; o detalhe fica só no log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
            "Ocorreu um erro inesperado.".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message,
            },
        }));
        (status, body).into_response()
    }
}
