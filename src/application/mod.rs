//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates agents and ports. Medical handlers answer with an
//! `Envelope` directly; payment handlers return typed results that the HTTP
//! layer wraps.

pub mod handlers;

pub use handlers::{
    // Medical handlers
    AskQuestionCommand, AskQuestionHandler, DermatologyConsultationCommand,
    DermatologyConsultationHandler, InterpretReportCommand, InterpretReportHandler,
    MedicalChatCommand, MedicalChatHandler,
    // Payment handlers
    CreatePaymentOrderCommand, CreatePaymentOrderHandler, HandlePaymentNotifyCommand,
    HandlePaymentNotifyHandler, ListPaidServicesHandler, ListPaidServicesQuery,
    QueryPaymentOrderHandler, QueryPaymentOrderQuery,
};
