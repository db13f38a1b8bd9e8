//! Application handlers.
//!
//! Command and query handlers that orchestrate agents and payment ports.

pub mod medical;
pub mod payment;

pub use medical::{
    AskQuestionCommand, AskQuestionHandler, DermatologyConsultationCommand,
    DermatologyConsultationHandler, InterpretReportCommand, InterpretReportHandler,
    MedicalChatCommand, MedicalChatHandler,
};
pub use payment::{
    CreatePaymentOrderCommand, CreatePaymentOrderHandler, HandlePaymentNotifyCommand,
    HandlePaymentNotifyHandler, ListPaidServicesHandler, ListPaidServicesQuery,
    ListPaidServicesResult, PaidServiceView, PaymentFlowError, QueryPaymentOrderHandler,
    QueryPaymentOrderQuery,
};
