//! Medical handlers.
//!
//! ## Commands
//! - Chat: classify a message and route it to the answering agent
//! - Report interpretation from an uploaded document
//! - Health education and medication questions
//! - Dermatology consultation from an uploaded photo
//!
//! The standalone consultations share one payment gate; the chat flow is
//! never gated.

mod ask_question;
mod dermatology_consultation;
mod interpret_report;
mod medical_chat;
mod payment_gate;

pub use ask_question::{
    AskQuestionCommand, AskQuestionHandler, EMPTY_MEDICATION_QUESTION_MESSAGE,
    EMPTY_QUESTION_MESSAGE,
};
pub use dermatology_consultation::{DermatologyConsultationCommand, DermatologyConsultationHandler};
pub use interpret_report::{InterpretReportCommand, InterpretReportHandler, EMPTY_REPORT_MESSAGE};
pub use medical_chat::{MedicalChatCommand, MedicalChatHandler, EMPTY_MESSAGE};
pub use payment_gate::{check_payment, PAYMENT_REQUIRED_MESSAGE};
