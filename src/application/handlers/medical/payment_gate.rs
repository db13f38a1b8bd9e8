//! Payment gate shared by the standalone consultation endpoints.

use crate::domain::agents::{AgentCatalog, AgentKind};
use crate::domain::foundation::{Envelope, CODE_PAYMENT_REQUIRED};

/// Failure message for a monetized agent called without a verified payment.
pub const PAYMENT_REQUIRED_MESSAGE: &str = "该服务需要支付，请先完成支付";

/// Returns the 402 envelope when `kind` is monetized and the caller has not
/// shown a verified payment.
pub fn check_payment(
    catalog: &AgentCatalog,
    kind: AgentKind,
    payment_verified: bool,
) -> Option<Envelope> {
    if catalog.requires_payment(kind) && !payment_verified {
        tracing::info!(agent = %kind, "payment required");
        return Some(Envelope::failure_with_code(
            PAYMENT_REQUIRED_MESSAGE,
            CODE_PAYMENT_REQUIRED,
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_agents_pass() {
        let catalog = AgentCatalog::new();
        assert!(check_payment(&catalog, AgentKind::Medication, false).is_none());
    }

    #[test]
    fn paid_agents_need_verification() {
        let catalog = AgentCatalog::with_monetization(&[AgentKind::Medication], 990);

        let blocked = check_payment(&catalog, AgentKind::Medication, false).unwrap();
        assert_eq!(blocked.code, CODE_PAYMENT_REQUIRED);
        assert_eq!(blocked.message, PAYMENT_REQUIRED_MESSAGE);
        assert!(!blocked.is_success());

        assert!(check_payment(&catalog, AgentKind::Medication, true).is_none());
        assert!(check_payment(&catalog, AgentKind::HealthEducation, false).is_none());
    }
}
