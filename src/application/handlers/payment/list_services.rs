//! ListPaidServicesHandler - the services a client can currently buy.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::agents::{AgentCatalog, AgentKind};
use crate::domain::payment::PaidService;

/// Query for the paid service list.
#[derive(Debug, Clone, Default)]
pub struct ListPaidServicesQuery;

/// One purchasable service as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaidServiceView {
    /// Agent unlocked by the purchase.
    pub agent: AgentKind,
    pub name: &'static str,
    pub description: &'static str,
    /// Price in yuan.
    pub price: f64,
    pub price_fen: u32,
}

/// Paid services keyed by service type.
pub type ListPaidServicesResult = BTreeMap<&'static str, PaidServiceView>;

/// Handler listing monetized services.
pub struct ListPaidServicesHandler {
    catalog: Arc<AgentCatalog>,
}

impl ListPaidServicesHandler {
    pub fn new(catalog: Arc<AgentCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, _query: ListPaidServicesQuery) -> ListPaidServicesResult {
        self.catalog
            .paid()
            .filter_map(|descriptor| {
                let service = PaidService::for_agent(descriptor.kind)?;
                Some((
                    service.as_str(),
                    PaidServiceView {
                        agent: descriptor.kind,
                        name: descriptor.display_name,
                        description: descriptor.description,
                        price: descriptor.price_yuan(),
                        price_fen: descriptor.price_fen,
                    },
                ))
            })
            .collect()
    }
}
