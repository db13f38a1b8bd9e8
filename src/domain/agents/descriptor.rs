//! Agent descriptors and the deployment catalog.
//!
//! Names, display names and descriptions are fixed per [`AgentKind`]. The
//! monetization flag and price come from deployment config and are applied
//! once when the catalog is built; the catalog is read-only afterwards.

use serde::Serialize;

use super::AgentKind;

/// Default price of a paid agent, in fen (9.90 CNY).
pub const DEFAULT_PRICE_FEN: u32 = 990;

/// Metadata for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDescriptor {
    pub kind: AgentKind,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Whether the secondary endpoints require a verified payment.
    pub requires_payment: bool,
    /// Price in fen; meaningful only when `requires_payment` is set.
    pub price_fen: u32,
}

impl AgentDescriptor {
    /// Free descriptor for `kind`.
    pub fn base(kind: AgentKind) -> Self {
        Self {
            kind,
            display_name: kind.display_name(),
            description: kind.description(),
            requires_payment: false,
            price_fen: DEFAULT_PRICE_FEN,
        }
    }

    /// Price in yuan, as presented to clients.
    pub fn price_yuan(&self) -> f64 {
        f64::from(self.price_fen) / 100.0
    }
}

/// Descriptors for every agent, indexed by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCatalog {
    descriptors: Vec<AgentDescriptor>,
}

impl AgentCatalog {
    /// Catalog in which no agent requires payment.
    pub fn new() -> Self {
        Self {
            descriptors: AgentKind::ALL.iter().map(|k| AgentDescriptor::base(*k)).collect(),
        }
    }

    /// Catalog in which `paid` agents require payment at `price_fen`.
    pub fn with_monetization(paid: &[AgentKind], price_fen: u32) -> Self {
        let mut catalog = Self::new();
        for descriptor in &mut catalog.descriptors {
            descriptor.price_fen = price_fen;
            descriptor.requires_payment = paid.contains(&descriptor.kind);
        }
        catalog
    }

    pub fn get(&self, kind: AgentKind) -> &AgentDescriptor {
        &self.descriptors[kind.index()]
    }

    /// All descriptors in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.descriptors.iter()
    }

    /// Descriptors of agents that require payment.
    pub fn paid(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.descriptors.iter().filter(|d| d.requires_payment)
    }

    pub fn requires_payment(&self, kind: AgentKind) -> bool {
        self.get(kind).requires_payment
    }
}

impl Default for AgentCatalog {
    fn default() -> Self {
        Self::new()
    }
}
