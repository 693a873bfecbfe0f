use anyhow::{anyhow, Result};
use std::str::FromStr;

use crate::models::{Service, ServiceKind};

/// Service tabs on a mentor profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceTab {
    #[default]
    All,
    Call,
    Dm,
    Package,
    Webinar,
    Product,
}

impl ServiceTab {
    pub const ALL: &'static [ServiceTab] = &[
        ServiceTab::All,
        ServiceTab::Call,
        ServiceTab::Dm,
        ServiceTab::Package,
        ServiceTab::Webinar,
        ServiceTab::Product,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceTab::All => "All",
            ServiceTab::Call => "1:1 Call",
            ServiceTab::Dm => "Priority DM",
            ServiceTab::Package => "Package",
            ServiceTab::Webinar => "Webinar",
            ServiceTab::Product => "Digital product",
        }
    }

    pub fn includes(&self, kind: &ServiceKind) -> bool {
        matches!(
            (self, kind),
            (ServiceTab::All, _)
                | (ServiceTab::Call, ServiceKind::Call { .. })
                | (ServiceTab::Dm, ServiceKind::PriorityDm { .. })
                | (ServiceTab::Package, ServiceKind::Package { .. })
                | (ServiceTab::Webinar, ServiceKind::Webinar { .. })
                | (ServiceTab::Product, ServiceKind::DigitalProduct { .. })
        )
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl FromStr for ServiceTab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ServiceTab::All),
            "call" => Ok(ServiceTab::Call),
            "dm" => Ok(ServiceTab::Dm),
            "package" => Ok(ServiceTab::Package),
            "webinar" => Ok(ServiceTab::Webinar),
            "product" => Ok(ServiceTab::Product),
            _ => Err(anyhow!(
                "Unknown tab '{}'. Available: all, call, dm, package, webinar, product",
                s
            )),
        }
    }
}

pub fn services_for_tab(services: &[Service], tab: ServiceTab) -> Vec<&Service> {
    services.iter().filter(|s| tab.includes(&s.kind)).collect()
}

/// Five-character rating bar, e.g. "****." for 4.2.
pub fn stars(rating: f64) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "*".repeat(full), ".".repeat(5 - full))
}
