//! Docker-compatible report shape.
//!
//! The compatibility API advertises per-object version tracking. Configmaps
//! are immutable, so the version index is always `1`.

use serde::{Deserialize, Serialize};

use crate::entities::InfoReport;

/// Version index reported for every configmap on the compat surface.
pub const COMPAT_VERSION_INDEX: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigMapVersion {
    pub index: u64,
}

/// An `InfoReport` plus the constant version stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InfoReportCompat {
    #[serde(flatten)]
    pub report: InfoReport,
    pub version: ConfigMapVersion,
}

impl From<InfoReport> for InfoReportCompat {
    fn from(report: InfoReport) -> Self {
        InfoReportCompat {
            report,
            version: ConfigMapVersion {
                index: COMPAT_VERSION_INDEX,
            },
        }
    }
}

/// Translate a batch of reports, preserving order.
pub fn to_compat(reports: Vec<InfoReport>) -> Vec<InfoReportCompat> {
    reports.into_iter().map(InfoReportCompat::from).collect()
}
