//! Static classification of supplementary (category, subcategory) pairs
//! into display-level resource types.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Code,
    Data,
    Containers,
    Trials,
    Protocols,
    Packages,
    Miscellaneous,
}

impl ResourceType {
    /// Enumeration order; also drives series order and colour assignment.
    pub const ALL: [ResourceType; 7] = [
        ResourceType::Code,
        ResourceType::Data,
        ResourceType::Containers,
        ResourceType::Trials,
        ResourceType::Protocols,
        ResourceType::Packages,
        ResourceType::Miscellaneous,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceType::Code => "Code",
            ResourceType::Data => "Data",
            ResourceType::Containers => "Containers",
            ResourceType::Trials => "Trials",
            ResourceType::Protocols => "Protocols",
            ResourceType::Packages => "Packages",
            ResourceType::Miscellaneous => "Miscellaneous",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|t| *t == self)
            .unwrap_or_default()
    }

    pub fn color(self) -> &'static str {
        palette_color(self.index())
    }

    /// Every (category, subcategory) pair classified as this type.
    pub fn entries(self) -> impl Iterator<Item = &'static ResourceTypeEntry> {
        RESOURCE_TYPES.iter().filter(move |e| e.display_type == self)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTypeEntry {
    pub category: &'static str,
    pub sub_category: &'static str,
    pub display_type: ResourceType,
}

const fn entry(
    category: &'static str,
    sub_category: &'static str,
    display_type: ResourceType,
) -> ResourceTypeEntry {
    ResourceTypeEntry {
        category,
        sub_category,
        display_type,
    }
}

pub static RESOURCE_TYPES: &[ResourceTypeEntry] = &[
    entry("code", "github", ResourceType::Code),
    entry("code", "gitlab", ResourceType::Code),
    entry("code", "bitbucket", ResourceType::Code),
    entry("code", "sourceforge", ResourceType::Code),
    entry("data", "geo", ResourceType::Data),
    entry("data", "sra", ResourceType::Data),
    entry("data", "dbgap", ResourceType::Data),
    entry("data", "ena", ResourceType::Data),
    entry("data", "arrayexpress", ResourceType::Data),
    entry("data", "pride", ResourceType::Data),
    entry("data", "figshare", ResourceType::Data),
    entry("data", "zenodo", ResourceType::Data),
    entry("data", "dryad", ResourceType::Data),
    entry("data", "dataverse", ResourceType::Data),
    entry("data", "osf", ResourceType::Data),
    entry("containers", "docker", ResourceType::Containers),
    entry("containers", "singularity", ResourceType::Containers),
    entry("trials", "clinicaltrials", ResourceType::Trials),
    entry("protocols", "protocols_io", ResourceType::Protocols),
    entry("packages", "cran", ResourceType::Packages),
    entry("packages", "bioconductor", ResourceType::Packages),
    entry("packages", "pypi", ResourceType::Packages),
    entry("packages", "conda", ResourceType::Packages),
    entry("misc", "other", ResourceType::Miscellaneous),
];

pub fn classify(category: &str, sub_category: &str) -> Option<ResourceType> {
    RESOURCE_TYPES
        .iter()
        .find(|e| e.category == category && e.sub_category == sub_category)
        .map(|e| e.display_type)
}

pub const PALETTE: [&str; 7] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#C9CBCF",
];

/// Marker colour for the queried author's scatter point.
pub const HIGHLIGHT_COLOR: &str = "#FF0000";

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
