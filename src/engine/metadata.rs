use regex::Regex;
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;
use std::sync::LazyLock;

static CAPACITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*mwp?").expect("Hardcode pattern"));

/// Region assumed when no keyword matches.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Keywords searched in lowercased file names; the first match wins.
const REGIONS: &[(&str, &str)] = &[
    ("solapur", "Maharashtra"),
    ("augasi", "Uttar Pradesh"),
    ("panwari", "Uttar Pradesh"),
    ("pailani", "Uttar Pradesh"),
    ("maharashtra", "Maharashtra"),
    ("uttar pradesh", "Uttar Pradesh"),
    ("gujarat", "Gujarat"),
    ("rajasthan", "Rajasthan"),
    ("karnataka", "Karnataka"),
    ("tamil nadu", "Tamil Nadu"),
    ("telangana", "Telangana"),
    ("andhra pradesh", "Andhra Pradesh"),
    ("madhya pradesh", "Madhya Pradesh"),
    ("haryana", "Haryana"),
    ("punjab", "Punjab"),
    ("odisha", "Odisha"),
    ("jharkhand", "Jharkhand"),
    ("chhattisgarh", "Chhattisgarh"),
];

/// Generation technology of a site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Technology {
    Solar,
    Wind,
    Hybrid,
}

impl Technology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::Solar => "Solar",
            Technology::Wind => "Wind",
            Technology::Hybrid => "Hybrid",
        }
    }
}

impl Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site facts encoded in a file name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SiteMetadata {
    /// File name without its extension
    pub site_name: String,
    pub region: String,
    pub technology: Technology,
    /// Rated capacity in MW
    pub capacity_mw: u32,
}

/// Derives region, technology and capacity from file names.
#[derive(Copy, Clone, Debug)]
pub struct FilenameMetadataParser {
    default_capacity: u32,
}

impl Default for FilenameMetadataParser {
    fn default() -> Self {
        Self { default_capacity: 100 }
    }
}

impl FilenameMetadataParser {
    pub fn new(default_capacity: u32) -> Self {
        Self { default_capacity }
    }

    pub fn parse(&self, file_name: &str) -> SiteMetadata {
        let lowercase = file_name.to_lowercase();
        SiteMetadata {
            site_name: site_name(file_name),
            region: region(&lowercase).to_owned(),
            technology: technology(&lowercase),
            capacity_mw: self.capacity(&lowercase),
        }
    }

    /// First digit run followed by `MW` or `MWp`; the default otherwise.
    fn capacity(&self, file_name: &str) -> u32 {
        CAPACITY
            .captures(file_name)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
            .unwrap_or(self.default_capacity)
    }
}

/// File name without directories and without its last extension.
pub fn site_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_owned())
}

fn region(file_name: &str) -> &'static str {
    REGIONS
        .iter()
        .find(|(keyword, _)| file_name.contains(keyword))
        .map(|(_, region)| *region)
        .unwrap_or(UNKNOWN_REGION)
}

fn technology(file_name: &str) -> Technology {
    if file_name.contains("solar") {
        Technology::Solar
    } else if file_name.contains("wind") {
        Technology::Wind
    } else {
        Technology::Hybrid
    }
}
