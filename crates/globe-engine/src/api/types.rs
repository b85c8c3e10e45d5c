use std::fmt;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier of an attack event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackId(pub u64);

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attack-{}", self.0)
    }
}

/// Attack category. Unknown names survive as `Other` and get the default color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttackCategory {
    Dos,
    Malware,
    Phishing,
    Ransomware,
    SqlInjection,
    Other(String),
}

impl AttackCategory {
    /// The fixed set a feed picks from.
    pub const KNOWN: [AttackCategory; 5] = [
        AttackCategory::Dos,
        AttackCategory::Malware,
        AttackCategory::Phishing,
        AttackCategory::Ransomware,
        AttackCategory::SqlInjection,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AttackCategory::Dos => "DoS",
            AttackCategory::Malware => "Malware",
            AttackCategory::Phishing => "Phishing",
            AttackCategory::Ransomware => "Ransomware",
            AttackCategory::SqlInjection => "SQL Injection",
            AttackCategory::Other(name) => name,
        }
    }
}

impl From<&str> for AttackCategory {
    fn from(name: &str) -> Self {
        match name {
            "DoS" => AttackCategory::Dos,
            "Malware" => AttackCategory::Malware,
            "Phishing" => AttackCategory::Phishing,
            "Ransomware" => AttackCategory::Ransomware,
            "SQL Injection" => AttackCategory::SqlInjection,
            other => AttackCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for AttackCategory {
    fn from(name: String) -> Self {
        AttackCategory::from(name.as_str())
    }
}

impl From<AttackCategory> for String {
    fn from(category: AttackCategory) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for AttackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One end of an attack: a country and its representative coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// ISO 3166-1 alpha-2 code.
    pub country_code: String,
    /// Display name, if the feed knows it.
    #[serde(default)]
    pub country: String,
    /// Degrees, north positive.
    pub latitude: f32,
    /// Degrees, east positive.
    pub longitude: f32,
}

impl Endpoint {
    pub fn new(country_code: &str, latitude: f32, longitude: f32) -> Self {
        Self {
            country_code: country_code.to_string(),
            country: String::new(),
            latitude,
            longitude,
        }
    }

    pub fn with_country(mut self, name: &str) -> Self {
        self.country = name.to_string();
        self
    }
}

/// Highest intensity on the attack scale.
pub const MAX_INTENSITY: u8 = 10;

/// An attack record as produced by an event source. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackEvent {
    pub id: AttackId,
    pub source: Endpoint,
    pub target: Endpoint,
    pub category: AttackCategory,
    /// 1..=10.
    pub intensity: u8,
    /// Seconds on the engine clock.
    pub timestamp: f64,
}

impl AttackEvent {
    /// Build an event, clamping intensity into 1..=10.
    pub fn new(
        id: AttackId,
        source: Endpoint,
        target: Endpoint,
        category: AttackCategory,
        intensity: u8,
        timestamp: f64,
    ) -> Self {
        Self {
            id,
            source,
            target,
            category,
            intensity: intensity.clamp(1, MAX_INTENSITY),
            timestamp,
        }
    }

    /// Copy of this event under a fresh identity and timestamp, for replays.
    pub fn reissued(&self, id: AttackId, timestamp: f64) -> Self {
        Self {
            id,
            timestamp,
            ..self.clone()
        }
    }
}

/// A notification from the engine to the UI layer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GlobeEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GlobeEvent {
    pub const FLOATS: usize = 4;

    /// Popup shown: a = attack id, b = intensity.
    pub const POPUP_SHOWN: f32 = 1.0;
    /// Popup hidden: a = attack id.
    pub const POPUP_HIDDEN: f32 = 2.0;
    /// Camera mode changed: a = mode code (see `CameraMode::code`).
    pub const CAMERA_MODE: f32 = 3.0;
    /// Statistics snapshot refreshed: a = number of ranked countries.
    pub const STATS_UPDATED: f32 = 4.0;
    /// Impact spawned: a = attack id, b = intensity.
    pub const IMPACT: f32 = 5.0;
    /// Visual expired: a = attack id.
    pub const EXPIRED: f32 = 6.0;
    /// Debug counters: a = active visuals, b = choreographer phase code, c = spin angle.
    pub const DEBUG: f32 = 99.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// Attack counts for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStat {
    pub code: String,
    pub name: String,
    pub attacks: u64,
}

/// Attack count for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: AttackCategory,
    pub count: u64,
}

/// Display statistics pulled from the event source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Most attacked countries, descending.
    pub top_countries: Vec<CountryStat>,
    /// Category counts, descending.
    pub categories: Vec<CategoryStat>,
}

impl StatsSnapshot {
    /// Sort both rankings descending and cut countries to `limit`.
    pub fn ranked(mut self, limit: usize) -> Self {
        self.top_countries.sort_by(|a, b| b.attacks.cmp(&a.attacks));
        self.top_countries.truncate(limit);
        self.categories.sort_by(|a, b| b.count.cmp(&a.count));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_is_clamped() {
        let e = AttackEvent::new(
            AttackId(1),
            Endpoint::new("US", 37.0, -95.0),
            Endpoint::new("IT", 41.8, 12.5),
            AttackCategory::Dos,
            42,
            0.0,
        );
        assert_eq!(e.intensity, 10);
        let e = AttackEvent::new(AttackId(2), e.source.clone(), e.target.clone(), AttackCategory::Dos, 0, 0.0);
        assert_eq!(e.intensity, 1);
    }

    #[test]
    fn category_round_trips_through_names() {
        assert_eq!(AttackCategory::from("SQL Injection"), AttackCategory::SqlInjection);
        assert_eq!(AttackCategory::from("Zero-day"), AttackCategory::Other("Zero-day".into()));
        let json = serde_json::to_string(&AttackCategory::Dos).unwrap();
        assert_eq!(json, "\"DoS\"");
    }

    #[test]
    fn event_parses_from_feed_json() {
        let json = r#"{
            "id": 7,
            "source": { "country_code": "RU", "latitude": 61.5, "longitude": 105.3 },
            "target": { "country_code": "DE", "country": "Germany", "latitude": 51.1, "longitude": 10.4 },
            "category": "Ransomware",
            "intensity": 9,
            "timestamp": 12.5
        }"#;
        let e: AttackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e.id, AttackId(7));
        assert_eq!(e.category, AttackCategory::Ransomware);
        assert_eq!(e.target.country, "Germany");
        assert_eq!(e.source.country, "");
    }

    #[test]
    fn reissued_keeps_parameters() {
        let e = AttackEvent::new(
            AttackId(3),
            Endpoint::new("CN", 35.8, 104.1),
            Endpoint::new("US", 37.0, -95.7),
            AttackCategory::Malware,
            8,
            1.0,
        );
        let r = e.reissued(AttackId(99), 40.0);
        assert_eq!(r.id, AttackId(99));
        assert_eq!(r.timestamp, 40.0);
        assert_eq!(r.intensity, 8);
        assert_eq!(r.source, e.source);
    }

    #[test]
    fn stats_are_ranked() {
        let s = StatsSnapshot {
            top_countries: vec![
                CountryStat { code: "IT".into(), name: "Italy".into(), attacks: 3 },
                CountryStat { code: "US".into(), name: "United States".into(), attacks: 9 },
                CountryStat { code: "FR".into(), name: "France".into(), attacks: 5 },
            ],
            categories: vec![
                CategoryStat { category: AttackCategory::Dos, count: 1 },
                CategoryStat { category: AttackCategory::Malware, count: 4 },
            ],
        }
        .ranked(2);
        assert_eq!(s.top_countries.len(), 2);
        assert_eq!(s.top_countries[0].code, "US");
        assert_eq!(s.categories[0].category, AttackCategory::Malware);
    }

    #[test]
    fn globe_event_is_4_floats() {
        assert_eq!(std::mem::size_of::<GlobeEvent>(), GlobeEvent::FLOATS * 4);
    }
}
