use globe_engine::CountryTable;

const COUNTRIES_JSON: &str = include_str!("../assets/countries.json");

/// The fifteen countries the simulated feed picks from.
pub fn load() -> Result<CountryTable, serde_json::Error> {
    CountryTable::from_json(COUNTRIES_JSON)
}

/// Baseline (received, sent) attack counts shown before any live traffic.
pub const BASELINE: [(&str, u64, u64); 10] = [
    ("US", 85634, 39366),
    ("RU", 73765, 24235),
    ("CN", 61069, 21931),
    ("DE", 21756, 10244),
    ("IN", 19150, 7850),
    ("BR", 11545, 6455),
    ("IT", 2319, 1481),
    ("GB", 1511, 1189),
    ("FR", 985, 815),
    ("JP", 720, 580),
];
