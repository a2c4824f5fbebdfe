use std::collections::HashMap;

/// Lookup table with a required fallback, so a lookup never misses.
#[derive(Debug, Clone)]
pub struct StaticCatalog<V> {
    entries: HashMap<String, V>,
    fallback: V,
}

/// Values that carry their own catalog key.
pub trait CatalogKey {
    fn catalog_key(&self) -> &str;
}

impl<V> StaticCatalog<V> {
    pub fn new(fallback: V) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: V) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    pub fn lookup(&self, key: &str) -> &V {
        self.entries.get(key).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn fallback(&self) -> &V {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: CatalogKey> StaticCatalog<V> {
    pub fn from_entries(entries: impl IntoIterator<Item = V>, fallback: V) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.catalog_key().to_string(), entry))
            .collect();
        Self { entries, fallback }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtcCatalogEntry {
    pub code: String,
    pub system: String,
    pub component: String,
    pub common_causes: Vec<String>,
    pub diagnostic_procedure: String,
}

impl DtcCatalogEntry {
    fn new(
        code: &str,
        system: &str,
        component: &str,
        common_causes: &[&str],
        diagnostic_procedure: &str,
    ) -> Self {
        Self {
            code: code.to_string(),
            system: system.to_string(),
            component: component.to_string(),
            common_causes: common_causes.iter().map(|cause| cause.to_string()).collect(),
            diagnostic_procedure: diagnostic_procedure.to_string(),
        }
    }
}

impl CatalogKey for DtcCatalogEntry {
    fn catalog_key(&self) -> &str {
        &self.code
    }
}

pub type DtcCatalog = StaticCatalog<DtcCatalogEntry>;

impl StaticCatalog<DtcCatalogEntry> {
    /// Reference data shown when a visitor clicks a trouble code.
    pub fn standard() -> Self {
        Self::from_entries(
            [
                DtcCatalogEntry::new(
                    "P0101",
                    "Engine Management",
                    "Mass Airflow Sensor",
                    &[
                        "Dirty/faulty MAF sensor",
                        "Air intake leaks",
                        "Clogged air filter",
                    ],
                    "Check MAF sensor voltage, inspect air intake system",
                ),
                DtcCatalogEntry::new(
                    "P0420",
                    "Emissions",
                    "Catalytic Converter",
                    &[
                        "Catalyst efficiency below threshold",
                        "O2 sensor malfunction",
                        "Engine misfires",
                    ],
                    "Test catalyst efficiency, check O2 sensor operation",
                ),
                DtcCatalogEntry::new(
                    "C0561",
                    "Chassis/ABS",
                    "ABS Control Module",
                    &[
                        "ABS system disabled",
                        "Wheel speed sensor fault",
                        "Hydraulic issues",
                    ],
                    "Scan ABS module, test wheel sensors, check brake fluid",
                ),
                DtcCatalogEntry::new(
                    "U0100",
                    "Network Communication",
                    "ECM/PCM",
                    &[
                        "CAN bus communication loss",
                        "Wiring issues",
                        "Module failure",
                    ],
                    "Check CAN bus integrity, test module communication",
                ),
            ],
            DtcCatalogEntry::new(
                "",
                "Unknown System",
                "Unknown Component",
                &["Requires professional diagnosis"],
                "Contact certified technician for detailed analysis",
            ),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentSpec {
    pub equipment_name: String,
    pub heading: String,
    pub features: Vec<String>,
}

impl EquipmentSpec {
    fn new(equipment_name: &str, heading: &str, features: &[&str]) -> Self {
        Self {
            equipment_name: equipment_name.to_string(),
            heading: heading.to_string(),
            features: features.iter().map(|feature| feature.to_string()).collect(),
        }
    }

    /// Markup inserted into the expanded card. The fallback entry has no
    /// heading and renders as a single paragraph.
    pub fn details_markup(&self) -> String {
        if self.heading.is_empty() {
            return "<p>Advanced diagnostic capabilities available.</p>".to_string();
        }
        let mut out = String::from("<div class=\"equipment-detail\"><h4>");
        out.push_str(&crate::core_impl::escape_html(&self.heading));
        out.push_str("</h4><ul>");
        for feature in &self.features {
            out.push_str("<li>");
            out.push_str(&crate::core_impl::escape_html(feature));
            out.push_str("</li>");
        }
        out.push_str("</ul></div>");
        out
    }
}

impl CatalogKey for EquipmentSpec {
    fn catalog_key(&self) -> &str {
        &self.equipment_name
    }
}

pub type EquipmentCatalog = StaticCatalog<EquipmentSpec>;

impl StaticCatalog<EquipmentSpec> {
    pub fn standard() -> Self {
        Self::from_entries(
            [
                EquipmentSpec::new(
                    "Professional OBD2 Scanner",
                    "Advanced Features:",
                    &[
                        "Real-time data streaming",
                        "Bi-directional control capabilities",
                        "Freeze frame data capture",
                        "Component activation testing",
                        "Multi-language support",
                    ],
                ),
                EquipmentSpec::new(
                    "Automotive Oscilloscope",
                    "Measurement Capabilities:",
                    &[
                        "CAN High/Low signal analysis",
                        "Ignition waveform capture",
                        "Fuel injector pulse width",
                        "Sensor voltage patterns",
                        "Communication protocol decoding",
                    ],
                ),
                EquipmentSpec::new(
                    "Digital Multimeter",
                    "Precision Measurements:",
                    &[
                        "Voltage: ±0.01V accuracy",
                        "Current: µA to 10A range",
                        "Resistance: 0.1Ω to 100MΩ",
                        "Frequency: 0.01Hz to 1MHz",
                        "Temperature: -40°C to 1000°C",
                    ],
                ),
            ],
            EquipmentSpec::new("", "", &[]),
        )
    }
}
