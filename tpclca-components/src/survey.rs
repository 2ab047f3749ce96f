//! Stakeholder survey records
//!
//! Category catalogues for stakeholder roles and collection methods, the two
//! record types captured by the survey, and an append-only sink for them.
//! Records are validated before they are accepted; nothing is persisted here.

use log::info;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::{SystemTime, UNIX_EPOCH};
use tpclca_core::errors::{LcaError, LcaResult};
use tpclca_core::reference::{Category, CategoryCatalog};
use tpclca_core::FloatValue;

/// Allowed risk scores, 1 (low) to 8 (high).
pub const RISK_SCORE_RANGE: RangeInclusive<u8> = 1..=8;
/// Allowed proximity to the responsible party, 1 (very far) to 5 (very close).
pub const PROXIMITY_RANGE: RangeInclusive<u8> = 1..=5;

/// Stakeholder roles along the end-of-life value chain.
pub fn stakeholder_categories() -> CategoryCatalog {
    CategoryCatalog::new([
        Category::new(
            "airline",
            "Supplier",
            "Airline (EoL Supplier)",
            "Fleet operators discarding TPCs",
        ),
        Category::new(
            "aircraft_manufacturer",
            "Supplier",
            "Aircraft Manufacturer",
            "Companies that produce aircraft using TPCs",
        ),
        Category::new(
            "mro_facility",
            "Supplier",
            "MRO Facility",
            "Maintenance, Repair, and Overhaul facilities",
        ),
        Category::new(
            "airport_waste_logistics",
            "Supplier",
            "Airport Waste/Logistics",
            "Airport services managing TPC waste",
        ),
        Category::new(
            "recycler",
            "Logistics & Processing",
            "Recycler",
            "Companies recycling thermoplastic composites",
        ),
        Category::new(
            "transport_company",
            "Logistics & Processing",
            "Transport Company",
            "Companies transporting composite waste",
        ),
        Category::new(
            "regulator",
            "Logistics & Processing",
            "Regulator",
            "Bodies overseeing aviation/environmental compliance",
        ),
        Category::new(
            "end_user_construction",
            "End Use",
            "End User - Construction",
            "Users of recycled TPCs in infrastructure/building",
        ),
        Category::new(
            "end_user_consumer_goods",
            "End Use",
            "End User - Consumer Goods",
            "Users in furniture, appliances, etc.",
        ),
        Category::new(
            "end_user_electronics",
            "End Use",
            "End User - Electronics",
            "Casings or components for electronics",
        ),
        Category::new(
            "end_user_sports_leisure",
            "End Use",
            "End User - Sports/Leisure",
            "Users in equipment like bikes, boards, helmets",
        ),
        Category::new("other", "Other", "Other", "Catch-all for unique or emerging roles"),
    ])
}

/// How end-of-life material leaves the stakeholder.
pub fn collection_methods() -> CategoryCatalog {
    CategoryCatalog::new([
        Category::new(
            "scheduled_in_house_dismantling",
            "Formal Process",
            "Scheduled In-House Dismantling",
            "Planned removal of components by internal staff",
        ),
        Category::new(
            "third_party_contractor",
            "Formal Process",
            "Third-Party Contractor",
            "Outsourced disassembly and collection",
        ),
        Category::new(
            "on_site_sorting",
            "Formal Process",
            "On-Site Sorting and Segregation",
            "Material is sorted and stored separately at the source",
        ),
        Category::new(
            "disposed_as_mixed_waste",
            "Informal/Ad Hoc",
            "Disposed as Mixed Waste",
            "Discarded without segregation or recovery",
        ),
        Category::new(
            "stored_without_strategy",
            "Informal/Ad Hoc",
            "Stored with No Clear Strategy",
            "Material stored or stockpiled without a recycling or disposal plan",
        ),
        Category::new(
            "untracked_removal",
            "Informal/Ad Hoc",
            "Untracked Removal",
            "Material is removed or disappears without clear documentation",
        ),
        Category::new("other", "Other", "Other", "Unspecified or emerging methods"),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueChainType {
    #[serde(rename = "Open Loop")]
    OpenLoop,
    #[serde(rename = "Closed Loop")]
    ClosedLoop,
    #[serde(rename = "Hybrid/Mixed")]
    HybridMixed,
    #[default]
    #[serde(rename = "Not Determined")]
    NotDetermined,
}

/// Who is primarily responsible for the end-of-life chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Responsibility {
    #[serde(rename = "Own Organization")]
    Own,
    #[serde(rename = "Partner Organization")]
    Partner,
    Shared,
    #[default]
    #[serde(rename = "Not Determined")]
    NotDetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Traceability {
    #[serde(rename = "Fully Traceable")]
    Fully,
    #[serde(rename = "Partially Traceable")]
    Partially,
    #[serde(rename = "Limited Traceability")]
    Limited,
    #[default]
    #[serde(rename = "Not Traceable")]
    NotTraceable,
}

/// Willingness to collaborate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Interest {
    Yes,
    No,
    #[default]
    Maybe,
}

/// Perceived risks, each scored within [`RISK_SCORE_RANGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskScores {
    pub financial: u8,
    pub technical: u8,
    pub operational: u8,
    pub regulatory: u8,
    pub market: u8,
    pub environmental: u8,
}

impl Default for RiskScores {
    fn default() -> Self {
        Self {
            financial: 4,
            technical: 4,
            operational: 4,
            regulatory: 4,
            market: 4,
            environmental: 4,
        }
    }
}

impl RiskScores {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> {
        [
            ("financial", self.financial),
            ("technical", self.technical),
            ("operational", self.operational),
            ("regulatory", self.regulatory),
            ("market", self.market),
            ("environmental", self.environmental),
        ]
        .into_iter()
    }

    pub fn validate(&self) -> LcaResult<()> {
        for (name, score) in self.iter() {
            ensure_in_range(&format!("{name}_risk"), score, &RISK_SCORE_RANGE)?;
        }
        Ok(())
    }
}

/// One stakeholder interview.
///
/// `role` and `collection_method` are ids from [`stakeholder_categories`] and
/// [`collection_methods`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub name: String,
    pub role: String,
    pub organisation: String,
    pub location: String,
    pub material_types: String,
    pub collection_method: String,
    /// unit: kg / month
    pub volume_kg_per_month: FloatValue,
    pub transportation_mode: String,
    pub processing_technology: String,
    pub current_eol_activities: String,
    pub missing_eol_activities: String,
    pub value_chain_experience: String,
    pub risk_scores: RiskScores,
    pub value_chain_type: ValueChainType,
    pub responsibility: Responsibility,
    pub proximity: u8,
    pub traceability: Traceability,
    pub additional_risks: String,
    pub interest: Interest,
    /// Capture time, stamped by the sink when absent.
    /// unit: seconds since the Unix epoch
    #[serde(default)]
    pub recorded_at: Option<u64>,
}

/// One observed flow of end-of-life material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialFlowRecord {
    pub source_organisation: String,
    /// e.g. "Airline", "MRO"
    pub source_type: String,
    pub material_type: String,
    /// unit: kg / month
    pub volume_kg_per_month: FloatValue,
    pub source_location: String,
    pub collection_method: String,
    pub transport_mode: String,
    pub destination: String,
    pub processor: String,
    pub notes: String,
    /// Capture time, stamped by the sink when absent.
    /// unit: seconds since the Unix epoch
    #[serde(default)]
    pub recorded_at: Option<u64>,
}

fn now_unix_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn ensure_in_range(name: &str, value: u8, range: &RangeInclusive<u8>) -> LcaResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(LcaError::InvalidParameter {
            name: name.to_string(),
            value: value.into(),
            reason: format!("must lie within [{}, {}]", range.start(), range.end()),
        })
    }
}

fn ensure_volume(value: FloatValue) -> LcaResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LcaError::InvalidParameter {
            name: "volume_kg_per_month".to_string(),
            value,
            reason: "must be a finite, non-negative volume".to_string(),
        })
    }
}

/// Catalogues that survey records are validated against.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyCatalogs {
    pub stakeholders: CategoryCatalog,
    pub collection_methods: CategoryCatalog,
}

impl Default for SurveyCatalogs {
    fn default() -> Self {
        Self {
            stakeholders: stakeholder_categories(),
            collection_methods: collection_methods(),
        }
    }
}

impl SurveyCatalogs {
    pub fn validate_interview(&self, record: &InterviewRecord) -> LcaResult<()> {
        self.stakeholders.get(&record.role)?;
        self.collection_methods.get(&record.collection_method)?;
        ensure_volume(record.volume_kg_per_month)?;
        record.risk_scores.validate()?;
        ensure_in_range("proximity", record.proximity, &PROXIMITY_RANGE)
    }

    /// Flow records carry free-text source types and collection methods, so
    /// only the volume is checked.
    pub fn validate_flow(&self, record: &MaterialFlowRecord) -> LcaResult<()> {
        ensure_volume(record.volume_kg_per_month)
    }
}

/// Append-only destination for survey records.
pub trait RecordSink {
    /// Validates and stores an interview, returning its position.
    ///
    /// Records without a capture time are stamped with the current time.
    fn append_interview(&mut self, record: InterviewRecord) -> LcaResult<usize>;
    /// Validates and stores a material flow, returning its position.
    fn append_flow(&mut self, record: MaterialFlowRecord) -> LcaResult<usize>;
}

/// In-memory [`RecordSink`].
#[derive(Debug, Clone, Default)]
pub struct RecordLog {
    catalogs: SurveyCatalogs,
    interviews: Vec<InterviewRecord>,
    flows: Vec<MaterialFlowRecord>,
}

impl RecordLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalogs(catalogs: SurveyCatalogs) -> Self {
        Self {
            catalogs,
            ..Default::default()
        }
    }

    pub fn catalogs(&self) -> &SurveyCatalogs {
        &self.catalogs
    }

    pub fn interviews(&self) -> &[InterviewRecord] {
        &self.interviews
    }

    pub fn flows(&self) -> &[MaterialFlowRecord] {
        &self.flows
    }

    /// Reported monthly volume across all material flows.
    /// unit: kg / month
    pub fn total_flow_volume_kg_per_month(&self) -> FloatValue {
        self.flows.iter().map(|f| f.volume_kg_per_month).sum()
    }

    /// Interviews by stakeholder category, in catalogue order.
    pub fn interviews_by_role(&self) -> Vec<(&Category, usize)> {
        self.catalogs
            .stakeholders
            .iter()
            .map(|c| (c, self.interviews.iter().filter(|r| r.role == c.id).count()))
            .collect()
    }
}

impl RecordSink for RecordLog {
    fn append_interview(&mut self, mut record: InterviewRecord) -> LcaResult<usize> {
        self.catalogs.validate_interview(&record)?;
        record.recorded_at.get_or_insert_with(now_unix_s);
        info!("Interview recorded for {} ({})", record.organisation, record.role);
        self.interviews.push(record);
        Ok(self.interviews.len() - 1)
    }

    fn append_flow(&mut self, mut record: MaterialFlowRecord) -> LcaResult<usize> {
        self.catalogs.validate_flow(&record)?;
        record.recorded_at.get_or_insert_with(now_unix_s);
        info!(
            "Material flow recorded from {} to {}",
            record.source_organisation, record.destination
        );
        self.flows.push(record);
        Ok(self.flows.len() - 1)
    }
}
