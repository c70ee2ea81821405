use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Page index sent to the server when the caller omits one (1-based).
pub const DEFAULT_PAGE_INDEX: u32 = 1;

/// Page size sent to the server when the caller omits one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Tri-state wire field: absent key, explicit `null`, or a value.
///
/// The upsert contract treats a missing key ("don't change / use the
/// default") differently from an explicit `null` ("clear the stored value").
/// `Option<T>` collapses the two, so optional upsert fields use this enum
/// together with `#[serde(default, skip_serializing_if = "Field::is_absent")]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Key is dropped from the serialized body.
    Absent,
    /// Key is emitted with value `null`.
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Absent is normally filtered out by `skip_serializing_if`; a
            // direct serialization degrades to `null`.
            Field::Absent | Field::Null => serializer.serialize_none(),
            Field::Value(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A missing key never reaches this point; `#[serde(default)]` maps
        // it to Absent.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

/// One financial-reporting record for a company in a given year-month.
///
/// Wire names follow the backend contract verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueUpsertRequest {
    /// Reporting period, numeric YYYMM (e.g. 202401).
    #[serde(rename = "DataYearMonth")]
    pub data_year_month: u32,

    /// Numeric company identifier, logically 4 digits.
    #[serde(rename = "CompanyCode")]
    pub company_code: u32,

    #[serde(rename = "ReportDate", default, skip_serializing_if = "Field::is_absent")]
    pub report_date: Field<u32>,

    #[serde(rename = "CompanyName", default, skip_serializing_if = "Field::is_absent")]
    pub company_name: Field<String>,

    #[serde(rename = "Industry", default, skip_serializing_if = "Field::is_absent")]
    pub industry: Field<String>,

    #[serde(rename = "Rev_CurrentMonth", default, skip_serializing_if = "Field::is_absent")]
    pub rev_current_month: Field<f64>,

    #[serde(rename = "Rev_PreviousMonth", default, skip_serializing_if = "Field::is_absent")]
    pub rev_previous_month: Field<f64>,

    #[serde(rename = "Rev_SameMonthLastYear", default, skip_serializing_if = "Field::is_absent")]
    pub rev_same_month_last_year: Field<f64>,

    #[serde(rename = "MoM_ChangePct", default, skip_serializing_if = "Field::is_absent")]
    pub mom_change_pct: Field<f64>,

    #[serde(rename = "YoY_ChangePct", default, skip_serializing_if = "Field::is_absent")]
    pub yoy_change_pct: Field<f64>,

    #[serde(rename = "Rev_Accu_CurrentYear", default, skip_serializing_if = "Field::is_absent")]
    pub rev_accu_current_year: Field<f64>,

    #[serde(rename = "Rev_Accu_LastYear", default, skip_serializing_if = "Field::is_absent")]
    pub rev_accu_last_year: Field<f64>,

    #[serde(rename = "Accu_YoY_ChangePct", default, skip_serializing_if = "Field::is_absent")]
    pub accu_yoy_change_pct: Field<f64>,

    #[serde(rename = "Notes", default, skip_serializing_if = "Field::is_absent")]
    pub notes: Field<String>,
}

impl RevenueUpsertRequest {
    /// Request with both required keys set and every optional field absent.
    pub fn new(data_year_month: u32, company_code: u32) -> Self {
        Self {
            data_year_month,
            company_code,
            report_date: Field::Absent,
            company_name: Field::Absent,
            industry: Field::Absent,
            rev_current_month: Field::Absent,
            rev_previous_month: Field::Absent,
            rev_same_month_last_year: Field::Absent,
            mom_change_pct: Field::Absent,
            yoy_change_pct: Field::Absent,
            rev_accu_current_year: Field::Absent,
            rev_accu_last_year: Field::Absent,
            accu_yoy_change_pct: Field::Absent,
            notes: Field::Absent,
        }
    }
}

/// Optional search filters. Pagination defaults are filled by
/// [`SearchParams::normalized`] before transmission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "companyCode", default, skip_serializing_if = "Option::is_none")]
    pub company_code: Option<String>,

    /// Inclusive lower year-month bound.
    #[serde(rename = "fromYM", default, skip_serializing_if = "Option::is_none")]
    pub from_ym: Option<String>,

    /// Inclusive upper year-month bound.
    #[serde(rename = "toYM", default, skip_serializing_if = "Option::is_none")]
    pub to_ym: Option<String>,

    /// 1-based page index.
    #[serde(rename = "pageIndex", default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,

    #[serde(rename = "pageSize", default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl SearchParams {
    /// Fill pagination defaults so the server always receives explicit
    /// values.
    pub fn normalized(mut self) -> Self {
        self.page_index = Some(self.page_index.unwrap_or(DEFAULT_PAGE_INDEX));
        self.page_size = Some(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE));
        self
    }
}

/// One page of a larger result set.
///
/// `items.len() <= page_size` is a server contract, not checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,

    #[serde(rename = "pageIndex")]
    pub page_index: u32,

    #[serde(rename = "pageSize")]
    pub page_size: u32,

    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

/// A revenue record as returned by search. Same wire names as the upsert
/// request; the response side needs no null/absent distinction, so plain
/// `Option` is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    #[serde(rename = "DataYearMonth")]
    pub data_year_month: u32,

    #[serde(rename = "CompanyCode")]
    pub company_code: u32,

    #[serde(rename = "ReportDate", default, skip_serializing_if = "Option::is_none")]
    pub report_date: Option<u32>,

    #[serde(rename = "CompanyName", default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(rename = "Industry", default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(rename = "Rev_CurrentMonth", default, skip_serializing_if = "Option::is_none")]
    pub rev_current_month: Option<f64>,

    #[serde(rename = "Rev_PreviousMonth", default, skip_serializing_if = "Option::is_none")]
    pub rev_previous_month: Option<f64>,

    #[serde(rename = "Rev_SameMonthLastYear", default, skip_serializing_if = "Option::is_none")]
    pub rev_same_month_last_year: Option<f64>,

    #[serde(rename = "MoM_ChangePct", default, skip_serializing_if = "Option::is_none")]
    pub mom_change_pct: Option<f64>,

    #[serde(rename = "YoY_ChangePct", default, skip_serializing_if = "Option::is_none")]
    pub yoy_change_pct: Option<f64>,

    #[serde(rename = "Rev_Accu_CurrentYear", default, skip_serializing_if = "Option::is_none")]
    pub rev_accu_current_year: Option<f64>,

    #[serde(rename = "Rev_Accu_LastYear", default, skip_serializing_if = "Option::is_none")]
    pub rev_accu_last_year: Option<f64>,

    #[serde(rename = "Accu_YoY_ChangePct", default, skip_serializing_if = "Option::is_none")]
    pub accu_yoy_change_pct: Option<f64>,

    #[serde(rename = "Notes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RevenueRecord {
    /// Record with both keys set and every optional field empty.
    pub fn new(data_year_month: u32, company_code: u32) -> Self {
        Self {
            data_year_month,
            company_code,
            report_date: None,
            company_name: None,
            industry: None,
            rev_current_month: None,
            rev_previous_month: None,
            rev_same_month_last_year: None,
            mom_change_pct: None,
            yoy_change_pct: None,
            rev_accu_current_year: None,
            rev_accu_last_year: None,
            accu_yoy_change_pct: None,
            notes: None,
        }
    }
}

/// Result of an upsert call.
///
/// The backend answers with a bare number that is either an affected-row
/// count or a record identifier depending on the deployment; the wire shape
/// does not distinguish the two, so callers must treat the number as opaque.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UpsertOutcome {
    Number(i64),
    /// The response had no body (normalized to an empty JSON object).
    Empty {},
}

impl UpsertOutcome {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            UpsertOutcome::Number(n) => Some(*n),
            UpsertOutcome::Empty {} => None,
        }
    }
}
