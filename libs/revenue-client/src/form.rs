//! Form-input representation of an upsert record.
//!
//! UI forms keep every value as text and convert at submission time, which
//! keeps text-input editing decoupled from the wire type. Conversion errors
//! are raised synchronously, before any network call.

use thiserror::Error;

use crate::types::{Field, RevenueUpsertRequest};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{field} is required")]
    MissingRequired { field: &'static str },

    #[error("{field}: '{value}' is not a valid number")]
    InvalidNumber { field: &'static str, value: String },
}

/// Text-valued mirror of [`RevenueUpsertRequest`] for a form's edit session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertForm {
    pub report_date: String,
    pub data_year_month: String,
    pub company_code: String,
    pub company_name: String,
    pub industry: String,
    pub rev_current_month: String,
    pub rev_previous_month: String,
    pub rev_same_month_last_year: String,
    pub mom_change_pct: String,
    pub yoy_change_pct: String,
    pub rev_accu_current_year: String,
    pub rev_accu_last_year: String,
    pub accu_yoy_change_pct: String,
    pub notes: String,
}

impl InsertForm {
    /// Convert the text fields into a wire request. Blank fields become
    /// `Absent` so the backend keeps its defaults.
    pub fn to_request(&self) -> Result<RevenueUpsertRequest, FormError> {
        let mut request = RevenueUpsertRequest::new(
            required_u32("dataYearMonth", &self.data_year_month)?,
            required_u32("companyCode", &self.company_code)?,
        );
        request.report_date = optional_u32("reportDate", &self.report_date)?;
        request.company_name = text(&self.company_name);
        request.industry = text(&self.industry);
        request.rev_current_month = optional_f64("rev_CurrentMonth", &self.rev_current_month)?;
        request.rev_previous_month = optional_f64("rev_PreviousMonth", &self.rev_previous_month)?;
        request.rev_same_month_last_year =
            optional_f64("rev_SameMonthLastYear", &self.rev_same_month_last_year)?;
        request.mom_change_pct = optional_f64("moM_ChangePct", &self.mom_change_pct)?;
        request.yoy_change_pct = optional_f64("yoY_ChangePct", &self.yoy_change_pct)?;
        request.rev_accu_current_year =
            optional_f64("rev_Accu_CurrentYear", &self.rev_accu_current_year)?;
        request.rev_accu_last_year = optional_f64("rev_Accu_LastYear", &self.rev_accu_last_year)?;
        request.accu_yoy_change_pct =
            optional_f64("accu_YoY_ChangePct", &self.accu_yoy_change_pct)?;
        request.notes = text(&self.notes);
        Ok(request)
    }
}

fn text(value: &str) -> Field<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Field::Absent
    } else {
        Field::Value(trimmed.to_string())
    }
}

fn required_u32(field: &'static str, value: &str) -> Result<u32, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingRequired { field });
    }
    trimmed.parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: trimmed.to_string(),
    })
}

fn optional_u32(field: &'static str, value: &str) -> Result<Field<u32>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Field::Absent);
    }
    trimmed
        .parse()
        .map(Field::Value)
        .map_err(|_| FormError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}

fn optional_f64(field: &'static str, value: &str) -> Result<Field<f64>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Field::Absent);
    }
    trimmed
        .parse()
        .map(Field::Value)
        .map_err(|_| FormError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}
