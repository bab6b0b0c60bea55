use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::domain::lead::{LeadSource, LeadStatus, NewLead, UpdateLead};
use crate::domain::lead_activity::ActivityType;
use crate::domain::types::{
    CampaignId, EmailAddress, EmployeeId, HubId, LeadName, Money, PhoneNumber, SanitizedText,
    trimmed_opt,
};
use crate::forms::{FormError, invalid, optional, parse_variant};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /leads`.
pub struct AddLeadForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub company: Option<String>,
    #[serde(default)]
    pub source: String,
    pub status: Option<String>,
    #[serde(default)]
    pub value: i64,
    pub assigned_to: Option<i32>,
    pub campaign_id: Option<i32>,
    pub notes: Option<String>,
}

impl AddLeadForm {
    pub fn into_domain(self, hub_id: HubId) -> Result<NewLead, FormError> {
        self.validate()?;

        let name = LeadName::new(self.name).map_err(invalid("name"))?;
        let mut lead = NewLead::new(hub_id, name, LeadSource::from(self.source));
        lead.email = optional("email", self.email, EmailAddress::new)?;
        lead.phone = optional("phone", self.phone, PhoneNumber::new)?;
        lead.company = trimmed_opt(self.company);
        if let Some(status) = trimmed_opt(self.status) {
            lead.status = parse_variant::<LeadStatus>("status", &status)?;
        }
        lead.value = Money::new(self.value).map_err(invalid("value"))?;
        lead.assigned_to = self
            .assigned_to
            .map(EmployeeId::new)
            .transpose()
            .map_err(invalid("assigned_to"))?;
        lead.campaign_id = self
            .campaign_id
            .map(CampaignId::new)
            .transpose()
            .map_err(invalid("campaign_id"))?;
        lead.notes = trimmed_opt(self.notes);
        Ok(lead)
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Body of `PUT /leads/{id}`. Status and assignee have dedicated endpoints.
pub struct UpdateLeadForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub company: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub value: i64,
    pub campaign_id: Option<i32>,
    pub notes: Option<String>,
}

impl TryFrom<UpdateLeadForm> for UpdateLead {
    type Error = FormError;

    fn try_from(form: UpdateLeadForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(UpdateLead {
            name: LeadName::new(form.name).map_err(invalid("name"))?,
            email: optional("email", form.email, EmailAddress::new)?,
            phone: optional("phone", form.phone, PhoneNumber::new)?,
            company: trimmed_opt(form.company),
            source: LeadSource::from(form.source),
            value: Money::new(form.value).map_err(invalid("value"))?,
            campaign_id: form
                .campaign_id
                .map(CampaignId::new)
                .transpose()
                .map_err(invalid("campaign_id"))?,
            notes: trimmed_opt(form.notes),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeLeadStatusForm {
    pub status: String,
}

impl ChangeLeadStatusForm {
    pub fn status(&self) -> Result<LeadStatus, FormError> {
        parse_variant("status", &self.status)
    }
}

#[derive(Debug, Deserialize)]
/// `assigned_to: null` clears the assignee.
pub struct AssignLeadForm {
    pub assigned_to: Option<i32>,
}

impl AssignLeadForm {
    pub fn assignee(&self) -> Result<Option<EmployeeId>, FormError> {
        self.assigned_to
            .map(EmployeeId::new)
            .transpose()
            .map_err(invalid("assigned_to"))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddActivityForm {
    #[validate(length(min = 1, max = 64))]
    pub activity_type: String,
    #[validate(length(min = 1, max = 10_000))]
    pub text: String,
}

/// Validated activity kind and its JSON payload.
#[derive(Debug)]
pub struct ActivityInput {
    pub activity_type: ActivityType,
    pub data: serde_json::Value,
}

impl TryFrom<AddActivityForm> for ActivityInput {
    type Error = FormError;

    fn try_from(form: AddActivityForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let activity_type = ActivityType::from(form.activity_type.trim());
        if activity_type.is_system() {
            return Err(FormError::UnknownVariant {
                field: "activity_type",
                value: form.activity_type,
            });
        }
        let text = SanitizedText::new(form.text).map_err(invalid("text"))?;

        Ok(ActivityInput {
            activity_type,
            data: json!({ "text": text.as_str() }),
        })
    }
}

#[derive(MultipartForm)]
pub struct UploadLeadsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(Debug, Deserialize)]
struct LeadCsvRow {
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

impl UploadLeadsForm {
    pub fn parse(&self, hub_id: HubId) -> Result<Vec<NewLead>, FormError> {
        let file = self
            .csv
            .file
            .reopen()
            .map_err(|err| FormError::CsvFile(err.to_string()))?;
        parse_leads_csv(file, hub_id)
    }
}

/// Reads `name,email,phone,company,source` rows. Errors carry the 1-based
/// line of the offending record, counting the header.
pub fn parse_leads_csv<R: Read>(reader: R, hub_id: HubId) -> Result<Vec<NewLead>, FormError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|err| FormError::CsvFile(err.to_string()))?;
    if !headers.iter().any(|h| h == "name") {
        return Err(FormError::CsvFile("missing `name` column".to_string()));
    }

    let mut leads = Vec::new();
    for (index, record) in rdr.deserialize::<LeadCsvRow>().enumerate() {
        let row = index + 2;
        let record = record.map_err(|err| FormError::CsvRow {
            row,
            reason: err.to_string(),
        })?;
        let lead = lead_from_row(record, hub_id).map_err(|err| FormError::CsvRow {
            row,
            reason: err.to_string(),
        })?;
        leads.push(lead);
    }

    if leads.is_empty() {
        return Err(FormError::CsvFile("no leads found".to_string()));
    }
    Ok(leads)
}

fn lead_from_row(row: LeadCsvRow, hub_id: HubId) -> Result<NewLead, FormError> {
    let name = LeadName::new(row.name).map_err(invalid("name"))?;
    let source = trimmed_opt(row.source)
        .map(LeadSource::from)
        .unwrap_or(LeadSource::Other("Import".to_string()));

    let mut lead = NewLead::new(hub_id, name, source);
    lead.email = optional("email", row.email, EmailAddress::new)?;
    lead.phone = optional("phone", row.phone, PhoneNumber::new)?;
    lead.company = trimmed_opt(row.company);
    Ok(lead)
}
