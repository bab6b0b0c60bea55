use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeListParams {
    pub active: Option<bool>,
    pub department: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}
