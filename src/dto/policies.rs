use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyListParams {
    pub category: Option<String>,
    pub active: Option<bool>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}
