use serde::{Deserialize, Serialize};

use crate::domain::campaign::{Campaign, CampaignStats};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignListParams {
    pub status: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub stats: CampaignStats,
}
