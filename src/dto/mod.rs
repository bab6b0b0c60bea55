//! Query-string parameters and response bodies of the JSON API.

use serde::Deserialize;

use crate::pagination::PageRequest;

pub mod attendance;
pub mod billing;
pub mod campaigns;
pub mod employees;
pub mod expenses;
pub mod leads;
pub mod leave;
pub mod policies;
pub mod recruitment;

/// `page`/`per_page` pair accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageParams {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}
